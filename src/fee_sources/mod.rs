pub mod connectors;
pub mod aggregator;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream fee source a reading came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    Btc,
    Eth,
}

impl SourceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Btc => "btc",
            SourceId::Eth => "eth",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gas oracle price tiers, in gwei.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GasTiers {
    pub safe: f64,
    pub propose: f64,
    pub fast: f64,
}
