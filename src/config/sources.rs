use std::fmt;
use serde::Deserialize;
use crate::fee_sources::connectors::blockstream::DEFAULT_FEE_ESTIMATES_URL;
use crate::fee_sources::connectors::etherscan::DEFAULT_GAS_ORACLE_URL;

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub btc_url: String,
    pub eth_url: String,
    pub eth_api_key: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        SourcesConfig {
            btc_url: DEFAULT_FEE_ESTIMATES_URL.to_string(),
            eth_url: DEFAULT_GAS_ORACLE_URL.to_string(),
            eth_api_key: String::new(),
        }
    }
}

// Keeps the API key out of logs.
impl fmt::Debug for SourcesConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourcesConfig")
            .field("btc_url", &self.btc_url)
            .field("eth_url", &self.eth_url)
            .field("eth_api_key", &"<redacted>")
            .finish()
    }
}
