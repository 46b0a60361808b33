use serde::{Deserialize, Serialize};
use crate::fee_sources::SourceId;
use crate::sampling::collector::Collection;
use crate::types::sample::Sample;

/// What a run does when one or both upstream sources fail.
///
/// This is the only place that decision is made. `Strict` drops the whole
/// run; `Lenient` commits what was fetched and leaves failed fields unknown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    Strict,
    #[default]
    Lenient,
}

#[derive(Debug, PartialEq)]
pub enum Resolution {
    Commit(Sample),
    Abort { failed: Vec<SourceId> },
}

impl FailurePolicy {
    pub fn resolve(self, collection: Collection) -> Resolution {
        let failed = collection.failed_sources();

        if self == FailurePolicy::Strict && !failed.is_empty() {
            return Resolution::Abort { failed };
        }

        Resolution::Commit(Sample::new(
            collection.taken_at,
            collection.btc.ok(),
            collection.eth.ok(),
        ))
    }
}
