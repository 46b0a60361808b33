use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;
use crate::error::Result;
use crate::fee_sources::SourceId;
use crate::interfaces::sample_store::SampleStore;
use crate::observability::metrics::SAMPLE_RUNS;
use crate::observability::tracing::trace_sample_run;
use crate::sampling::collector::SampleCollector;
use crate::sampling::policy::{FailurePolicy, Resolution};
use crate::types::sample::Sample;

#[derive(Debug, PartialEq)]
pub enum RunOutcome {
    Committed(Sample),
    Skipped { failed: Vec<SourceId> },
}

/// One collect -> resolve -> persist cycle.
pub struct SamplePipeline {
    collector: SampleCollector,
    store: Arc<dyn SampleStore>,
    policy: FailurePolicy,
}

impl SamplePipeline {
    pub fn new(collector: SampleCollector, store: Arc<dyn SampleStore>, policy: FailurePolicy) -> Self {
        SamplePipeline { collector, store, policy }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Run the pipeline once. Upstream failures are absorbed according to the
    /// failure policy; only a failed store write is returned as an error.
    pub async fn run_once(&self) -> Result<RunOutcome> {
        let run_id = Uuid::new_v4();
        self.run(run_id).instrument(trace_sample_run(&run_id)).await
    }

    async fn run(&self, run_id: Uuid) -> Result<RunOutcome> {
        let collection = self.collector.collect().await;

        let sample = match self.policy.resolve(collection) {
            Resolution::Commit(sample) => sample,
            Resolution::Abort { failed } => {
                SAMPLE_RUNS.with_label_values(&["skipped"]).inc();
                tracing::warn!(
                    "Run {} skipped: {:?} policy and failed sources {:?}",
                    run_id, self.policy, failed
                );
                return Ok(RunOutcome::Skipped { failed });
            }
        };

        if let Err(e) = self.store.insert(&sample).await {
            SAMPLE_RUNS.with_label_values(&["store_failed"]).inc();
            tracing::error!("Run {} lost, sample not persisted: {}", run_id, e);
            return Err(e);
        }

        SAMPLE_RUNS.with_label_values(&["committed"]).inc();
        tracing::info!(
            "Sample saved: date={} btc={:?} eth={:?}",
            sample.taken_at(), sample.btc_fee_rate(), sample.eth_gas_price()
        );
        Ok(RunOutcome::Committed(sample))
    }
}
