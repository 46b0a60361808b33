use std::sync::Arc;
use std::time::Duration;
use chrono::{DateTime, FixedOffset, Local, Offset, Utc};
use tokio::sync::watch;
use crate::sampling::pipeline::SamplePipeline;

pub const HOURLY: Duration = Duration::from_secs(3600);

/// When the next run is due.
pub trait Cadence: Send + Sync {
    /// First fire time strictly after `now`.
    fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc>;
}

/// Fires on multiples of `period` counted from local midnight, so an hourly
/// period fires at the top of every wall-clock hour. Without a fixed offset
/// the host's local offset at `now` is used.
#[derive(Clone, Copy, Debug)]
pub struct AlignedCadence {
    period: Duration,
    offset: Option<FixedOffset>,
}

impl AlignedCadence {
    pub fn new(period: Duration) -> Self {
        AlignedCadence { period, offset: None }
    }

    pub fn hourly() -> Self {
        AlignedCadence::new(HOURLY)
    }

    pub fn with_offset(period: Duration, offset: FixedOffset) -> Self {
        AlignedCadence { period, offset: Some(offset) }
    }

    fn offset_ms(&self, now: DateTime<Utc>) -> i64 {
        let offset = self.offset.unwrap_or_else(|| now.with_timezone(&Local).offset().fix());
        i64::from(offset.local_minus_utc()) * 1000
    }
}

impl Cadence for AlignedCadence {
    fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let period_ms = (self.period.as_millis() as i64).max(1);
        let shift = self.offset_ms(now);
        let local_ms = now.timestamp_millis() + shift;
        let next_ms = (local_ms.div_euclid(period_ms) + 1) * period_ms - shift;
        DateTime::from_timestamp_millis(next_ms).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Drives the pipeline on a cadence. Runs execute inline, one at a time;
/// boundaries that pass while a run is in flight are skipped.
pub struct Scheduler {
    pipeline: Arc<SamplePipeline>,
    cadence: Box<dyn Cadence>,
    run_on_startup: bool,
}

impl Scheduler {
    pub fn new(pipeline: Arc<SamplePipeline>, cadence: Box<dyn Cadence>, run_on_startup: bool) -> Self {
        Scheduler { pipeline, cadence, run_on_startup }
    }

    /// Loop until `shutdown` flips to `true` or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            "Scheduler started: policy={:?}, run_on_startup={}",
            self.pipeline.policy(), self.run_on_startup
        );

        if self.run_on_startup {
            self.tick().await;
        }

        while !*shutdown.borrow() {
            let now = Utc::now();
            let next = self.cadence.next_after(now);
            let wait = (next - now).to_std().unwrap_or_default();
            tracing::debug!("Next run at {}", next);

            tokio::select! {
                _ = tokio::time::sleep(wait) => self.tick().await,
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Scheduler stopped");
    }

    async fn tick(&self) {
        if let Err(e) = self.pipeline.run_once().await {
            tracing::error!("Scheduled run failed: {}", e);
        }
    }
}
