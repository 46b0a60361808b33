use crate::types::sample::Sample;
use crate::error::Result;
use async_trait::async_trait;

/// Append-only record of samples.
#[async_trait]
pub trait SampleStore: Send + Sync {
    /// Durable once this returns `Ok`.
    async fn insert(&self, sample: &Sample) -> Result<()>;

    /// Every stored sample, newest `taken_at` first. Empty store is `Ok(vec![])`.
    async fn list_newest_first(&self) -> Result<Vec<Sample>>;
}
