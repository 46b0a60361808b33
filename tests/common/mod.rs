#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;
use async_trait::async_trait;
use fee_heartbeat::error::{Error, Result};
use fee_heartbeat::fee_sources::connectors::{BtcFeeSource, EthGasSource};
use fee_heartbeat::fee_sources::{GasTiers, SourceId};
use fee_heartbeat::interfaces::sample_store::SampleStore;
use fee_heartbeat::sampling::collector::SampleCollector;
use fee_heartbeat::types::sample::Sample;
use mockall::mock;

/// BTC source answering after `delay` with a fixed rate, or failing when `None`.
pub struct StubBtc {
    pub delay: Duration,
    pub rate: Option<f64>,
}

#[async_trait]
impl BtcFeeSource for StubBtc {
    async fn fastest_fee_rate(&self) -> Result<f64> {
        tokio::time::sleep(self.delay).await;
        self.rate.ok_or_else(|| Error::unavailable(SourceId::Btc, "stub down"))
    }
}

pub struct StubEth {
    pub delay: Duration,
    pub tiers: Option<GasTiers>,
}

#[async_trait]
impl EthGasSource for StubEth {
    async fn gas_tiers(&self) -> Result<GasTiers> {
        tokio::time::sleep(self.delay).await;
        self.tiers.ok_or_else(|| Error::malformed(SourceId::Eth, "stub malformed"))
    }
}

pub fn tiers(safe: f64, propose: f64, fast: f64) -> GasTiers {
    GasTiers { safe, propose, fast }
}

pub fn stub_collector(btc: Option<f64>, eth: Option<GasTiers>) -> SampleCollector {
    SampleCollector::new(
        Arc::new(StubBtc { delay: Duration::ZERO, rate: btc }),
        Arc::new(StubEth { delay: Duration::ZERO, tiers: eth }),
    )
}

/// In-process store for tests that run under paused tokio time.
#[derive(Default)]
pub struct MemoryStore {
    samples: Mutex<Vec<Sample>>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.samples.lock().unwrap().len()
    }
}

#[async_trait]
impl SampleStore for MemoryStore {
    async fn insert(&self, sample: &Sample) -> Result<()> {
        self.samples.lock().unwrap().push(sample.clone());
        Ok(())
    }

    async fn list_newest_first(&self) -> Result<Vec<Sample>> {
        let mut samples = self.samples.lock().unwrap().clone();
        samples.sort_by(|a, b| b.taken_at().cmp(&a.taken_at()));
        Ok(samples)
    }
}

mock! {
    pub Store {}

    #[async_trait]
    impl SampleStore for Store {
        async fn insert(&self, sample: &Sample) -> Result<()>;
        async fn list_newest_first(&self) -> Result<Vec<Sample>>;
    }
}

pub fn store_down() -> Error {
    Error::StoreUnavailable("connection refused".to_string())
}
