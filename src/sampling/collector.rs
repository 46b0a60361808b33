use std::sync::Arc;
use std::time::Instant;
use chrono::{DateTime, Utc};
use tracing::Instrument;
use crate::error::Result;
use crate::fee_sources::aggregator;
use crate::fee_sources::connectors::{BtcFeeSource, EthGasSource};
use crate::fee_sources::SourceId;
use crate::observability::metrics::{
    LAST_BTC_FEE_RATE, LAST_ETH_GAS_PRICE, UPSTREAM_FAILURES, UPSTREAM_FETCH_LATENCY,
};
use crate::observability::tracing::trace_upstream_fetch;

/// Outcome of one fan-out, before the failure policy is applied.
#[derive(Debug)]
pub struct Collection {
    pub taken_at: DateTime<Utc>,
    pub btc: Result<f64>,
    pub eth: Result<f64>,
}

impl Collection {
    pub fn failed_sources(&self) -> Vec<SourceId> {
        let mut failed = Vec::new();
        if self.btc.is_err() {
            failed.push(SourceId::Btc);
        }
        if self.eth.is_err() {
            failed.push(SourceId::Eth);
        }
        failed
    }
}

pub struct SampleCollector {
    btc: Arc<dyn BtcFeeSource>,
    eth: Arc<dyn EthGasSource>,
}

impl SampleCollector {
    pub fn new(btc: Arc<dyn BtcFeeSource>, eth: Arc<dyn EthGasSource>) -> Self {
        SampleCollector { btc, eth }
    }

    /// Query both sources concurrently and wait for both outcomes.
    pub async fn collect(&self) -> Collection {
        let (btc, eth) = tokio::join!(
            self.fetch_btc().instrument(trace_upstream_fetch(SourceId::Btc)),
            self.fetch_eth().instrument(trace_upstream_fetch(SourceId::Eth)),
        );

        Collection {
            taken_at: Utc::now(),
            btc,
            eth,
        }
    }

    async fn fetch_btc(&self) -> Result<f64> {
        let started = Instant::now();
        let result = self.btc.fastest_fee_rate().await.map(aggregator::btc_fee_rate);
        observe(SourceId::Btc, started, &result);

        if let Ok(rate) = result {
            LAST_BTC_FEE_RATE.set(rate);
            tracing::info!("Fastest fee (next block): {} sats/vB", rate);
        }
        result
    }

    async fn fetch_eth(&self) -> Result<f64> {
        let started = Instant::now();
        let result = self.eth.gas_tiers().await.map(|tiers| aggregator::eth_gas_price(&tiers));
        observe(SourceId::Eth, started, &result);

        if let Ok(price) = result {
            LAST_ETH_GAS_PRICE.set(price);
            tracing::info!("Average gas price: {} gwei", price);
        }
        result
    }
}

fn observe(source: SourceId, started: Instant, result: &Result<f64>) {
    UPSTREAM_FETCH_LATENCY
        .with_label_values(&[source.as_str()])
        .observe(started.elapsed().as_secs_f64());

    if let Err(e) = result {
        let kind = e.upstream_kind().unwrap_or("other");
        UPSTREAM_FAILURES.with_label_values(&[source.as_str(), kind]).inc();
        tracing::warn!("Fetch from {} failed: {}", source, e);
    }
}

