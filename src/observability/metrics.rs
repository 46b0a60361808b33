use lazy_static::lazy_static;
use prometheus::{
    Encoder, Gauge, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // Pipeline metrics
    pub static ref SAMPLE_RUNS: IntCounterVec = IntCounterVec::new(
        Opts::new("fee_sample_runs_total", "Pipeline runs by outcome"),
        &["outcome"]
    ).unwrap();

    // Upstream metrics
    pub static ref UPSTREAM_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new("fee_upstream_failures_total", "Failed upstream fee fetches"),
        &["source", "kind"]
    ).unwrap();

    pub static ref UPSTREAM_FETCH_LATENCY: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "fee_upstream_fetch_seconds",
            "Upstream fee fetch latency"
        ).buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["source"]
    ).unwrap();

    // Last observed values
    pub static ref LAST_BTC_FEE_RATE: Gauge = Gauge::new(
        "fee_last_btc_fee_rate",
        "Last fetched BTC fastest fee rate (sats/vB)"
    ).unwrap();

    pub static ref LAST_ETH_GAS_PRICE: Gauge = Gauge::new(
        "fee_last_eth_gas_price",
        "Last derived ETH gas price (gwei)"
    ).unwrap();
}

/// Register all collectors with [`REGISTRY`]. Safe to call more than once.
pub fn register_metrics() -> prometheus::Result<()> {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(SAMPLE_RUNS.clone()),
        Box::new(UPSTREAM_FAILURES.clone()),
        Box::new(UPSTREAM_FETCH_LATENCY.clone()),
        Box::new(LAST_BTC_FEE_RATE.clone()),
        Box::new(LAST_ETH_GAS_PRICE.clone()),
    ];

    for collector in collectors {
        match REGISTRY.register(collector) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Text exposition of everything in [`REGISTRY`].
pub fn render() -> prometheus::Result<String> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
