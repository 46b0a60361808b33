use serde::Deserialize;
use tracing::Span;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;
use crate::fee_sources::SourceId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Install the global subscriber. `RUST_LOG` overrides the `info` default.
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

pub fn trace_sample_run(run_id: &Uuid) -> Span {
    tracing::info_span!(
        "sample_run",
        run_id = %run_id,
    )
}

pub fn trace_upstream_fetch(source: SourceId) -> Span {
    tracing::info_span!(
        "upstream_fetch",
        source = %source,
    )
}
