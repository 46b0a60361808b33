use serde::Deserialize;
use crate::observability::tracing::LogFormat;
use crate::sampling::policy::FailurePolicy;

pub mod sources;
pub mod schedule;
pub mod loader;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            url: "sqlite://fee_heartbeat.db?mode=rwc".to_string(),
            max_connections: 4,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub failure_policy: FailurePolicy,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}
