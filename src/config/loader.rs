use std::path::Path;
use crate::config::schedule::ScheduleConfig;
use crate::config::sources::SourcesConfig;
use crate::config::*;
use crate::error::{Error, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;

pub const ENV_PREFIX: &str = "FEE_HEARTBEAT";

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub sources: SourcesConfig,
    pub schedule: ScheduleConfig,
    pub sampling: SamplingConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Defaults, then `config/default.toml` (or `file`), then
    /// `FEE_HEARTBEAT__SECTION__KEY` environment variables.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let builder = match file {
            Some(path) => Config::builder().add_source(File::from(path)),
            None => Config::builder().add_source(File::with_name("config/default").required(false)),
        };

        Self::build(builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__")))
    }

    pub fn from_toml(toml: &str) -> Result<Self> {
        Self::build(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config: AppConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| Error::ConfigError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sources.eth_api_key.trim().is_empty() {
            return Err(Error::ConfigError("sources.eth_api_key is required".to_string()));
        }
        if self.schedule.cadence_secs == 0 {
            return Err(Error::ConfigError("schedule.cadence_secs must be positive".to_string()));
        }
        if self.store.max_connections == 0 {
            return Err(Error::ConfigError("store.max_connections must be positive".to_string()));
        }
        Ok(())
    }
}
