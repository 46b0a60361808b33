use async_trait::async_trait;
use serde::Deserialize;
use crate::fee_sources::connectors::EthGasSource;
use crate::fee_sources::{GasTiers, SourceId};
use crate::error::{Error, Result};

pub const DEFAULT_GAS_ORACLE_URL: &str = "https://api.etherscan.io/api";

pub struct EtherscanClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl EtherscanClient {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        EtherscanClient {
            http,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl EthGasSource for EtherscanClient {
    async fn gas_tiers(&self) -> Result<GasTiers> {
        let response = self.http.get(&self.base_url)
            .query(&[
                ("module", "gastracker"),
                ("action", "gasoracle"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            // reqwest errors carry the request URL, which includes the key
            .map_err(|e| Error::unavailable(SourceId::Eth, e.without_url()))?;

        let body = response.text()
            .await
            .map_err(|e| Error::unavailable(SourceId::Eth, e.without_url()))?;

        let envelope: GasOracleEnvelope = serde_json::from_str(&body)
            .map_err(|e| Error::malformed(SourceId::Eth, e))?;

        // On rejection Etherscan answers 200 with a string `result`.
        let result: GasOracleResult = match envelope.result {
            serde_json::Value::Object(_) => serde_json::from_value(envelope.result)
                .map_err(|e| Error::malformed(SourceId::Eth, e))?,
            other => {
                return Err(Error::malformed(
                    SourceId::Eth,
                    format!("gas oracle rejected request ({}): {}", envelope.message, other),
                ));
            }
        };

        let tiers = GasTiers {
            safe: parse_tier("SafeGasPrice", &result.safe_gas_price)?,
            propose: parse_tier("ProposeGasPrice", &result.propose_gas_price)?,
            fast: parse_tier("FastGasPrice", &result.fast_gas_price)?,
        };

        tracing::debug!(
            "Gas tiers: safe={} propose={} fast={}",
            tiers.safe, tiers.propose, tiers.fast
        );
        Ok(tiers)
    }
}

fn parse_tier(name: &str, raw: &str) -> Result<f64> {
    let value: f64 = raw.trim().parse()
        .map_err(|_| Error::malformed(SourceId::Eth, format!("{} is not numeric: {:?}", name, raw)))?;

    if !value.is_finite() || value < 0.0 {
        return Err(Error::malformed(SourceId::Eth, format!("{} out of range: {}", name, value)));
    }
    Ok(value)
}

#[derive(Deserialize)]
struct GasOracleEnvelope {
    #[serde(default)]
    message: String,
    result: serde_json::Value,
}

#[derive(Deserialize)]
struct GasOracleResult {
    #[serde(rename = "SafeGasPrice")]
    safe_gas_price: String,
    #[serde(rename = "ProposeGasPrice")]
    propose_gas_price: String,
    #[serde(rename = "FastGasPrice")]
    fast_gas_price: String,
}
