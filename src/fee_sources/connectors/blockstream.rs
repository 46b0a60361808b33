use async_trait::async_trait;
use std::collections::HashMap;
use crate::fee_sources::connectors::BtcFeeSource;
use crate::fee_sources::SourceId;
use crate::error::{Error, Result};

pub const DEFAULT_FEE_ESTIMATES_URL: &str = "https://blockstream.info/api/fee-estimates";

// Confirmation target, in blocks, of the fastest estimate.
const NEXT_BLOCK_TARGET: &str = "1";

pub struct BlockstreamClient {
    http: reqwest::Client,
    url: String,
}

impl BlockstreamClient {
    pub fn new(http: reqwest::Client, url: &str) -> Self {
        BlockstreamClient {
            http,
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl BtcFeeSource for BlockstreamClient {
    async fn fastest_fee_rate(&self) -> Result<f64> {
        let response = self.http.get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::unavailable(SourceId::Btc, e))?;

        let body = response.text()
            .await
            .map_err(|e| Error::unavailable(SourceId::Btc, e))?;

        let estimates: FeeEstimates = serde_json::from_str(&body)
            .map_err(|e| Error::malformed(SourceId::Btc, e))?;

        let entry = estimates.0.get(NEXT_BLOCK_TARGET)
            .ok_or_else(|| Error::malformed(
                SourceId::Btc,
                format!("no estimate for {}-block target", NEXT_BLOCK_TARGET),
            ))?;
        let rate = entry.as_f64()
            .ok_or_else(|| Error::malformed(SourceId::Btc, format!("fee rate {} is not a number", entry)))?;

        if !rate.is_finite() || rate <= 0.0 {
            return Err(Error::malformed(SourceId::Btc, format!("fee rate {} is not positive", rate)));
        }

        tracing::debug!("Fastest fee (next block): {} sats/vB", rate);
        Ok(rate)
    }
}

/// Confirmation target (blocks) -> fee rate (sats/vB). Only the target we
/// read is checked, so odd values elsewhere don't sink the response.
#[derive(serde::Deserialize)]
struct FeeEstimates(HashMap<String, serde_json::Value>);
