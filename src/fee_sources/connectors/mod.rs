pub mod blockstream;
pub mod etherscan;

use async_trait::async_trait;
use crate::fee_sources::GasTiers;
use crate::error::Result;

/// Bitcoin fee-rate oracle. One attempt per call.
#[async_trait]
pub trait BtcFeeSource: Send + Sync {
    /// Fastest-confirmation (next block) fee rate in sats/vB.
    async fn fastest_fee_rate(&self) -> Result<f64>;
}

/// Ethereum gas-price oracle. One attempt per call.
#[async_trait]
pub trait EthGasSource: Send + Sync {
    async fn gas_tiers(&self) -> Result<GasTiers>;
}
