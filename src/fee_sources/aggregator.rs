use crate::fee_sources::GasTiers;

/// Representative ETH gas price: arithmetic mean of the three oracle tiers.
pub fn eth_gas_price(tiers: &GasTiers) -> f64 {
    (tiers.safe + tiers.propose + tiers.fast) / 3.0
}

/// Representative BTC fee rate. The fastest tier is used as-is.
pub fn btc_fee_rate(fastest: f64) -> f64 {
    fastest
}
