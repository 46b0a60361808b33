use chrono::{DateTime, Local, SecondsFormat, TimeZone, Timelike, Utc};
use serde::{Serialize, Serializer};

/// One timestamped fee observation.
///
/// `hour_of_day` is the wall-clock hour of `taken_at` on the host, derived by
/// the constructor so the two can never disagree. Missing currency fields mean "unknown" and
/// are omitted from the JSON form rather than written as zero.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Sample {
    #[serde(rename = "date", serialize_with = "serialize_millis")]
    taken_at: DateTime<Utc>,
    #[serde(rename = "hour")]
    hour_of_day: u32,
    #[serde(rename = "BTCGasFee", skip_serializing_if = "Option::is_none")]
    btc_fee_rate: Option<f64>,
    #[serde(rename = "ETHGasFee", skip_serializing_if = "Option::is_none")]
    eth_gas_price: Option<f64>,
}

impl Sample {
    pub fn new(taken_at: DateTime<Utc>, btc_fee_rate: Option<f64>, eth_gas_price: Option<f64>) -> Self {
        Sample::in_zone(taken_at, &Local, btc_fee_rate, eth_gas_price)
    }

    /// Like [`Sample::new`], reading the hour off the clock of `zone`.
    pub fn in_zone<Tz: TimeZone>(
        taken_at: DateTime<Utc>,
        zone: &Tz,
        btc_fee_rate: Option<f64>,
        eth_gas_price: Option<f64>,
    ) -> Self {
        let taken_at = truncate_to_millis(taken_at);
        Sample {
            taken_at,
            hour_of_day: taken_at.with_timezone(zone).hour(),
            btc_fee_rate,
            eth_gas_price,
        }
    }

    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    pub fn hour_of_day(&self) -> u32 {
        self.hour_of_day
    }

    pub fn btc_fee_rate(&self) -> Option<f64> {
        self.btc_fee_rate
    }

    pub fn eth_gas_price(&self) -> Option<f64> {
        self.eth_gas_price
    }

    pub fn is_complete(&self) -> bool {
        self.btc_fee_rate.is_some() && self.eth_gas_price.is_some()
    }
}

/// Storage keeps millisecond precision, so samples do too.
pub fn truncate_to_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or(at)
}

fn serialize_millis<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}
