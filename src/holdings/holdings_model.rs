use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Derived position for a single instrument. Never stored; recomputed from
/// the transaction log and the instrument's current last price.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HoldingSnapshot {
    pub instrument_id: String,
    /// Sum of all recorded buy share quantities
    pub shares: Decimal,
    /// shares × current last price; zero when the instrument is unpriced
    pub market_value: Decimal,
}

impl HoldingSnapshot {
    pub fn empty(instrument_id: &str) -> Self {
        Self {
            instrument_id: instrument_id.to_string(),
            ..Default::default()
        }
    }
}
