use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of one instrument's price refresh. A `None` price means every
/// candidate symbol came back empty and the instrument keeps its old price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRefresh {
    pub instrument_id: String,
    pub ticker: String,
    /// Provider symbol that produced the price, when it differs from the ticker
    pub resolved_symbol: Option<String>,
    pub price: Option<Decimal>,
}
