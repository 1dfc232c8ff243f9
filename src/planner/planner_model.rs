use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the requested cash amount is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlanMode {
    /// Allocate the fresh amount purely by each instrument's target percentage
    New,
    /// Target `(portfolio value + amount) × target_pct`, buy the shortfall only
    Rebalance,
}

/// One instrument's line in a buy plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanRow {
    pub instrument_id: String,
    pub ticker: String,
    pub target_pct: Decimal,
    pub current_shares: Decimal,
    pub last_price: Option<Decimal>,
    pub current_value: Decimal,
    pub target_value: Decimal,
    pub to_buy_amount: Decimal,
    /// `None` means "cannot plan" (no usable price), distinct from a zero buy
    pub to_buy_shares: Option<Decimal>,
}

/// A complete buy plan. Produced fresh on every invocation and never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub mode: PlanMode,
    pub amount: Decimal,
    pub precision: u32,
    pub total_current: Decimal,
    pub total_after: Decimal,
    pub rows: Vec<PlanRow>,
    pub planned_spend: Decimal,
    pub leftover: Decimal,
    pub missing_prices: Vec<String>,
}
