use rust_decimal::Decimal;

use crate::errors::Result;

use super::holdings_model::HoldingSnapshot;

/// Read-only view over derived positions, consumed by the planner and the
/// dashboard.
pub trait HoldingsServiceTrait: Send + Sync {
    /// (total shares, current market value) for one instrument
    fn holdings_for(&self, instrument_id: &str) -> Result<HoldingSnapshot>;
    /// Total money put in: transaction amounts plus commissions
    fn invested_for(&self, instrument_id: &str) -> Result<Decimal>;
    /// Sum of every instrument's current market value
    fn portfolio_value(&self) -> Result<Decimal>;
}
