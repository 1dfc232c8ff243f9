/// Default number of decimal places shares are floored to when planning buys
/// for instruments that support fractional units.
pub const DEFAULT_PLAN_PRECISION: u32 = 6;

/// Leftover cash below this threshold is not worth redistributing.
pub const LEFTOVER_EPSILON: &str = "0.001";

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;
