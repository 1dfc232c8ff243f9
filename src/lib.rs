pub mod db;

pub mod holdings;
pub mod instruments;
pub mod market_data;
pub mod planner;
pub mod transactions;

pub mod constants;
pub mod errors;
pub mod schema;

pub use errors::{Error, Result};
pub use planner::*;
