use chrono::NaiveDateTime;
use diesel::prelude::*;
use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::instruments_errors::{InstrumentError, Result};

/// Domain model representing a tracked ETF/fund with a target allocation
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub id: String,
    pub ticker: String,
    pub target_pct: Decimal,
    pub supports_fractions: bool,
    pub resolved_symbol: Option<String>,
    pub last_price: Option<Decimal>,
    pub last_updated: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl Instrument {
    /// A price that is absent or non-positive cannot be used for planning.
    pub fn usable_price(&self) -> Option<Decimal> {
        self.last_price.filter(|p| *p > Decimal::ZERO)
    }
}

/// Input model for registering a new instrument
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInstrument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub ticker: String,
    pub target_pct: Decimal,
    pub supports_fractions: bool,
}

impl NewInstrument {
    pub fn validate(&self) -> Result<()> {
        if self.ticker.trim().is_empty() {
            return Err(InstrumentError::InvalidData(
                "Ticker cannot be empty".to_string(),
            ));
        }
        if self.target_pct < Decimal::ZERO {
            return Err(InstrumentError::InvalidData(
                "Target percentage cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Input model for updating an instrument's allocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentUpdate {
    pub id: String,
    pub target_pct: Option<Decimal>,
    pub supports_fractions: Option<bool>,
}

impl InstrumentUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(InstrumentError::InvalidData(
                "Instrument ID is required for updates".to_string(),
            ));
        }
        if let Some(pct) = self.target_pct {
            if pct < Decimal::ZERO {
                return Err(InstrumentError::InvalidData(
                    "Target percentage cannot be negative".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Database model for instruments
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::instruments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InstrumentDB {
    pub id: String,
    pub ticker: String,
    pub target_pct: f64,
    pub supports_fractions: bool,
    pub resolved_symbol: Option<String>,
    pub last_price: Option<f64>,
    pub last_updated: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

// Conversion implementations
impl From<InstrumentDB> for Instrument {
    fn from(db: InstrumentDB) -> Self {
        Self {
            id: db.id,
            ticker: db.ticker,
            target_pct: Decimal::from_f64(db.target_pct).unwrap_or_default(),
            supports_fractions: db.supports_fractions,
            resolved_symbol: db.resolved_symbol,
            last_price: db.last_price.and_then(Decimal::from_f64),
            last_updated: db.last_updated,
            created_at: db.created_at,
        }
    }
}

impl From<NewInstrument> for InstrumentDB {
    fn from(domain: NewInstrument) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: domain.id.unwrap_or_default(),
            ticker: domain.ticker.trim().to_uppercase(),
            target_pct: domain.target_pct.to_f64().unwrap_or_default(),
            supports_fractions: domain.supports_fractions,
            resolved_symbol: None,
            last_price: None,
            last_updated: None,
            created_at: now,
        }
    }
}
