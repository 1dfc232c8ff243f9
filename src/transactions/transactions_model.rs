use chrono::NaiveDateTime;
use diesel::prelude::*;
use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// Domain model for a recorded buy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub instrument_id: String,
    pub txn_date: NaiveDateTime,
    pub price: Decimal,
    pub shares: Decimal,
    pub amount: Decimal,
    pub commission: Decimal,
}

/// Input model for recording a buy. The cash amount is derived from
/// price × shares at insert time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub instrument_id: String,
    pub price: Decimal,
    pub shares: Decimal,
    pub commission: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txn_date: Option<NaiveDateTime>,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        if self.instrument_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "instrumentId".to_string(),
            )));
        }
        if self.price <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Price must be positive".to_string(),
            )));
        }
        if self.shares <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Share quantity must be positive".to_string(),
            )));
        }
        if self.commission < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Commission cannot be negative".to_string(),
            )));
        }
        Ok(())
    }
}

/// Database model for transactions
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
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub instrument_id: String,
    pub txn_date: NaiveDateTime,
    pub price: f64,
    pub shares: f64,
    pub amount: f64,
    pub commission: f64,
}

// Conversion implementations
impl From<TransactionDB> for Transaction {
    fn from(db: TransactionDB) -> Self {
        Self {
            id: db.id,
            instrument_id: db.instrument_id,
            txn_date: db.txn_date,
            price: Decimal::from_f64(db.price).unwrap_or_default(),
            shares: Decimal::from_f64(db.shares).unwrap_or_default(),
            amount: Decimal::from_f64(db.amount).unwrap_or_default(),
            commission: Decimal::from_f64(db.commission).unwrap_or_default(),
        }
    }
}

impl From<NewTransaction> for TransactionDB {
    fn from(domain: NewTransaction) -> Self {
        let amount = domain.price * domain.shares;
        Self {
            id: String::new(),
            instrument_id: domain.instrument_id,
            txn_date: domain
                .txn_date
                .unwrap_or_else(|| chrono::Utc::now().naive_utc()),
            price: domain.price.to_f64().unwrap_or_default(),
            shares: domain.shares.to_f64().unwrap_or_default(),
            amount: amount.to_f64().unwrap_or_default(),
            commission: domain.commission.to_f64().unwrap_or_default(),
        }
    }
}
