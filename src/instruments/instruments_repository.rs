use diesel::prelude::*;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::db::{get_connection, DbPool};
use crate::instruments::{InstrumentError, Result};
use crate::schema::instruments;
use crate::schema::instruments::dsl::*;

use super::instruments_model::{Instrument, InstrumentDB, InstrumentUpdate, NewInstrument};

/// Repository for managing instrument records in the database
pub struct InstrumentRepository {
    pool: Arc<DbPool>,
}

impl InstrumentRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<crate::db::DbConnection> {
        get_connection(&self.pool).map_err(|e| InstrumentError::DatabaseError(e.to_string()))
    }

    /// Registers a new instrument
    pub fn create(&self, new_instrument: NewInstrument) -> Result<Instrument> {
        new_instrument.validate()?;

        let mut instrument_db: InstrumentDB = new_instrument.into();
        instrument_db.id = uuid::Uuid::new_v4().to_string();

        let mut conn = self.conn()?;
        diesel::insert_into(instruments::table)
            .values(&instrument_db)
            .execute(&mut conn)?;

        Ok(instrument_db.into())
    }

    /// Retrieves an instrument by its ID
    pub fn get_by_id(&self, instrument_id: &str) -> Result<Instrument> {
        let mut conn = self.conn()?;

        let instrument = instruments
            .find(instrument_id)
            .first::<InstrumentDB>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => InstrumentError::NotFound(format!(
                    "Instrument with id {} not found",
                    instrument_id
                )),
                _ => InstrumentError::DatabaseError(e.to_string()),
            })?;

        Ok(instrument.into())
    }

    /// Retrieves an instrument by its display ticker (case-insensitive)
    pub fn get_by_ticker(&self, symbol: &str) -> Result<Option<Instrument>> {
        let mut conn = self.conn()?;

        let instrument = instruments
            .filter(ticker.eq(symbol.trim().to_uppercase()))
            .first::<InstrumentDB>(&mut conn)
            .optional()?;

        Ok(instrument.map(Instrument::from))
    }

    /// Lists all instruments ordered by creation time
    pub fn list(&self) -> Result<Vec<Instrument>> {
        let mut conn = self.conn()?;

        instruments
            .order(created_at.asc())
            .load::<InstrumentDB>(&mut conn)
            .map_err(|e| InstrumentError::DatabaseError(e.to_string()))
            .map(|results| results.into_iter().map(Instrument::from).collect())
    }

    /// Updates an instrument's allocation settings
    pub fn update(&self, update: InstrumentUpdate) -> Result<Instrument> {
        update.validate()?;

        let mut conn = self.conn()?;

        let mut existing = instruments
            .find(&update.id)
            .first::<InstrumentDB>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => InstrumentError::NotFound(format!(
                    "Instrument with id {} not found",
                    update.id
                )),
                _ => InstrumentError::DatabaseError(e.to_string()),
            })?;

        if let Some(pct) = update.target_pct {
            existing.target_pct = pct.to_f64().unwrap_or_default();
        }
        if let Some(fractions) = update.supports_fractions {
            existing.supports_fractions = fractions;
        }

        diesel::update(instruments.find(&existing.id))
            .set(&existing)
            .execute(&mut conn)?;

        Ok(existing.into())
    }

    /// Deletes an instrument; its transactions are removed by cascade
    pub fn delete(&self, instrument_id: &str) -> Result<usize> {
        let mut conn = self.conn()?;

        let affected = diesel::delete(instruments.find(instrument_id)).execute(&mut conn)?;

        if affected == 0 {
            return Err(InstrumentError::NotFound(format!(
                "Instrument with id {} not found",
                instrument_id
            )));
        }

        Ok(affected)
    }

    /// Stores a freshly fetched price and stamps the refresh time
    pub fn update_price(&self, instrument_id: &str, price: Decimal) -> Result<()> {
        let mut conn = self.conn()?;

        diesel::update(instruments.find(instrument_id))
            .set((
                last_price.eq(price.to_f64()),
                last_updated.eq(Some(chrono::Utc::now().naive_utc())),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    /// Caches the provider symbol that actually produced a price
    pub fn update_resolved_symbol(&self, instrument_id: &str, symbol: &str) -> Result<()> {
        let mut conn = self.conn()?;

        diesel::update(instruments.find(instrument_id))
            .set(resolved_symbol.eq(Some(symbol.to_uppercase())))
            .execute(&mut conn)?;

        Ok(())
    }
}
