use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::db::DbPool;
use crate::instruments::Result;

use super::instruments_model::{Instrument, InstrumentUpdate, NewInstrument};
use super::instruments_repository::InstrumentRepository;
use super::instruments_traits::InstrumentServiceTrait;

/// Service for managing the instrument registry
pub struct InstrumentService {
    repository: InstrumentRepository,
}

impl InstrumentService {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            repository: InstrumentRepository::new(pool),
        }
    }
}

impl InstrumentServiceTrait for InstrumentService {
    fn create_instrument(&self, new_instrument: NewInstrument) -> Result<Instrument> {
        debug!(
            "Registering instrument {} (target {}%)",
            new_instrument.ticker, new_instrument.target_pct
        );
        self.repository.create(new_instrument)
    }

    fn get_instrument(&self, instrument_id: &str) -> Result<Instrument> {
        self.repository.get_by_id(instrument_id)
    }

    fn get_instrument_by_ticker(&self, ticker: &str) -> Result<Option<Instrument>> {
        self.repository.get_by_ticker(ticker)
    }

    fn list_instruments(&self) -> Result<Vec<Instrument>> {
        self.repository.list()
    }

    fn update_instrument(&self, update: InstrumentUpdate) -> Result<Instrument> {
        self.repository.update(update)
    }

    fn delete_instrument(&self, instrument_id: &str) -> Result<()> {
        self.repository.delete(instrument_id)?;
        Ok(())
    }

    fn update_price(&self, instrument_id: &str, price: Decimal) -> Result<()> {
        self.repository.update_price(instrument_id, price)
    }

    fn update_resolved_symbol(&self, instrument_id: &str, symbol: &str) -> Result<()> {
        self.repository.update_resolved_symbol(instrument_id, symbol)
    }
}
