use rust_decimal::Decimal;

use super::instruments_model::{Instrument, InstrumentUpdate, NewInstrument};
use super::instruments_errors::Result;

/// Read/write interface over the instrument registry. The planner only ever
/// consumes immutable snapshots obtained through `list_instruments`.
pub trait InstrumentServiceTrait: Send + Sync {
    fn create_instrument(&self, new_instrument: NewInstrument) -> Result<Instrument>;
    fn get_instrument(&self, instrument_id: &str) -> Result<Instrument>;
    fn get_instrument_by_ticker(&self, ticker: &str) -> Result<Option<Instrument>>;
    fn list_instruments(&self) -> Result<Vec<Instrument>>;
    fn update_instrument(&self, update: InstrumentUpdate) -> Result<Instrument>;
    fn delete_instrument(&self, instrument_id: &str) -> Result<()>;
    fn update_price(&self, instrument_id: &str, price: Decimal) -> Result<()>;
    fn update_resolved_symbol(&self, instrument_id: &str, symbol: &str) -> Result<()>;
}
