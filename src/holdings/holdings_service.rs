use rust_decimal::Decimal;
use std::sync::Arc;

use crate::db::DbPool;
use crate::errors::Result;
use crate::instruments::{InstrumentError, InstrumentRepository};
use crate::transactions::TransactionRepository;

use super::holdings_model::HoldingSnapshot;
use super::holdings_traits::HoldingsServiceTrait;

/// Computes derived positions from the transaction log. Market values always
/// use the instrument's current last price, not historical buy prices.
pub struct HoldingsService {
    instrument_repository: InstrumentRepository,
    transaction_repository: TransactionRepository,
}

impl HoldingsService {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            instrument_repository: InstrumentRepository::new(pool.clone()),
            transaction_repository: TransactionRepository::new(pool),
        }
    }
}

impl HoldingsServiceTrait for HoldingsService {
    fn holdings_for(&self, instrument_id: &str) -> Result<HoldingSnapshot> {
        let instrument = match self.instrument_repository.get_by_id(instrument_id) {
            Ok(instrument) => instrument,
            // An unknown instrument holds nothing rather than being an error
            Err(InstrumentError::NotFound(_)) => {
                return Ok(HoldingSnapshot::empty(instrument_id))
            }
            Err(e) => return Err(e.into()),
        };

        let shares: Decimal = self
            .transaction_repository
            .list_for_instrument(instrument_id)?
            .iter()
            .map(|t| t.shares)
            .sum();

        let market_value = instrument
            .usable_price()
            .map(|price| shares * price)
            .unwrap_or_default();

        Ok(HoldingSnapshot {
            instrument_id: instrument_id.to_string(),
            shares,
            market_value,
        })
    }

    fn invested_for(&self, instrument_id: &str) -> Result<Decimal> {
        let invested = self
            .transaction_repository
            .list_for_instrument(instrument_id)?
            .iter()
            .map(|t| t.amount + t.commission)
            .sum();

        Ok(invested)
    }

    fn portfolio_value(&self) -> Result<Decimal> {
        let mut total = Decimal::ZERO;
        for instrument in self.instrument_repository.list()? {
            total += self.holdings_for(&instrument.id)?.market_value;
        }
        Ok(total)
    }
}
