use log::debug;
use std::sync::Arc;

use crate::db::DbPool;
use crate::errors::Result;

use super::transactions_model::{NewTransaction, Transaction};
use super::transactions_repository::TransactionRepository;

/// Service for recording and listing buy transactions
pub struct TransactionService {
    repository: TransactionRepository,
}

impl TransactionService {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            repository: TransactionRepository::new(pool),
        }
    }

    pub fn record_buy(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        debug!(
            "Recording buy: {} shares of instrument {} at {}",
            new_transaction.shares, new_transaction.instrument_id, new_transaction.price
        );
        self.repository.create(new_transaction)
    }

    pub fn list_for_instrument(&self, instrument_id: &str) -> Result<Vec<Transaction>> {
        self.repository.list_for_instrument(instrument_id)
    }
}
