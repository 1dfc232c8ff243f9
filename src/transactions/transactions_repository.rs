use diesel::prelude::*;
use std::sync::Arc;

use crate::db::{get_connection, DbPool};
use crate::errors::Result;
use crate::schema::transactions;
use crate::schema::transactions::dsl::*;

use super::transactions_model::{NewTransaction, Transaction, TransactionDB};

/// Repository for the buy-transaction record store
pub struct TransactionRepository {
    pool: Arc<DbPool>,
}

impl TransactionRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Records a buy against an instrument
    pub fn create(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        new_transaction.validate()?;

        let mut transaction_db: TransactionDB = new_transaction.into();
        transaction_db.id = uuid::Uuid::new_v4().to_string();

        let mut conn = get_connection(&self.pool)?;
        diesel::insert_into(transactions::table)
            .values(&transaction_db)
            .execute(&mut conn)?;

        Ok(transaction_db.into())
    }

    /// Lists all transactions for an instrument ordered by date
    pub fn list_for_instrument(&self, instrument: &str) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        let results = transactions
            .filter(instrument_id.eq(instrument))
            .order(txn_date.asc())
            .load::<TransactionDB>(&mut conn)?;

        Ok(results.into_iter().map(Transaction::from).collect())
    }

    /// Lists every recorded transaction
    pub fn list_all(&self) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        let results = transactions
            .order(txn_date.asc())
            .load::<TransactionDB>(&mut conn)?;

        Ok(results.into_iter().map(Transaction::from).collect())
    }
}
