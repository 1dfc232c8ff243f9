use async_trait::async_trait;
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use yahoo_finance_api as yahoo;

use super::market_data_errors::MarketDataError;

/// Source of latest close prices, keyed by provider symbol.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn latest_close(&self, symbol: &str) -> Result<Decimal, MarketDataError>;
}

pub struct YahooProvider {
    provider: yahoo::YahooConnector,
}

impl YahooProvider {
    pub fn new() -> Result<Self, MarketDataError> {
        let provider = yahoo::YahooConnector::new()?;
        Ok(YahooProvider { provider })
    }
}

#[async_trait]
impl QuoteProvider for YahooProvider {
    async fn latest_close(&self, symbol: &str) -> Result<Decimal, MarketDataError> {
        let response = self.provider.get_latest_quotes(symbol, "1d").await?;
        let quote = response
            .last_quote()
            .map_err(|_| MarketDataError::NotFound(format!("No quotes found for {}", symbol)))?;

        Decimal::from_f64(quote.close)
            .filter(|close| *close > Decimal::ZERO)
            .ok_or_else(|| {
                MarketDataError::InvalidData(format!("Empty close price for {}", symbol))
            })
    }
}
