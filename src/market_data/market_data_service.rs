use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;

use crate::db::DbPool;
use crate::errors::Result;
use crate::instruments::InstrumentRepository;

use super::market_data_model::PriceRefresh;
use super::resolver::MarketMap;
use super::yahoo_provider::QuoteProvider;

#[async_trait]
pub trait MarketDataServiceTrait: Send + Sync {
    /// Refreshes the stored last price of every registered instrument.
    async fn refresh_prices(&self) -> Result<Vec<PriceRefresh>>;
}

pub struct MarketDataService {
    instrument_repository: InstrumentRepository,
    provider: Arc<dyn QuoteProvider>,
    market_map: Arc<MarketMap>,
}

impl MarketDataService {
    pub fn new(pool: Arc<DbPool>, provider: Arc<dyn QuoteProvider>, market_map: Arc<MarketMap>) -> Self {
        Self {
            instrument_repository: InstrumentRepository::new(pool),
            provider,
            market_map,
        }
    }
}

#[async_trait]
impl MarketDataServiceTrait for MarketDataService {
    async fn refresh_prices(&self) -> Result<Vec<PriceRefresh>> {
        let instruments = self.instrument_repository.list()?;
        let mut refreshed = Vec::with_capacity(instruments.len());

        for instrument in instruments {
            let candidates = self.market_map.candidates_for(&instrument.ticker);
            let mut outcome = PriceRefresh {
                instrument_id: instrument.id.clone(),
                ticker: instrument.ticker.clone(),
                resolved_symbol: None,
                price: None,
            };

            for candidate in candidates {
                match self.provider.latest_close(&candidate).await {
                    Ok(price) => {
                        self.instrument_repository
                            .update_price(&instrument.id, price)?;
                        if candidate != instrument.ticker.to_uppercase() {
                            debug!("Resolved {} -> {}", instrument.ticker, candidate);
                            self.instrument_repository
                                .update_resolved_symbol(&instrument.id, &candidate)?;
                            outcome.resolved_symbol = Some(candidate);
                        }
                        outcome.price = Some(price);
                        break;
                    }
                    Err(e) => {
                        debug!("Error fetching {}: {}", candidate, e);
                        continue;
                    }
                }
            }

            match outcome.price {
                Some(price) => info!("Updated {} -> {}", instrument.ticker, price),
                None => warn!("No price found for {}", instrument.ticker),
            }
            refreshed.push(outcome);
        }

        Ok(refreshed)
    }
}
