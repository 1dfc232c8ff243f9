// Module declarations
pub(crate) mod market_data_errors;
pub(crate) mod market_data_model;
pub(crate) mod market_data_service;
pub(crate) mod resolver;
pub(crate) mod yahoo_provider;

// Re-export the public interface
pub use market_data_model::PriceRefresh;
pub use market_data_service::{MarketDataService, MarketDataServiceTrait};
pub use resolver::{MarketMap, MarketMapOverrides};
pub use yahoo_provider::{QuoteProvider, YahooProvider};

// Re-export error types for convenience
pub use market_data_errors::MarketDataError;
