// Module declarations
pub(crate) mod holdings_model;
pub(crate) mod holdings_service;
pub(crate) mod holdings_traits;

// Re-export the public interface
pub use holdings_model::HoldingSnapshot;
pub use holdings_service::HoldingsService;
pub use holdings_traits::HoldingsServiceTrait;
