//! Stablescan - Solana stablecoin pair monitor
//! Searches each ordered stablecoin pair for the most profitable trade size

pub mod app;
pub mod config;
pub mod exchanges;
pub mod opportunity;
pub mod registry;
pub mod report;
pub mod shared;

// Re-export main types for convenience
pub use exchanges::{JupiterQuoteApiClient, Quote, QuoteApiClient};
pub use opportunity::{OptimalTradeSearch, PairScheduler, ScanParams};
pub use registry::AssetRegistry;
