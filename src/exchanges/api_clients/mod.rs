pub mod jupiter_quote_client;

pub use jupiter_quote_client::JupiterQuoteApiClient;

use async_trait::async_trait;

use crate::exchanges::types::{QuoteRequest, RawQuote};
use crate::shared::errors::QuoteError;

/// Source of swap quotes in atomic units.
#[async_trait]
pub trait QuoteApiClient: Send + Sync {
    async fn get_quote(&self, request: &QuoteRequest) -> Result<RawQuote, QuoteError>;
}
