pub mod api_clients;
pub mod types;

pub use api_clients::{JupiterQuoteApiClient, QuoteApiClient};
pub use types::{Quote, QuoteRequest, RawQuote};
