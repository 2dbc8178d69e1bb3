use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::exchanges::types::{QuoteRequest, RawQuote};
use crate::shared::errors::QuoteError;
use super::QuoteApiClient;

pub const DEFAULT_QUOTE_URL: &str = "https://quote-api.jup.ag/v6/quote";

/// Jupiter aggregator quote API client
pub struct JupiterQuoteApiClient {
    http_client: Client,
    base_url: String,
}

impl JupiterQuoteApiClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_QUOTE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn query_params(request: &QuoteRequest) -> [(&'static str, String); 4] {
        [
            ("inputMint", request.input_mint.to_string()),
            ("outputMint", request.output_mint.to_string()),
            ("amount", request.amount.to_string()),
            ("slippageBps", request.slippage_bps.to_string()),
        ]
    }
}

impl Default for JupiterQuoteApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteApiClient for JupiterQuoteApiClient {
    async fn get_quote(&self, request: &QuoteRequest) -> Result<RawQuote, QuoteError> {
        debug!(
            "Fetching quote {} -> {} amount={}",
            request.input_mint, request.output_mint, request.amount
        );

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&Self::query_params(request))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(QuoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        RawQuote::from_json(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::pubkey::Pubkey;

    #[test]
    fn test_query_params_use_atomic_amount_string() {
        let request = QuoteRequest {
            input_mint: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".parse().unwrap(),
            output_mint: Pubkey::new_from_array([7; 32]),
            amount: 1_000_000_000_000_000_000_000,
            slippage_bps: 10,
        };
        let params = JupiterQuoteApiClient::query_params(&request);
        assert_eq!(params[0], ("inputMint", "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".to_string()));
        assert_eq!(params[1], ("outputMint", request.output_mint.to_string()));
        assert_eq!(params[2], ("amount", "1000000000000000000000".to_string()));
        assert_eq!(params[3], ("slippageBps", "10".to_string()));
    }

    #[test]
    fn test_default_url() {
        assert_eq!(JupiterQuoteApiClient::default().base_url(), DEFAULT_QUOTE_URL);
        assert_eq!(JupiterQuoteApiClient::with_base_url("http://localhost:8080/quote").base_url(), "http://localhost:8080/quote");
    }
}
