use std::sync::Arc;

use tracing::debug;

use crate::exchanges::types::{Quote, QuoteRequest};
use crate::exchanges::QuoteApiClient;
use crate::registry::AssetRegistry;
use crate::shared::errors::QuoteError;
use crate::shared::types::TradePair;
use crate::shared::utils::{from_atomic, input_token_price, to_atomic};

/// Finds the trade size with the best net gain by halving the input amount.
///
/// Each step quotes the current amount, and the search stops as soon as the
/// gain drops below the previous step's gain, returning the previous quote.
/// This is a local-maximum heuristic for a concave price-impact curve, not a
/// global optimum: it only compares adjacent steps, so a gain curve that dips
/// and recovers can end the search early. A sequence that never declines all
/// the way down to `min_amount` yields no result.
pub struct OptimalTradeSearch {
    client: Arc<dyn QuoteApiClient>,
    registry: Arc<AssetRegistry>,
    slippage_bps: u32,
}

impl OptimalTradeSearch {
    pub fn new(client: Arc<dyn QuoteApiClient>, registry: Arc<AssetRegistry>, slippage_bps: u32) -> Self {
        Self {
            client,
            registry,
            slippage_bps,
        }
    }

    /// Quote `amount` human units of the pair's input asset, normalized to human units.
    pub async fn fetch_quote(&self, pair: &TradePair, amount: f64) -> Result<Quote, QuoteError> {
        let input = self.registry.get(&pair.input)?;
        let output = self.registry.get(&pair.output)?;

        let atomic = to_atomic(amount, input.decimals).ok_or_else(|| QuoteError::InvalidAmount {
            field: "amount",
            value: format!("{} x 10^{}", amount, input.decimals),
        })?;
        let request = QuoteRequest {
            input_mint: input.mint,
            output_mint: output.mint,
            amount: atomic,
            slippage_bps: self.slippage_bps,
        };
        let raw = self.client.get_quote(&request).await?;

        Ok(Quote {
            in_amount: from_atomic(raw.in_amount, input.decimals),
            out_amount: from_atomic(raw.out_amount, output.decimals),
            price: input_token_price(raw.in_amount, raw.out_amount, input.decimals, output.decimals),
            extra: raw.extra,
        })
    }

    pub async fn search(
        &self,
        pair: &TradePair,
        start_amount: f64,
        min_amount: f64,
        network_fee_estimate: f64,
    ) -> Result<Option<Quote>, QuoteError> {
        let mut best_quote: Option<Quote> = None;
        let mut best_gain = 0.0;
        let mut amount = start_amount;

        while amount > min_amount {
            let quote = self.fetch_quote(pair, amount).await?;
            let gain = quote.gain(network_fee_estimate);
            debug!("{} amount={} gain={}", pair, amount, gain);

            if gain < best_gain {
                return Ok(best_quote);
            }

            best_quote = Some(quote);
            best_gain = gain;
            amount /= 2.0;
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opportunity::test_support::{test_registry, ScriptedQuoteClient};

    const FEE: f64 = 0.00001;

    fn pair(input: &str, output: &str) -> TradePair {
        TradePair::new(input.parse().unwrap(), output.parse().unwrap())
    }

    fn search_with(client: Arc<ScriptedQuoteClient>) -> OptimalTradeSearch {
        OptimalTradeSearch::new(client, Arc::new(test_registry()), 10)
    }

    #[tokio::test]
    async fn test_returns_quote_before_decline() {
        let client = Arc::new(ScriptedQuoteClient::with_gains(vec![5.0, 8.0, 3.0], FEE));
        let search = search_with(client.clone());

        let quote = search.search(&pair("A", "B"), 1000.0, 1.0, FEE).await.unwrap().unwrap();

        assert!((quote.in_amount - 500.0).abs() < 1e-9);
        assert!((quote.gain(FEE) - 8.0).abs() < 1e-6);
        assert_eq!(client.amounts(), vec![1_000_000_000, 500_000_000, 250_000_000]);
    }

    #[tokio::test]
    async fn test_first_amount_unprofitable_returns_none() {
        let client = Arc::new(ScriptedQuoteClient::with_gains(vec![-1.0], FEE));
        let search = search_with(client.clone());

        let result = search.search(&pair("A", "B"), 1000.0, 1.0, FEE).await.unwrap();

        assert!(result.is_none());
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_non_declining_gain_down_to_floor_returns_none() {
        // Profitable at every size, but never declining, so no result.
        let client = Arc::new(ScriptedQuoteClient::with_gains(vec![1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 5.0, 6.0, 7.0], FEE));
        let search = search_with(client.clone());

        let result = search.search(&pair("A", "B"), 1000.0, 1.0, FEE).await.unwrap();

        assert!(result.is_none());
        // 1000, 500, ..., 1.953125
        assert_eq!(client.calls(), 10);
    }

    #[tokio::test]
    async fn test_never_queries_at_or_below_min_amount() {
        let client = Arc::new(ScriptedQuoteClient::with_gains(vec![1.0, 2.0, 3.0, 4.0], FEE));
        let search = search_with(client.clone());

        search.search(&pair("A", "B"), 1000.0, 125.0, FEE).await.unwrap();

        let amounts = client.amounts();
        assert_eq!(amounts, vec![1_000_000_000, 500_000_000, 250_000_000]);
        assert!(amounts.iter().all(|a| *a > 125_000_000));

        // start at or below the floor issues no query at all
        let idle = Arc::new(ScriptedQuoteClient::with_gains(vec![0.0], FEE));
        let result = search_with(idle.clone()).search(&pair("A", "B"), 1.0, 1.0, FEE).await.unwrap();
        assert!(result.is_none());
        assert_eq!(idle.calls(), 0);
    }

    #[tokio::test]
    async fn test_decline_at_later_step_returns_previous_quote() {
        for k in 1..6 {
            let mut gains: Vec<f64> = (0..k).map(|i| i as f64 + 1.0).collect();
            gains.push(0.5);
            let client = Arc::new(ScriptedQuoteClient::with_gains(gains, FEE));
            let quote = search_with(client.clone())
                .search(&pair("A", "B"), 1000.0, 1.0, FEE)
                .await
                .unwrap()
                .unwrap();

            let expected_amount = 1000.0 / 2f64.powi(k as i32 - 1);
            assert!((quote.in_amount - expected_amount).abs() < 1e-9, "k={k}");
            assert_eq!(client.calls(), k + 1);
        }
    }

    #[tokio::test]
    async fn test_dip_then_recovery_stops_early() {
        // Adjacent-step comparison stops at the first dip even though a later size is better.
        let client = Arc::new(ScriptedQuoteClient::with_gains(vec![4.0, 2.0, 9.0], FEE));
        let quote = search_with(client.clone())
            .search(&pair("A", "B"), 1000.0, 1.0, FEE)
            .await
            .unwrap()
            .unwrap();

        assert!((quote.in_amount - 1000.0).abs() < 1e-9);
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn test_quote_is_normalized_with_price() {
        let client = Arc::new(ScriptedQuoteClient::with_gains(vec![-2.0], FEE));
        let quote = search_with(client).fetch_quote(&pair("A", "B"), 1000.0).await.unwrap();

        assert!((quote.in_amount - 1000.0).abs() < 1e-9);
        assert!((quote.out_amount - (998.0 + FEE)).abs() < 1e-6);
        assert!((quote.price - quote.out_amount / quote.in_amount).abs() < 1e-9);
        assert_eq!(quote.extra["swapMode"], serde_json::json!("ExactIn"));
    }

    #[tokio::test]
    async fn test_quote_errors_propagate() {
        let client = Arc::new(ScriptedQuoteClient::failing());
        let result = search_with(client).search(&pair("A", "B"), 1000.0, 1.0, FEE).await;
        assert!(matches!(result, Err(QuoteError::Status { status: 429, .. })));
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_reported() {
        let client = Arc::new(ScriptedQuoteClient::with_gains(vec![1.0], FEE));
        let result = search_with(client.clone()).search(&pair("A", "C"), 1000.0, 1.0, FEE).await;
        assert!(matches!(result, Err(QuoteError::Registry(_))));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_amount_beyond_atomic_range_is_rejected() {
        use crate::shared::types::{AssetInfo, Symbol};
        use crate::shared::utils::MAX_DECIMALS;
        use crate::opportunity::test_support::{MINT_A, MINT_B};

        let registry = AssetRegistry::new(vec![
            AssetInfo { symbol: Symbol::new("A").unwrap(), mint: MINT_A, decimals: MAX_DECIMALS },
            AssetInfo { symbol: Symbol::new("B").unwrap(), mint: MINT_B, decimals: 6 },
        ])
        .unwrap();
        let client = Arc::new(ScriptedQuoteClient::with_gains(vec![1.0], FEE));
        let search = OptimalTradeSearch::new(client.clone(), Arc::new(registry), 10);

        let result = search.search(&pair("A", "B"), 1e20, 1.0, FEE).await;

        assert!(matches!(result, Err(QuoteError::InvalidAmount { field: "amount", .. })));
        assert_eq!(client.calls(), 0);
    }
}
