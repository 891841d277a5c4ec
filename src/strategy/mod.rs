pub mod evaluator;
pub mod ranking;
pub mod view;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::normalize::{normalize_chain, normalize_quote};
use crate::provider::MarketData;
use crate::types::{OptionContract, OptionType, Quote, RankingPolicy, SkipStats};

pub use evaluator::evaluate;
pub use ranking::rank;
pub use view::StrategyView;

/// Result of one full analyze call for one underlying.
#[derive(Debug, Serialize)]
pub struct AnalyzeReport {
    pub quote: Quote,
    pub shares_owned: u32,
    pub strategies: Vec<StrategyView>,
    pub skipped: SkipStats,
    pub chains_fetched: usize,
    pub chains_failed: usize,
}

/// Full pipeline for one underlying: fetch quote and chains, normalize,
/// evaluate every call across the fetched expirations, rank under `policy`,
/// and map to display views.
///
/// A chain that fails to fetch or normalize is logged and skipped — one bad
/// expiration must not sink the whole analysis. Quote failures are fatal to
/// the call: there is nothing to evaluate against.
pub async fn analyze_symbol(
    provider: &dyn MarketData,
    symbol: &str,
    shares_owned: u32,
    policy: &RankingPolicy,
    max_expirations: usize,
    now_unix_secs: i64,
) -> Result<AnalyzeReport> {
    let quote = normalize_quote(&provider.quote(symbol).await?)?;

    let expirations = provider.expirations(symbol).await?;
    let take = expirations.len().min(max_expirations);

    let mut calls: Vec<OptionContract> = Vec::new();
    let mut chains_fetched = 0usize;
    let mut chains_failed = 0usize;

    for expiration in &expirations[..take] {
        let raw = match provider.chain(symbol, expiration).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("chain fetch failed for {symbol} {expiration}: {e}");
                chains_failed += 1;
                continue;
            }
        };
        match normalize_chain(&raw, now_unix_secs) {
            Ok(chain) => {
                chains_fetched += 1;
                calls.extend(
                    chain
                        .contracts
                        .into_iter()
                        .filter(|c| c.option_type == OptionType::Call),
                );
            }
            Err(e) => {
                warn!("chain rejected for {symbol} {expiration}: {e}");
                chains_failed += 1;
            }
        }
    }

    let evaluation = evaluate(&quote, shares_owned, &calls, now_unix_secs)?;
    let skipped = evaluation.skipped;
    let ranked = rank(evaluation.candidates, policy);
    let strategies: Vec<StrategyView> = ranked.iter().map(StrategyView::from).collect();

    info!(
        symbol = %quote.symbol,
        strategies = strategies.len(),
        chains_fetched,
        chains_failed,
        skipped = skipped.total(),
        "analyze complete"
    );

    Ok(AnalyzeReport {
        quote,
        shares_owned,
        strategies,
        skipped,
        chains_fetched,
        chains_failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future::BoxFuture;

    use crate::error::{AppError, Result};
    use crate::provider::raw::{RawChain, RawContract, RawQuote};

    // 2026-08-21 00:00:00 UTC
    const NOW: i64 = 1_787_270_400;

    /// In-memory provider standing in for the Tradier client.
    struct FakeProvider {
        quote: RawQuote,
        expirations: Vec<String>,
        chains: Vec<RawChain>,
    }

    impl MarketData for FakeProvider {
        fn quote<'a>(&'a self, _symbol: &'a str) -> BoxFuture<'a, Result<RawQuote>> {
            Box::pin(async move { Ok(self.quote.clone()) })
        }

        fn expirations<'a>(&'a self, _symbol: &'a str) -> BoxFuture<'a, Result<Vec<String>>> {
            Box::pin(async move { Ok(self.expirations.clone()) })
        }

        fn chain<'a>(
            &'a self,
            _symbol: &'a str,
            expiration: &'a str,
        ) -> BoxFuture<'a, Result<RawChain>> {
            Box::pin(async move {
                self.chains
                    .iter()
                    .find(|c| c.expiration_date == expiration)
                    .cloned()
                    .ok_or_else(|| AppError::BadRequest(format!("no chain for {expiration}")))
            })
        }
    }

    fn raw_call(symbol: &str, strike: f64, bid: f64, expiration: &str) -> RawContract {
        RawContract {
            symbol: symbol.to_string(),
            bid: Some(bid),
            ask: Some(bid + 0.10),
            last: Some(bid + 0.05),
            volume: Some(100),
            open_interest: Some(1000),
            strike: Some(strike),
            option_type: "call".to_string(),
            expiration_date: expiration.to_string(),
            greeks: None,
        }
    }

    fn fake_provider() -> FakeProvider {
        let mut put = raw_call("AAPL260828P00145000", 145.0, 1.10, "2026-08-28");
        put.option_type = "put".to_string();

        FakeProvider {
            quote: RawQuote {
                symbol: "AAPL".to_string(),
                last: Some(150.0),
                bid: Some(149.95),
                ask: Some(150.05),
                change: Some(0.5),
                change_percent: Some(0.33),
                volume: Some(40_000_000),
            },
            expirations: vec!["2026-08-28".to_string(), "2026-09-18".to_string()],
            chains: vec![
                RawChain {
                    symbol: "AAPL".to_string(),
                    expiration_date: "2026-08-28".to_string(),
                    options: vec![
                        raw_call("AAPL260828C00155000", 155.0, 2.50, "2026-08-28"),
                        put,
                    ],
                },
                RawChain {
                    symbol: "AAPL".to_string(),
                    expiration_date: "2026-09-18".to_string(),
                    options: vec![raw_call("AAPL260918C00155000", 155.0, 4.20, "2026-09-18")],
                },
            ],
        }
    }

    #[tokio::test]
    async fn analyze_ranks_across_expirations() {
        let provider = fake_provider();
        let report = analyze_symbol(
            &provider,
            "AAPL",
            200,
            &RankingPolicy::default(),
            8,
            NOW,
        )
        .await
        .unwrap();

        assert_eq!(report.quote.symbol, "AAPL");
        assert_eq!(report.chains_fetched, 2);
        assert_eq!(report.chains_failed, 0);
        assert_eq!(report.strategies.len(), 2);
        // Puts are filtered out before evaluation, so no skips recorded.
        assert_eq!(report.skipped.total(), 0);

        // 7-day 2.50 bid annualizes higher than 28-day 4.20 bid.
        assert_eq!(report.strategies[0].option_symbol, "AAPL260828C00155000");
        assert_eq!(report.strategies[0].contracts_writable, 2);
        assert!(
            report.strategies[0].annualized_yield_percent
                > report.strategies[1].annualized_yield_percent
        );
    }

    #[tokio::test]
    async fn analyze_respects_expiration_cap() {
        let provider = fake_provider();
        let report = analyze_symbol(
            &provider,
            "AAPL",
            100,
            &RankingPolicy::default(),
            1,
            NOW,
        )
        .await
        .unwrap();
        assert_eq!(report.chains_fetched, 1);
        assert_eq!(report.strategies.len(), 1);
        assert_eq!(report.strategies[0].expiration_date, "2026-08-28");
    }

    #[tokio::test]
    async fn analyze_survives_a_failing_chain() {
        let mut provider = fake_provider();
        // Second expiration has no chain behind it: fetch will fail.
        provider.chains.pop();
        let report = analyze_symbol(
            &provider,
            "AAPL",
            100,
            &RankingPolicy::default(),
            8,
            NOW,
        )
        .await
        .unwrap();
        assert_eq!(report.chains_fetched, 1);
        assert_eq!(report.chains_failed, 1);
        assert_eq!(report.strategies.len(), 1);
    }

    #[tokio::test]
    async fn analyze_propagates_not_coverable() {
        let provider = fake_provider();
        let err = analyze_symbol(
            &provider,
            "AAPL",
            50,
            &RankingPolicy::default(),
            8,
            NOW,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotCoverable { shares: 50 }));
    }
}
