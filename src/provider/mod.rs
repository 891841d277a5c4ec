pub mod raw;
pub mod tradier;

use futures_util::future::BoxFuture;

use crate::error::Result;
use crate::provider::raw::{RawChain, RawQuote};

pub use tradier::TradierClient;

/// Capability interface over the market-data vendor. The analyze pipeline
/// depends on this rather than on a concrete client so it can run against a
/// fake in tests.
pub trait MarketData: Send + Sync {
    /// Fetch the current quote for one underlying symbol.
    fn quote<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, Result<RawQuote>>;

    /// List option expiration dates ("YYYY-MM-DD") for one underlying,
    /// nearest first.
    fn expirations<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, Result<Vec<String>>>;

    /// Fetch the option chain for one underlying at one expiration date.
    fn chain<'a>(
        &'a self,
        symbol: &'a str,
        expiration: &'a str,
    ) -> BoxFuture<'a, Result<RawChain>>;
}
