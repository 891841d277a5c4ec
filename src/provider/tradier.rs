use std::time::Duration;

use futures_util::future::BoxFuture;
use tracing::debug;

use crate::config::{Config, HTTP_TIMEOUT_SECS};
use crate::error::Result;
use crate::provider::raw::{
    parse_chain_response, parse_expirations_response, parse_quote_response, RawChain, RawQuote,
};
use crate::provider::MarketData;

/// Thin client over the Tradier market-data REST API.
/// Auth, rate limiting, and retries live here (or in the caller), never in
/// the evaluation core.
pub struct TradierClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TradierClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: cfg.tradier_api_url.clone(),
            api_key: cfg.tradier_api_key.clone(),
        })
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        debug!("GET {url}");
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json().await?)
    }
}

impl MarketData for TradierClient {
    fn quote<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, Result<RawQuote>> {
        Box::pin(async move {
            let url = format!("{}/markets/quotes?symbols={symbol}&greeks=true", self.base_url);
            let resp = self.get_json(&url).await?;
            parse_quote_response(&resp, symbol)
        })
    }

    fn expirations<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, Result<Vec<String>>> {
        Box::pin(async move {
            let url = format!(
                "{}/markets/options/expirations?symbol={symbol}&includeAllRoots=true",
                self.base_url
            );
            let resp = self.get_json(&url).await?;
            Ok(parse_expirations_response(&resp))
        })
    }

    fn chain<'a>(
        &'a self,
        symbol: &'a str,
        expiration: &'a str,
    ) -> BoxFuture<'a, Result<RawChain>> {
        Box::pin(async move {
            let url = format!(
                "{}/markets/options/chains?symbol={symbol}&expiration={expiration}&greeks=true",
                self.base_url
            );
            let resp = self.get_json(&url).await?;
            parse_chain_response(&resp, symbol, expiration)
        })
    }
}
