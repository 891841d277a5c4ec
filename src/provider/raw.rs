use serde::Deserialize;

use crate::error::{AppError, Result};

// ---------------------------------------------------------------------------
// Raw Tradier record shapes
// ---------------------------------------------------------------------------
//
// These are the provider's shapes, not the domain's. Numeric fields are
// optional because Tradier returns null for halted or never-traded
// instruments; the normalizer decides what is acceptable.

#[derive(Debug, Clone, Deserialize)]
pub struct RawQuote {
    #[serde(default)]
    pub symbol: String,
    pub last: Option<f64>,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub change: Option<f64>,
    #[serde(alias = "change_percentage")]
    pub change_percent: Option<f64>,
    pub volume: Option<u64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawGreeks {
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawContract {
    #[serde(default)]
    pub symbol: String,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub last: Option<f64>,
    pub volume: Option<u64>,
    pub open_interest: Option<u64>,
    pub strike: Option<f64>,
    /// "call" or "put".
    #[serde(rename = "type", alias = "option_type")]
    pub option_type: String,
    #[serde(default)]
    pub expiration_date: String,
    pub greeks: Option<RawGreeks>,
}

/// One expiration's worth of contracts as fetched from the chains endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RawChain {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub expiration_date: String,
    pub options: Vec<RawContract>,
}

// ---------------------------------------------------------------------------
// Envelope unwrapping
// ---------------------------------------------------------------------------
//
// Tradier wraps every payload in a response-specific envelope, and the
// nesting differs between API versions: quotes arrive as `quotes.quote`
// (object or one-element array), expirations as either a bare string array
// or `expirations.date`, chains as either a chain object under `options` or
// a contract array under `options.option`. Accept all of them.

/// Unwrap a `/markets/quotes` response into the quote for `symbol`.
/// Fails with `SymbolNotFound` when Tradier reports no match.
pub fn parse_quote_response(resp: &serde_json::Value, symbol: &str) -> Result<RawQuote> {
    let quotes = resp
        .get("quotes")
        .ok_or_else(|| AppError::InvalidQuote("response missing quotes envelope".to_string()))?;

    if quotes.get("unmatched_symbols").is_some() && quotes.get("quote").is_none() {
        return Err(AppError::SymbolNotFound(symbol.to_string()));
    }

    let quote = match quotes.get("quote") {
        Some(serde_json::Value::Array(arr)) => arr
            .first()
            .ok_or_else(|| AppError::SymbolNotFound(symbol.to_string()))?,
        Some(v) => v,
        None => return Err(AppError::SymbolNotFound(symbol.to_string())),
    };

    Ok(serde_json::from_value(quote.clone())?)
}

/// Unwrap a `/markets/options/expirations` response into a date list.
/// A null `expirations` field means the symbol has no listed options.
pub fn parse_expirations_response(resp: &serde_json::Value) -> Vec<String> {
    let expirations = match resp.get("expirations") {
        Some(e) => e,
        None => return Vec::new(),
    };

    let dates = match expirations {
        serde_json::Value::Array(a) => a,
        serde_json::Value::Object(_) => match expirations.get("date") {
            Some(serde_json::Value::Array(a)) => a,
            Some(serde_json::Value::String(s)) => return vec![s.clone()],
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    dates
        .iter()
        .filter_map(|d| d.as_str().map(|s| s.to_string()))
        .collect()
}

/// Unwrap a `/markets/options/chains` response into a `RawChain`.
/// `symbol`/`expiration` come from the request and fill in what the
/// contract-array form of the envelope omits.
pub fn parse_chain_response(
    resp: &serde_json::Value,
    symbol: &str,
    expiration: &str,
) -> Result<RawChain> {
    let options = resp
        .get("options")
        .ok_or_else(|| AppError::InvalidChain("response missing options envelope".to_string()))?;

    if options.is_null() {
        return Ok(RawChain {
            symbol: symbol.to_string(),
            expiration_date: expiration.to_string(),
            options: Vec::new(),
        });
    }

    // Contract-array form: { "options": { "option": [...] } }
    if let Some(option_arr) = options.get("option") {
        let contracts: Vec<RawContract> = serde_json::from_value(option_arr.clone())?;
        return Ok(RawChain {
            symbol: symbol.to_string(),
            expiration_date: expiration.to_string(),
            options: contracts,
        });
    }

    // Chain-object form: { "options": { "symbol": ..., "options": [...] } }
    let mut chain: RawChain = serde_json::from_value(options.clone())?;
    if chain.symbol.is_empty() {
        chain.symbol = symbol.to_string();
    }
    if chain.expiration_date.is_empty() {
        chain.expiration_date = expiration.to_string();
    }
    Ok(chain)
}
