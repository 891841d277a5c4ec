use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::normalize::{normalize_chain, normalize_quote};
use crate::provider::MarketData;
use crate::state::Watchlist;
use crate::strategy::{analyze_symbol, AnalyzeReport};
use crate::types::{OptionChain, Quote, RankingPolicy};

#[derive(Clone)]
pub struct ApiState {
    pub provider: Arc<dyn MarketData>,
    pub watchlist: Arc<Watchlist>,
    /// Default chain-fetch cap for /analyze; the per-request `expirations`
    /// override can raise it up to `ANALYZE_EXPIRATIONS_CEILING`.
    pub analyze_max_expirations: usize,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(get_health))
        .route("/quote/:symbol", get(get_quote))
        .route("/expirations/:symbol", get(get_expirations))
        .route("/chain/:symbol", get(get_chain))
        .route("/analyze/:symbol", get(get_analyze))
        .route("/watchlist", get(get_watchlist))
        .route(
            "/watchlist/:symbol",
            axum::routing::put(put_watchlist).delete(delete_watchlist),
        )
        .with_state(state)
}

/// How many expirations an analyze call may fetch chains for. The request
/// override wins over the configured default but is bounded by the hard
/// ceiling, and the result is always at least 1 — a zero cap would make
/// every analysis silently empty (and must never panic the handler).
fn effective_max_expirations(requested: Option<usize>, default_cap: usize) -> usize {
    requested
        .unwrap_or(default_cap)
        .min(crate::config::ANALYZE_EXPIRATIONS_CEILING)
        .max(1)
}

fn now_unix_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

fn now_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}

// ---------------------------------------------------------------------------
// Query param structs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct ChainQuery {
    pub expiration: String,
}

#[derive(Deserialize)]
pub struct AnalyzeQuery {
    /// Shares of the underlying the caller owns. Required.
    pub shares: Option<u32>,
    pub min_days: Option<i64>,
    pub max_days: Option<i64>,
    pub min_yield: Option<f64>,
    pub exclude_itm: Option<bool>,
    /// Override for how many expirations to fetch chains for.
    pub expirations: Option<usize>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub watchlist_count: usize,
}

#[derive(Serialize)]
pub struct WatchlistMutationResponse {
    pub symbol: String,
    pub changed: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn get_health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        watchlist_count: state.watchlist.len(),
    })
}

async fn get_quote(
    State(state): State<ApiState>,
    Path(symbol): Path<String>,
) -> Result<Json<Quote>> {
    let raw = state.provider.quote(&symbol).await?;
    Ok(Json(normalize_quote(&raw)?))
}

async fn get_expirations(
    State(state): State<ApiState>,
    Path(symbol): Path<String>,
) -> Result<Json<Vec<String>>> {
    Ok(Json(state.provider.expirations(&symbol).await?))
}

async fn get_chain(
    State(state): State<ApiState>,
    Path(symbol): Path<String>,
    Query(params): Query<ChainQuery>,
) -> Result<Json<OptionChain>> {
    let raw = state.provider.chain(&symbol, &params.expiration).await?;
    Ok(Json(normalize_chain(&raw, now_unix_secs())?))
}

async fn get_analyze(
    State(state): State<ApiState>,
    Path(symbol): Path<String>,
    Query(params): Query<AnalyzeQuery>,
) -> Result<Json<AnalyzeReport>> {
    let shares = params
        .shares
        .ok_or_else(|| AppError::BadRequest("shares query parameter is required".to_string()))?;

    let policy = RankingPolicy {
        min_days_to_expiration: params.min_days,
        max_days_to_expiration: params.max_days,
        min_annualized_yield_percent: params.min_yield,
        exclude_in_the_money_risk: params.exclude_itm.unwrap_or(false),
    };
    let max_expirations = effective_max_expirations(params.expirations, state.analyze_max_expirations);

    let report = analyze_symbol(
        state.provider.as_ref(),
        &symbol,
        shares,
        &policy,
        max_expirations,
        now_unix_secs(),
    )
    .await?;
    Ok(Json(report))
}

async fn get_watchlist(
    State(state): State<ApiState>,
) -> Json<Vec<crate::state::watchlist::WatchlistEntry>> {
    Json(state.watchlist.all())
}

async fn put_watchlist(
    State(state): State<ApiState>,
    Path(symbol): Path<String>,
) -> Result<Json<WatchlistMutationResponse>> {
    if symbol.trim().is_empty() {
        return Err(AppError::BadRequest("empty symbol".to_string()));
    }
    let changed = state.watchlist.add(&symbol, now_ns());
    Ok(Json(WatchlistMutationResponse {
        symbol: symbol.trim().to_uppercase(),
        changed,
    }))
}

async fn delete_watchlist(
    State(state): State<ApiState>,
    Path(symbol): Path<String>,
) -> Json<WatchlistMutationResponse> {
    let changed = state.watchlist.remove(&symbol);
    Json(WatchlistMutationResponse {
        symbol: symbol.trim().to_uppercase(),
        changed,
    })
}
