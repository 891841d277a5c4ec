use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Quote
// ---------------------------------------------------------------------------

/// Immutable quote snapshot for one underlying. Produced per fetch by the
/// normalizer; never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub last: f64,
    pub bid: f64,
    pub ask: f64,
    pub change_abs: f64,
    pub change_pct: f64,
    pub volume: u64,
}

// ---------------------------------------------------------------------------
// Option contracts and chains
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Greeks {
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
}

/// One listed option contract, validated by the normalizer:
/// `strike > 0`, prices finite and non-negative, expiration matches the
/// owning chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionContract {
    /// OCC option symbol, e.g. "AAPL260918C00155000".
    pub symbol: String,
    pub underlying_symbol: String,
    pub option_type: OptionType,
    pub strike: f64,
    pub bid: f64,
    pub ask: f64,
    pub last: f64,
    pub volume: u64,
    pub open_interest: u64,
    /// Calendar date, "YYYY-MM-DD".
    pub expiration_date: String,
    pub greeks: Option<Greeks>,
}

/// All contracts for one underlying at one expiration date.
/// Invariant: every contract's `expiration_date` equals the chain's, and
/// `days_to_expiration >= 0` (whole-day difference at evaluation time).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionChain {
    pub underlying_symbol: String,
    pub expiration_date: String,
    pub days_to_expiration: i64,
    pub contracts: Vec<OptionContract>,
}

// ---------------------------------------------------------------------------
// Evaluation output
// ---------------------------------------------------------------------------

/// One evaluated covered-call strategy. Derived entirely from a Quote, one
/// OptionContract, and a share count; recomputed (never patched) when any
/// input changes.
#[derive(Debug, Clone, Serialize)]
pub struct CoveredCallCandidate {
    pub underlying_symbol: String,
    pub current_price: f64,
    pub shares_owned: u32,
    pub contract: OptionContract,
    /// Conservative: the bid, i.e. what a seller can actually receive.
    pub premium_per_share: f64,
    pub contracts_writable: u32,
    /// Total premium collected across all writable contracts.
    pub net_return: f64,
    pub net_return_percent: f64,
    pub break_even_price: f64,
    pub annualized_yield_percent: f64,
    pub days_to_expiration: i64,
    /// Strike at or below the current price — assignment likely.
    pub is_in_the_money_risk: bool,
}

/// Per-candidate skip counters. A bad candidate never aborts the batch;
/// it is counted here instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkipStats {
    pub wrong_underlying: usize,
    pub not_a_call: usize,
    pub expired: usize,
}

impl SkipStats {
    pub fn total(&self) -> usize {
        self.wrong_underlying + self.not_a_call + self.expired
    }
}

/// Result of one evaluation call: candidates in input order plus the
/// skipped-input counts.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub candidates: Vec<CoveredCallCandidate>,
    pub skipped: SkipStats,
}

// ---------------------------------------------------------------------------
// Ranking policy
// ---------------------------------------------------------------------------

/// User-configurable constraints for the ranking stage. Every field is
/// independently optional; absence means no constraint.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RankingPolicy {
    pub min_days_to_expiration: Option<i64>,
    pub max_days_to_expiration: Option<i64>,
    pub min_annualized_yield_percent: Option<f64>,
    #[serde(default)]
    pub exclude_in_the_money_risk: bool,
}
