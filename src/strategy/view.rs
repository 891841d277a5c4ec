use serde::Serialize;

use crate::types::CoveredCallCandidate;

/// Round to 2 decimal places, half away from zero (`f64::round` semantics).
/// Deterministic and easy to test, unlike banker's rounding.
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Display shape consumed by the UI. Currency and percentage fields are
/// rounded to 2 decimals; the unrounded values stay on the candidate.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyView {
    pub symbol: String,
    pub option_symbol: String,
    pub strike: f64,
    pub expiration_date: String,
    pub days_to_expiration: i64,
    pub current_price: f64,
    pub shares_owned: u32,
    pub contracts_writable: u32,
    pub premium_per_share: f64,
    pub net_return: f64,
    pub net_return_percent: f64,
    pub break_even_price: f64,
    pub annualized_yield_percent: f64,
    pub in_the_money_risk: bool,
}

impl From<&CoveredCallCandidate> for StrategyView {
    fn from(c: &CoveredCallCandidate) -> Self {
        Self {
            symbol: c.underlying_symbol.clone(),
            option_symbol: c.contract.symbol.clone(),
            strike: c.contract.strike,
            expiration_date: c.contract.expiration_date.clone(),
            days_to_expiration: c.days_to_expiration,
            current_price: round2(c.current_price),
            shares_owned: c.shares_owned,
            contracts_writable: c.contracts_writable,
            premium_per_share: round2(c.premium_per_share),
            net_return: round2(c.net_return),
            net_return_percent: round2(c.net_return_percent),
            break_even_price: round2(c.break_even_price),
            annualized_yield_percent: round2(c.annualized_yield_percent),
            in_the_money_risk: c.is_in_the_money_risk,
        }
    }
}
