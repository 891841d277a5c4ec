use std::cmp::Ordering;

use crate::types::{CoveredCallCandidate, RankingPolicy};

fn passes(c: &CoveredCallCandidate, policy: &RankingPolicy) -> bool {
    if let Some(min) = policy.min_days_to_expiration {
        if c.days_to_expiration < min {
            return false;
        }
    }
    if let Some(max) = policy.max_days_to_expiration {
        if c.days_to_expiration > max {
            return false;
        }
    }
    if let Some(min) = policy.min_annualized_yield_percent {
        if c.annualized_yield_percent < min {
            return false;
        }
    }
    if policy.exclude_in_the_money_risk && c.is_in_the_money_risk {
        return false;
    }
    true
}

/// Descending annualized yield, ties broken by ascending days-to-expiration
/// (prefer sooner realization of the same yield), then by ascending contract
/// symbol so the order is fully deterministic.
fn compare(a: &CoveredCallCandidate, b: &CoveredCallCandidate) -> Ordering {
    b.annualized_yield_percent
        .total_cmp(&a.annualized_yield_percent)
        .then_with(|| a.days_to_expiration.cmp(&b.days_to_expiration))
        .then_with(|| a.contract.symbol.cmp(&b.contract.symbol))
}

/// Apply the policy's constraints and order the survivors. The filters are
/// independent predicates, so application order never changes the surviving
/// set. An empty result is a legitimate outcome, not an error.
pub fn rank(
    candidates: Vec<CoveredCallCandidate>,
    policy: &RankingPolicy,
) -> Vec<CoveredCallCandidate> {
    let mut survivors: Vec<CoveredCallCandidate> =
        candidates.into_iter().filter(|c| passes(c, policy)).collect();
    survivors.sort_by(compare);
    survivors
}
