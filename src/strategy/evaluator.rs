use crate::config::{DAYS_PER_YEAR, SHARES_PER_CONTRACT};
use crate::error::{AppError, Result};
use crate::normalize::days_until;
use crate::types::{CoveredCallCandidate, Evaluation, OptionContract, OptionType, Quote, SkipStats};

/// Why one candidate contract was dropped from an evaluation batch.
enum Skip {
    WrongUnderlying,
    NotACall,
    Expired,
}

fn check_candidate(quote: &Quote, contract: &OptionContract, now_unix_secs: i64) -> Option<Skip> {
    if contract.underlying_symbol != quote.symbol {
        return Some(Skip::WrongUnderlying);
    }
    if contract.option_type != OptionType::Call {
        return Some(Skip::NotACall);
    }
    // Eligible contracts expire strictly in the future.
    match days_until(&contract.expiration_date, now_unix_secs) {
        Some(dte) if dte >= 1 => None,
        _ => Some(Skip::Expired),
    }
}

/// Evaluate covered-call candidates for one underlying.
///
/// Pure function of its arguments: identical inputs produce identical output
/// sequences, and the returned candidates keep the input order (ranking is a
/// separate stage). A malformed candidate is counted in `SkipStats` and never
/// aborts the batch; `shares_owned < 100` fails the whole call because no
/// contract can be covered at all.
pub fn evaluate(
    quote: &Quote,
    shares_owned: u32,
    candidates: &[OptionContract],
    now_unix_secs: i64,
) -> Result<Evaluation> {
    if shares_owned < SHARES_PER_CONTRACT {
        return Err(AppError::NotCoverable {
            shares: shares_owned,
        });
    }
    let contracts_writable = shares_owned / SHARES_PER_CONTRACT;

    let mut out = Vec::with_capacity(candidates.len());
    let mut skipped = SkipStats::default();

    for contract in candidates {
        match check_candidate(quote, contract, now_unix_secs) {
            Some(Skip::WrongUnderlying) => skipped.wrong_underlying += 1,
            Some(Skip::NotACall) => skipped.not_a_call += 1,
            Some(Skip::Expired) => skipped.expired += 1,
            None => {
                let dte = days_until(&contract.expiration_date, now_unix_secs)
                    .unwrap_or(0);
                out.push(evaluate_one(quote, shares_owned, contracts_writable, contract, dte));
            }
        }
    }

    Ok(Evaluation {
        candidates: out,
        skipped,
    })
}

fn evaluate_one(
    quote: &Quote,
    shares_owned: u32,
    contracts_writable: u32,
    contract: &OptionContract,
    days_to_expiration: i64,
) -> CoveredCallCandidate {
    // Premium at the bid: the price a seller can actually receive.
    let premium_per_share = contract.bid;
    let covered_shares = f64::from(SHARES_PER_CONTRACT) * f64::from(contracts_writable);

    let net_return = premium_per_share * covered_shares;
    let cost_basis = quote.last * covered_shares;
    let net_return_percent = if cost_basis == 0.0 {
        0.0
    } else {
        net_return / cost_basis * 100.0
    };

    // Approximation: ignores the holder's original cost basis, which the
    // model does not track.
    let break_even_price = quote.last - premium_per_share;

    let annualized_yield_percent =
        net_return_percent * (DAYS_PER_YEAR / days_to_expiration.max(1) as f64);

    CoveredCallCandidate {
        underlying_symbol: quote.symbol.clone(),
        current_price: quote.last,
        shares_owned,
        contract: contract.clone(),
        premium_per_share,
        contracts_writable,
        net_return,
        net_return_percent,
        break_even_price,
        annualized_yield_percent,
        days_to_expiration,
        is_in_the_money_risk: contract.strike <= quote.last,
    }
}
