use crate::error::{AppError, Result};
use crate::provider::raw::{RawChain, RawContract, RawQuote};
use crate::types::{Greeks, OptionChain, OptionContract, OptionType, Quote};

// ---------------------------------------------------------------------------
// Date helpers
// ---------------------------------------------------------------------------

fn days_in_month(year: i64, month: i64) -> i64 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Parse a "YYYY-MM-DD" calendar date to Unix seconds at midnight UTC.
/// Impossible dates (2026-02-31) are rejected, not rolled into the next
/// month.
pub fn parse_date_to_unix_secs(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.len() != 10 {
        return None;
    }
    let year: i64 = s[0..4].parse().ok()?;
    let month: i64 = s[5..7].parse().ok()?;
    let day: i64 = s[8..10].parse().ok()?;
    if !(1..=12).contains(&month) || day < 1 || day > days_in_month(year, month) {
        return None;
    }

    let a = (14 - month) / 12;
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;
    let jdn = day + (153 * m + 2) / 5 + 365 * y + y / 4 - y / 100 + y / 400 - 32045;
    let unix_days = jdn - 2_440_588;
    Some(unix_days * 86400)
}

/// Whole-day difference between a "YYYY-MM-DD" expiration date and `now`
/// (Unix seconds). Negative means the date is in the past.
pub fn days_until(expiration_date: &str, now_unix_secs: i64) -> Option<i64> {
    let exp_secs = parse_date_to_unix_secs(expiration_date)?;
    Some(exp_secs.div_euclid(86400) - now_unix_secs.div_euclid(86400))
}

// ---------------------------------------------------------------------------
// Quote normalization
// ---------------------------------------------------------------------------

fn require_price(value: Option<f64>, field: &str) -> Result<f64> {
    let v = value.ok_or_else(|| AppError::InvalidQuote(format!("missing {field}")))?;
    if !v.is_finite() {
        return Err(AppError::InvalidQuote(format!("{field} is not finite: {v}")));
    }
    if v < 0.0 {
        return Err(AppError::InvalidQuote(format!("negative {field}: {v}")));
    }
    Ok(v)
}

/// Validate and coerce a raw vendor quote into a `Quote`.
/// Total: every input yields a valid entity or `InvalidQuote`, never a
/// partially populated value. Crossed quotes (bid > ask) are NOT rejected;
/// they occur in real feeds and the evaluator's bid-based premium is already
/// the conservative side.
pub fn normalize_quote(raw: &RawQuote) -> Result<Quote> {
    if raw.symbol.trim().is_empty() {
        return Err(AppError::InvalidQuote("empty symbol".to_string()));
    }
    Ok(Quote {
        symbol: raw.symbol.trim().to_uppercase(),
        last: require_price(raw.last, "last")?,
        bid: require_price(raw.bid, "bid")?,
        ask: require_price(raw.ask, "ask")?,
        change_abs: raw.change.unwrap_or(0.0),
        change_pct: raw.change_percent.unwrap_or(0.0),
        volume: raw.volume.unwrap_or(0),
    })
}

// ---------------------------------------------------------------------------
// Chain normalization
// ---------------------------------------------------------------------------

/// Contract price fields: absent means no market (0.0), but a present value
/// must be finite and non-negative — a negative bid is rejected, never
/// coerced to zero.
fn contract_price(value: Option<f64>, field: &str, symbol: &str) -> Result<f64> {
    match value {
        None => Ok(0.0),
        Some(v) if !v.is_finite() => Err(AppError::InvalidChain(format!(
            "{symbol}: {field} is not finite: {v}"
        ))),
        Some(v) if v < 0.0 => Err(AppError::InvalidChain(format!(
            "{symbol}: negative {field}: {v}"
        ))),
        Some(v) => Ok(v),
    }
}

fn normalize_contract(
    raw: &RawContract,
    underlying_symbol: &str,
    chain_expiration: &str,
) -> Result<OptionContract> {
    let strike = raw
        .strike
        .ok_or_else(|| AppError::InvalidChain(format!("{}: missing strike", raw.symbol)))?;
    if !strike.is_finite() || strike <= 0.0 {
        return Err(AppError::InvalidChain(format!(
            "{}: strike must be positive, got {strike}",
            raw.symbol
        )));
    }

    if raw.expiration_date != chain_expiration {
        return Err(AppError::InvalidChain(format!(
            "{}: contract expires {} but chain expires {chain_expiration}",
            raw.symbol, raw.expiration_date
        )));
    }

    let option_type = match raw.option_type.to_ascii_lowercase().as_str() {
        "call" => OptionType::Call,
        "put" => OptionType::Put,
        other => {
            return Err(AppError::InvalidChain(format!(
                "{}: unknown option type {other:?}",
                raw.symbol
            )))
        }
    };

    Ok(OptionContract {
        symbol: raw.symbol.clone(),
        underlying_symbol: underlying_symbol.to_string(),
        option_type,
        strike,
        bid: contract_price(raw.bid, "bid", &raw.symbol)?,
        ask: contract_price(raw.ask, "ask", &raw.symbol)?,
        last: contract_price(raw.last, "last", &raw.symbol)?,
        volume: raw.volume.unwrap_or(0),
        open_interest: raw.open_interest.unwrap_or(0),
        expiration_date: raw.expiration_date.clone(),
        greeks: raw.greeks.map(|g| Greeks {
            delta: g.delta,
            gamma: g.gamma,
            theta: g.theta,
            vega: g.vega,
            rho: g.rho,
        }),
    })
}

/// Validate and coerce a raw vendor chain into an `OptionChain`.
/// `now_unix_secs` is the evaluation time; days-to-expiration is the
/// whole-day difference to the chain's expiration date and must be >= 0.
pub fn normalize_chain(raw: &RawChain, now_unix_secs: i64) -> Result<OptionChain> {
    if raw.symbol.trim().is_empty() {
        return Err(AppError::InvalidChain("empty underlying symbol".to_string()));
    }

    let days_to_expiration = days_until(&raw.expiration_date, now_unix_secs).ok_or_else(|| {
        AppError::InvalidChain(format!(
            "unparseable expiration date {:?}",
            raw.expiration_date
        ))
    })?;
    if days_to_expiration < 0 {
        return Err(AppError::InvalidChain(format!(
            "expiration {} is {} days in the past",
            raw.expiration_date, -days_to_expiration
        )));
    }

    let underlying = raw.symbol.trim().to_uppercase();
    let contracts = raw
        .options
        .iter()
        .map(|c| normalize_contract(c, &underlying, &raw.expiration_date))
        .collect::<Result<Vec<_>>>()?;

    Ok(OptionChain {
        underlying_symbol: underlying,
        expiration_date: raw.expiration_date.clone(),
        days_to_expiration,
        contracts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2026-08-21 00:00:00 UTC
    const NOW: i64 = 1_787_270_400;

    fn raw_quote() -> RawQuote {
        RawQuote {
            symbol: "AAPL".to_string(),
            last: Some(150.0),
            bid: Some(149.95),
            ask: Some(150.05),
            change: Some(-1.25),
            change_percent: Some(-0.83),
            volume: Some(52_000_000),
        }
    }

    fn raw_contract(expiration: &str) -> RawContract {
        RawContract {
            symbol: "AAPL260918C00155000".to_string(),
            bid: Some(2.50),
            ask: Some(2.60),
            last: Some(2.55),
            volume: Some(1200),
            open_interest: Some(5400),
            strike: Some(155.0),
            option_type: "call".to_string(),
            expiration_date: expiration.to_string(),
            greeks: None,
        }
    }

    #[test]
    fn parses_calendar_dates() {
        assert_eq!(parse_date_to_unix_secs("1970-01-01"), Some(0));
        assert_eq!(parse_date_to_unix_secs("1970-01-02"), Some(86400));
        assert_eq!(parse_date_to_unix_secs("2026-08-21"), Some(NOW));
        assert_eq!(parse_date_to_unix_secs("not-a-date"), None);
        assert_eq!(parse_date_to_unix_secs("2026-13-01"), None);
    }

    #[test]
    fn impossible_days_rejected_not_rolled_over() {
        assert_eq!(parse_date_to_unix_secs("2026-02-31"), None);
        assert_eq!(parse_date_to_unix_secs("2026-04-31"), None);
        assert_eq!(parse_date_to_unix_secs("2026-02-29"), None);
        // Leap-year Feb 29 is real: 2024-02-29 is one day after 2024-02-28.
        assert_eq!(
            parse_date_to_unix_secs("2024-02-29"),
            parse_date_to_unix_secs("2024-02-28").map(|s| s + 86400)
        );
        // Century rule: 2000 was a leap year.
        assert!(parse_date_to_unix_secs("2000-02-29").is_some());
    }

    #[test]
    fn days_until_is_whole_day_difference() {
        assert_eq!(days_until("2026-08-28", NOW), Some(7));
        assert_eq!(days_until("2026-08-21", NOW), Some(0));
        // Part-way through the day still counts whole days
        assert_eq!(days_until("2026-08-28", NOW + 3600 * 13), Some(7));
        assert_eq!(days_until("2026-08-20", NOW), Some(-1));
    }

    #[test]
    fn valid_quote_normalizes() {
        let q = normalize_quote(&raw_quote()).unwrap();
        assert_eq!(q.symbol, "AAPL");
        assert!((q.last - 150.0).abs() < 1e-9);
        assert!((q.change_abs + 1.25).abs() < 1e-9);
    }

    #[test]
    fn empty_symbol_rejected() {
        let mut raw = raw_quote();
        raw.symbol = "  ".to_string();
        assert!(matches!(
            normalize_quote(&raw),
            Err(AppError::InvalidQuote(_))
        ));
    }

    #[test]
    fn negative_price_rejected_not_coerced() {
        let mut raw = raw_quote();
        raw.bid = Some(-0.05);
        assert!(matches!(
            normalize_quote(&raw),
            Err(AppError::InvalidQuote(_))
        ));
    }

    #[test]
    fn non_finite_price_rejected() {
        let mut raw = raw_quote();
        raw.last = Some(f64::NAN);
        assert!(matches!(
            normalize_quote(&raw),
            Err(AppError::InvalidQuote(_))
        ));
    }

    #[test]
    fn missing_price_rejected() {
        let mut raw = raw_quote();
        raw.ask = None;
        assert!(matches!(
            normalize_quote(&raw),
            Err(AppError::InvalidQuote(_))
        ));
    }

    #[test]
    fn valid_chain_normalizes() {
        let raw = RawChain {
            symbol: "AAPL".to_string(),
            expiration_date: "2026-09-18".to_string(),
            options: vec![raw_contract("2026-09-18")],
        };
        let chain = normalize_chain(&raw, NOW).unwrap();
        assert_eq!(chain.underlying_symbol, "AAPL");
        assert_eq!(chain.days_to_expiration, 28);
        assert_eq!(chain.contracts.len(), 1);
        assert_eq!(chain.contracts[0].underlying_symbol, "AAPL");
        assert_eq!(chain.contracts[0].option_type, OptionType::Call);
    }

    #[test]
    fn contract_expiration_mismatch_rejected() {
        let raw = RawChain {
            symbol: "AAPL".to_string(),
            expiration_date: "2026-09-18".to_string(),
            options: vec![raw_contract("2026-09-25")],
        };
        assert!(matches!(
            normalize_chain(&raw, NOW),
            Err(AppError::InvalidChain(_))
        ));
    }

    #[test]
    fn non_positive_strike_rejected() {
        let mut contract = raw_contract("2026-09-18");
        contract.strike = Some(0.0);
        let raw = RawChain {
            symbol: "AAPL".to_string(),
            expiration_date: "2026-09-18".to_string(),
            options: vec![contract],
        };
        assert!(matches!(
            normalize_chain(&raw, NOW),
            Err(AppError::InvalidChain(_))
        ));
    }

    #[test]
    fn past_expiration_rejected() {
        let raw = RawChain {
            symbol: "AAPL".to_string(),
            expiration_date: "2026-08-14".to_string(),
            options: vec![],
        };
        assert!(matches!(
            normalize_chain(&raw, NOW),
            Err(AppError::InvalidChain(_))
        ));
    }

    #[test]
    fn negative_contract_bid_rejected() {
        let mut contract = raw_contract("2026-09-18");
        contract.bid = Some(-0.10);
        let raw = RawChain {
            symbol: "AAPL".to_string(),
            expiration_date: "2026-09-18".to_string(),
            options: vec![contract],
        };
        assert!(matches!(
            normalize_chain(&raw, NOW),
            Err(AppError::InvalidChain(_))
        ));
    }
}
