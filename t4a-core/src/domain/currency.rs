//! Currency amounts as stored on slips
//!
//! Slip amounts are plain strings of digits with an optional `.` and at most
//! two decimal places. An empty string means zero.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use super::result::{Error, Result};

static AMOUNT_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]*)(?:\.([0-9]*))?$").expect("valid regex"));

/// Parse a stored amount. `""` is zero and a trailing `.` is allowed.
pub fn parse_amount(amount: &str) -> Result<Decimal> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let caps = AMOUNT_SHAPE
        .captures(amount)
        .ok_or_else(|| Error::Currency(amount.to_string()))?;
    let whole = caps.get(1).map_or("", |m| m.as_str());
    let cents = caps.get(2).map_or("", |m| m.as_str());

    if whole.is_empty() && cents.is_empty() {
        return Err(Error::Currency(amount.to_string()));
    }
    if cents.len() > 2 {
        return Err(Error::Currency(format!(
            "{} has more than 2 decimal places",
            amount
        )));
    }

    let whole = if whole.is_empty() { "0" } else { whole };
    let text = if cents.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, cents)
    };
    Decimal::from_str(&text).map_err(|e| Error::Currency(format!("{}: {}", amount, e)))
}

/// Render an amount with two decimals; zero renders as `""`
pub fn format_amount(amount: Decimal) -> String {
    if amount.is_zero() {
        return String::new();
    }
    let mut amount = amount;
    amount.rescale(2);
    amount.to_string()
}

/// Add two stored amounts, returning the stored form of the sum
pub fn add_amounts(a: &str, b: &str) -> Result<String> {
    Ok(format_amount(parse_amount(a)? + parse_amount(b)?))
}
