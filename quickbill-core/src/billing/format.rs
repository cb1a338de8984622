//! Display formatting for amounts and dates, en-US conventions.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

/// Formats an amount in the given ISO 4217 currency.
///
/// Common currencies use their symbol (`$1,234.50`); any other code is
/// used as a prefix (`CHF 1,234.50`). Amounts are rounded half away from
/// zero to the currency's minor unit.
pub fn format_currency(amount: Decimal, currency: &str) -> String {
    let code = currency.trim().to_ascii_uppercase();
    let decimals = minor_units(&code);
    let rounded = amount.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let number = group_thousands(rounded.abs(), decimals);

    match symbol(&code) {
        Some(symbol) => format!("{sign}{symbol}{number}"),
        None => format!("{sign}{code}\u{a0}{number}"),
    }
}

/// Formats a calendar date as `Jan 5, 2024`.
pub fn format_date(date: NaiveDate) -> String {
    format!("{} {}, {}", date.format("%b"), date.day(), date.year())
}

fn symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "INR" => Some("₹"),
        "KRW" => Some("₩"),
        "CAD" => Some("CA$"),
        "AUD" => Some("A$"),
        _ => None,
    }
}

fn minor_units(code: &str) -> u32 {
    match code {
        "JPY" | "KRW" => 0,
        _ => 2,
    }
}

fn group_thousands(value: Decimal, decimals: u32) -> String {
    let text = format!("{:.*}", decimals as usize, value);
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{grouped}.{frac}"),
        None => grouped,
    }
}
