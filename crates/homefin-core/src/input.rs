//! Text-to-number coercion and display formatting for calculator fields.
//!
//! Form fields arrive as free text. Anything that does not start with a
//! number becomes the fallback (zero by default) instead of an error, so a
//! half-typed field never stops a calculation.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use rust_decimal_macros::dec;

use crate::types::{Money, Ratio};

/// Parse a user-typed number, falling back to zero.
///
/// Thousands separators are stripped and the longest leading numeric prefix
/// is used, so `"1,250.50"` is `1250.50` and `"12 months"` is `12`.
pub fn parse_number(text: &str) -> Decimal {
    parse_number_or(text, Decimal::ZERO)
}

/// Parse a user-typed number, returning `fallback` when no number is present.
pub fn parse_number_or(text: &str, fallback: Decimal) -> Decimal {
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    let trimmed = cleaned.trim_start();

    match numeric_prefix(trimmed) {
        Some(prefix) => decode(&prefix).unwrap_or(fallback),
        None => fallback,
    }
}

/// Extract `[sign] digits [. digits] [e [sign] digits]` from the start of `s`.
/// Returns `None` when the mantissa has no digits.
fn numeric_prefix(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut out = String::new();

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        if bytes[i] == b'-' {
            out.push('-');
        }
        i += 1;
    }

    let mut int_digits = String::new();
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        int_digits.push(bytes[i] as char);
        i += 1;
    }

    let mut frac_digits = String::new();
    if i < bytes.len() && bytes[i] == b'.' {
        let mut j = i + 1;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            frac_digits.push(bytes[j] as char);
            j += 1;
        }
        i = j;
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    out.push_str(if int_digits.is_empty() { "0" } else { &int_digits });
    if !frac_digits.is_empty() {
        out.push('.');
        out.push_str(&frac_digits);
    }

    // exponent only counts when at least one digit follows it
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        let mut exp = String::from("e");
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            if bytes[j] == b'-' {
                exp.push('-');
            }
            j += 1;
        }
        let start = exp.len();
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            exp.push(bytes[j] as char);
            j += 1;
        }
        if exp.len() > start {
            out.push_str(&exp);
        }
    }

    Some(out)
}

fn decode(prefix: &str) -> Option<Decimal> {
    if prefix.contains('e') {
        Decimal::from_scientific(prefix).ok()
    } else {
        Decimal::from_str(prefix).ok()
    }
}

/// `1234.5` -> `"$1,234.50"`, `-80` -> `"-$80.00"`.
pub fn format_currency(amount: Money) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Format a decimal ratio as a percentage: `0.06175` with 1 digit -> `"6.2%"`.
pub fn format_percent(ratio: Ratio, digits: u32) -> String {
    let pct = (ratio * dec!(100)).round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}%", digits as usize, pct)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
