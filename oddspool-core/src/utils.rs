//! # Utility Functions
//!
//! Conversions between the crate's fixed-point integers and human-readable
//! strings, plus timestamp formatting.

use crate::{error::Result, CoreError, ODDS_SCALE};

/// Digits after the decimal point of a 1e9-scaled value.
const ODDS_DECIMALS: u32 = 9;

/// Format a fixed-point `value` with `decimals` fractional digits,
/// trimming trailing zeros.
pub fn format_fixed(value: u128, decimals: u32) -> String {
    let scale = 10u128.pow(decimals);
    let whole = value / scale;
    let fraction = value % scale;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{fraction:0width$}", width = decimals as usize);
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Parse a decimal string into a fixed-point integer with `decimals`
/// fractional digits. Extra precision is rejected rather than rounded.
pub fn parse_fixed(input: &str, decimals: u32) -> Result<u128> {
    let input = input.trim();
    let (whole, fraction) = input.split_once('.').unwrap_or((input, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(CoreError::WrongDataFormat);
    }
    if fraction.len() > decimals as usize
        || !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit())
    {
        return Err(CoreError::WrongDataFormat);
    }

    let scale = 10u128.pow(decimals);
    let whole: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| CoreError::WrongDataFormat)?
    };
    let fraction: u128 = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{fraction:0<width$}", width = decimals as usize);
        padded.parse().map_err(|_| CoreError::WrongDataFormat)?
    };

    whole
        .checked_mul(scale)
        .and_then(|value| value.checked_add(fraction))
        .ok_or(CoreError::ArithmeticOverflow)
}

/// Format 1e9-scaled odds, e.g. `1904761904` as `1.904761904`.
pub fn format_odds(odds: u128) -> String {
    format_fixed(odds, ODDS_DECIMALS)
}

/// Parse decimal odds such as `1.9` into the 1e9 scale.
pub fn parse_odds(input: &str) -> Result<u128> {
    parse_fixed(input, ODDS_DECIMALS)
}

/// Format a 1e9-scaled fraction (margin, fee) as a percentage.
pub fn format_percent(value: u128) -> String {
    format!("{}%", format_fixed(value * 100, ODDS_DECIMALS))
}

/// Parse a percentage such as `5` or `0.5` into the 1e9 scale.
pub fn parse_percent(input: &str) -> Result<u128> {
    let scaled = parse_fixed(input, ODDS_DECIMALS)?;
    Ok(scaled / 100)
}

/// Implied probability of 1e9-scaled odds, as a percentage string.
pub fn implied_probability(odds: u128) -> String {
    if odds == 0 {
        return "-".to_string();
    }
    let probability = ODDS_SCALE * ODDS_SCALE / odds;
    format!("{:.2}%", probability as f64 / ODDS_SCALE as f64 * 100.0)
}

/// Format timestamp as human-readable string
pub fn format_timestamp(timestamp: u64) -> String {
    use chrono::DateTime;
    let dt = DateTime::from_timestamp(timestamp as i64, 0).unwrap_or_default();
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Parse timestamp from string
pub fn parse_timestamp(timestamp_str: &str) -> Result<u64> {
    timestamp_str
        .trim()
        .parse::<u64>()
        .map_err(|_| CoreError::WrongDataFormat)
}
