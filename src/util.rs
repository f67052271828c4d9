use std::str::FromStr;

use lazy_static::lazy_static;
use num_traits::PrimInt;
use regex::Regex;

lazy_static! {
    static ref LEADING_INT_REGEX: Regex = Regex::new(r"^[+-]?[0-9]+").unwrap();
    static ref LEADING_FLOAT_REGEX: Regex =
        Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?").unwrap();
}

/// Parses the leading signed digit run of the trimmed string, so `"12abc"` and `"12.9"`
/// both read as 12. Anything without a leading digit run is zero.
pub fn leading_int<T: PrimInt + FromStr>(int_str: &str) -> T {
    LEADING_INT_REGEX
        .find(int_str.trim())
        .and_then(|m| m.as_str().trim_start_matches('+').parse::<T>().ok())
        .unwrap_or_else(T::zero)
}

/// Parses the leading decimal literal of the trimmed string. Unparseable or
/// non-finite input is zero.
pub fn leading_float(float_str: &str) -> f64 {
    LEADING_FLOAT_REGEX
        .find(float_str.trim())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|f| f.is_finite())
        .unwrap_or_default()
}

/// Like [`leading_float`], but zero is treated as missing.
pub fn nonzero_float(float_str: &str) -> Option<f64> {
    Some(leading_float(float_str)).filter(|f| *f != 0.0)
}

pub fn non_empty(s: &str) -> Option<String> {
    Some(s).filter(|s| !s.is_empty()).map(String::from)
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}
