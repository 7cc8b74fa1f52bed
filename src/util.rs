// Utility helpers for parsing, formatting and basic statistics.
//
// This module centralizes the "dirty" CSV handling (headers, numbers,
// timestamps) so the rest of the code can assume clean, typed values.
use chrono::NaiveDateTime;
use num_format::{Locale, ToFormattedString};
use once_cell::sync::Lazy;
use regex::Regex;

/// Timestamp layout every derivation rule expects.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

// Layouts seen in the raw ANAC exports, tried in order.
const RAW_TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    TIMESTAMP_FORMAT,
];

static CAMEL_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z][^A-Z]*").unwrap());

/// Normalize a raw CSV header into the snake_case column name used
/// throughout the crate.
///
/// - `Companhia.Aerea` -> `companhia_aerea`
/// - `LatOrig` -> `lat_orig`
/// - anything else is lower-cased.
pub fn normalize_column_name(header: &str) -> String {
    let header = header.trim().trim_start_matches('\u{feff}');
    if header.contains('.') {
        return header.to_lowercase().replace('.', "_");
    }
    let has_upper = header.chars().any(|c| c.is_uppercase());
    let has_lower = header.chars().any(|c| c.is_lowercase());
    if has_upper && has_lower && header.chars().skip(1).any(|c| c.is_uppercase()) {
        let words: Vec<String> = CAMEL_WORD
            .find_iter(header)
            .map(|m| m.as_str().to_lowercase())
            .collect();
        if !words.is_empty() {
            return words.join("_");
        }
    }
    header.to_lowercase()
}

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in CSV exports.
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Rejects values that contain alphabetic characters.
/// - Reads a lone comma as the decimal separator (`-23,43`).
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = if s.contains(',') && !s.contains('.') {
        s.replace(',', ".")
    } else {
        s.replace(',', "")
    };
    s.parse::<f64>().ok()
}

/// Trim an optional text field, defaulting to the empty string.
pub fn text_or_empty(s: Option<String>) -> String {
    s.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Re-format a raw timestamp into [`TIMESTAMP_FORMAT`].
///
/// Empty input stays empty. Input that matches none of the known layouts is
/// returned trimmed but untouched so the derivation rules can report it.
pub fn format_timestamp(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    RAW_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}

pub fn average(v: &[f64]) -> f64 {
    // Mean of the values; NaN for an empty slice, like a dataframe mean
    // over an all-missing column.
    if v.is_empty() {
        return f64::NAN;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

/// Round to `decimals` places, ties to even like a dataframe `round`.
pub fn round_to(x: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (x * factor).round_ties_even() / factor
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    if !n.is_finite() {
        return "NaN".to_string();
    }
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for counts in console messages
    // (e.g., `9,855 rows loaded`).
    n.to_formatted_string(&Locale::en)
}
