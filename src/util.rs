// Utility helpers for parsing and formatting.
//
// This module centralizes the "dirty" CSV number handling so the rest of the
// code can assume clean, typed values.
use num_format::{Locale, ToFormattedString};

/// Parse a quantity cell into a non-negative integer while being forgiving
/// about formatting issues that are common in spreadsheet exports.
///
/// - Trims whitespace and strips thousands separators like `","`.
/// - Accepts integral floats such as `12.0` (aggregated exports often emit
///   sums as floats).
/// - Returns `None` for blanks, negatives, fractions and text.
pub fn parse_quantity_safe(s: Option<&str>) -> Option<u64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let s = s.replace(',', "");
    if let Ok(v) = s.parse::<u64>() {
        return Some(v);
    }
    let f = s.parse::<f64>().ok()?;
    if !f.is_finite() || f < 0.0 || f.fract() != 0.0 || f >= u64::MAX as f64 {
        return None;
    }
    Some(f as u64)
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: u64 = int_part.parse().unwrap_or(0);
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

/// Percent with one decimal, the way shares are shown in every table.
pub fn format_percent(p: f64) -> String {
    format!("{}%", format_number(p, 1))
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values (unit counts,
    // row counts in console messages).
    n.to_formatted_string(&Locale::en)
}

/// Shorten a long variant label for one-line console summaries.
pub fn truncate_label(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let head: String = s.chars().take(max_chars).collect();
    format!("{}...", head)
}
