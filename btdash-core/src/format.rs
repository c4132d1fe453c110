//! Display-string conventions shared by every view.
//!
//! Money and prices: 2 decimals. Percentages: 2 decimals with a trailing `%`.
//! Anything missing or non-finite renders as [`PLACEHOLDER`].

/// Rendered in place of any value that is missing or not a finite number.
pub const PLACEHOLDER: &str = "--";

/// Timestamps are shown at second precision: `YYYY-MM-DDTHH:MM:SS`.
pub const TIMESTAMP_WIDTH: usize = 19;

/// Fixed-point number, or the placeholder.
pub fn fixed(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.decimals$}"),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Two-decimal number, or the placeholder.
pub fn num2(value: Option<f64>) -> String {
    fixed(value, 2)
}

/// A value already scaled to percent: `12.50%`.
pub fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}%"),
        _ => PLACEHOLDER.to_string(),
    }
}

/// A fraction shown as a percentage: `0.125` → `12.50%`.
pub fn fraction_percent(fraction: Option<f64>) -> String {
    percent(fraction.map(|f| f * 100.0))
}

/// Amount with currency suffix: `12.00 USDT`.
pub fn usdt(value: Option<f64>) -> String {
    format!("{} USDT", num2(value))
}

/// Truncate a timestamp to second precision. Missing timestamps render empty.
pub fn timestamp_seconds(ts: Option<&str>) -> String {
    match ts {
        Some(s) if s.chars().count() > TIMESTAMP_WIDTH => s.chars().take(TIMESTAMP_WIDTH).collect(),
        Some(s) => s.to_string(),
        None => String::new(),
    }
}

/// Text or the placeholder.
pub fn text_or_placeholder(value: Option<&str>) -> String {
    match value {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}
