//! Display formatting shared by every view.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Placeholder shown for absent values.
pub const PLACEHOLDER: &str = "\u{2014}";

/// Turn a stored website (bare hostname or full URL) into a browsable URL.
///
/// Values already carrying an `http://` or `https://` prefix are returned
/// unchanged (after trimming); anything else gets `https://` prepended.
/// `None`, empty, and whitespace-only input yield `None`.
#[must_use]
pub fn normalize_website(raw: Option<&str>) -> Option<String> {
    let trimmed = raw.map(str::trim).filter(|s| !s.is_empty())?;
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Some(trimmed.to_string())
    } else {
        Some(format!("https://{trimmed}"))
    }
}

/// Format a monetary amount as a whole number with thousands separators.
///
/// Fractions are rounded half away from zero. No currency symbol is added;
/// callers label the value themselves. `None` renders as an em-dash.
#[must_use]
pub fn format_money(amount: Option<Decimal>) -> String {
    let Some(amount) = amount else {
        return PLACEHOLDER.to_string();
    };
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();
    let grouped = group_thousands(&digits);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Join city and state as `"City, ST"`, or whichever part is present.
#[must_use]
pub fn format_location(city: Option<&str>, state: Option<&str>) -> Option<String> {
    let parts: Vec<&str> = [city, state]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

#[must_use]
pub fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map_or_else(
        || PLACEHOLDER.to_string(),
        |t| t.format("%Y-%m-%d %H:%M UTC").to_string(),
    )
}
