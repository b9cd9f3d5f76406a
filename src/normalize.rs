//! Cell-level normalizers. Every function takes one raw cell value and
//! returns a canonical value or `None`; none of them panic on bad input.

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Tokens spreadsheet tools emit for absent values.
const NULL_TOKENS: &[&str] = &["n/a", "nan", "none", "na"];

pub fn clean_string(raw: &str) -> Option<String> {
    let t = raw.trim();
    if t.is_empty() {
        return None;
    }
    if NULL_TOKENS.iter().any(|tok| t.eq_ignore_ascii_case(tok)) {
        return None;
    }
    Some(t.to_string())
}

/// Parse a date cell. ISO forms are tried first, then day-first orderings
/// (ambiguous day/month resolves day-first), then spreadsheet serial
/// numbers (days since 1899-12-30, the Excel epoch).
pub fn clean_date(raw: &str) -> Option<NaiveDate> {
    let t = clean_string(raw)?;

    if let Ok(d) = NaiveDate::parse_from_str(&t, "%Y-%m-%d") {
        return Some(d);
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&t, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in ["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%d/%m/%y"] {
        if let Ok(d) = NaiveDate::parse_from_str(&t, fmt) {
            return Some(d);
        }
    }

    if let Ok(serial) = t.parse::<f64>() {
        let days = serial.trunc() as i64;
        // Plausible window: 1900 through the late 2200s.
        if (1..=120_000).contains(&days) {
            return NaiveDate::from_ymd_opt(1899, 12, 30)
                .and_then(|epoch| epoch.checked_add_signed(Duration::days(days)));
        }
    }

    None
}

/// Parse an integer cell, tolerating the trailing `.0` that spreadsheet
/// float coercion leaves on numeric columns.
pub fn clean_int(raw: &str) -> Option<i64> {
    let t = clean_string(raw)?;
    if let Ok(v) = t.parse::<i64>() {
        return Some(v);
    }
    match t.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v.trunc() as i64),
        _ => None,
    }
}

/// A single cell may hold several addresses separated by `;`, `,` or `/`.
/// Each is trimmed and lowercased; survivors are rejoined with `", "`.
pub fn clean_email(raw: &str) -> Option<String> {
    let t = clean_string(raw)?;
    let parts: Vec<String> = t
        .split([';', ',', '/'])
        .map(|p| p.trim().to_ascii_lowercase())
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// Split a full name into (first, last). A single token keeps the "N/A"
/// sentinel as the last name; with three or more tokens everything but the
/// final token becomes the first name.
pub fn split_name(raw: &str) -> (Option<String>, Option<String>) {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    match tokens.as_slice() {
        [] => (None, None),
        [only] => (Some((*only).to_string()), Some("N/A".to_string())),
        [init @ .., last] => (Some(init.join(" ")), Some((*last).to_string())),
    }
}

/// Graduation years outside a plausible window are treated as noise.
pub fn clean_year(raw: &str) -> Option<i64> {
    clean_int(raw).filter(|y| (1900..=2100).contains(y))
}
