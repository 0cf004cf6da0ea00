//! Display formatting for amounts, rates and timestamps.

use chrono::{DateTime, NaiveDateTime};

const DASH: &str = "-";

/// `RM 1,234.56`
pub fn format_rm(amount: f64) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("RM {}{}.{:02}", sign, whole, cents % 100)
}

/// `RM 12.3k`, used for aggregate volume.
pub fn format_rm_thousands(amount: f64) -> String {
    format!("RM {:.1}k", amount / 1000.0)
}

fn group_thousands(mut value: u64) -> String {
    let mut groups = Vec::new();
    loop {
        if value < 1000 {
            groups.push(value.to_string());
            break;
        }
        groups.push(format!("{:03}", value % 1000));
        value /= 1000;
    }
    groups.reverse();
    groups.join(",")
}

/// Percentage with `decimals` places. Halves round up (`6.25` to `6.3`),
/// as the dashboard has always shown them.
pub fn format_percent(value: f64, decimals: usize) -> String {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (value * scale).round() / scale + 0.0;
    format!("{:.*}%", decimals, rounded)
}

/// Ratio in 0..1 shown as a percentage.
pub fn format_ratio(ratio: f64, decimals: usize) -> String {
    format_percent(ratio * 100.0, decimals)
}

/// Model confidence as a whole percentage. Missing or zero shows a dash.
pub fn format_confidence(confidence: Option<f64>) -> String {
    match confidence {
        Some(c) if c > 0.0 => format_ratio(c, 0),
        _ => DASH.to_string(),
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Date and time as reported by the server. Unparseable input is shown as-is.
pub fn format_timestamp(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => DASH.to_string(),
        Some(s) => parse_timestamp(s)
            .map(|dt| dt.format("%d/%m/%Y, %H:%M:%S").to_string())
            .unwrap_or_else(|| s.to_string()),
    }
}

/// Time of day only, for chart axis labels.
pub fn format_time(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Stripe ids are long; tables show a prefix.
pub fn short_id(id: &str, len: usize) -> String {
    if id.is_empty() {
        return "N/A".to_string();
    }
    if id.chars().count() <= len {
        return id.to_string();
    }
    let prefix: String = id.chars().take(len).collect();
    format!("{}...", prefix)
}

pub fn or_dash(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(DASH)
        .to_string()
}
