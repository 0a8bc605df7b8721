//! Free-text duration parsing ("1h 30m", "45s", "90") and the compact
//! preset rendering that feeds back into it.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref UNIT_PATTERNS: [(Regex, f64); 3] = [
        (
            Regex::new(r"(-?)([0-9]+(?:\.[0-9]+)?)\s*h(?:ours?)?").unwrap(),
            3600.0
        ),
        (
            Regex::new(r"(-?)([0-9]+(?:\.[0-9]+)?)\s*m(?:in(?:utes?)?)?").unwrap(),
            60.0
        ),
        (
            Regex::new(r"(-?)([0-9]+(?:\.[0-9]+)?)\s*s(?:ec(?:onds?)?)?").unwrap(),
            1.0
        ),
    ];
    static ref BARE_NUMBER: Regex = Regex::new(r"^[0-9]+(?:\.[0-9]+)?$").unwrap();
}

/// Lowercase, collapse whitespace runs to a single space, trim.
fn normalize(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Parse a free-text duration into whole seconds.
///
/// Every hour/minute/second group found anywhere in the text is summed. Text
/// with no unit groups is read as a raw seconds count when it is a plain
/// number. Anything else, including negative groups, contributes nothing;
/// the worst case is 0, never an error.
pub fn parse_duration(input: &str) -> u64 {
    let input = normalize(input);
    if input.is_empty() {
        return 0;
    }

    let mut matched = false;
    let mut total = 0.0_f64;

    for (pattern, factor) in UNIT_PATTERNS.iter() {
        for caps in pattern.captures_iter(&input) {
            matched = true;
            if !caps[1].is_empty() {
                continue;
            }
            if let Ok(value) = caps[2].parse::<f64>() {
                total += value * factor;
            }
        }
    }

    if !matched && BARE_NUMBER.is_match(&input) {
        total = input.parse::<f64>().unwrap_or(0.0);
    }

    total.floor() as u64
}

/// Render a preset as e.g. `1h 30m`, omitting zero components. Seconds are
/// always shown when hours and minutes are both zero, so `0` renders as `0s`.
pub fn format_preset(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    let mut parts = Vec::with_capacity(3);
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    if secs > 0 || (hours == 0 && minutes == 0) {
        parts.push(format!("{}s", secs));
    }
    parts.join(" ")
}
