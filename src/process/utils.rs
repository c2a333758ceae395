use once_cell::sync::Lazy;
use regex::Regex;

/// `<year>.<month>`: a literal period between two ASCII digit groups.
static PERIOD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)\.([0-9]+)$").expect("period pattern should compile"));

/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim()
    } else {
        trimmed
    }
}

/// Coerce a cell to a count. Blank, non-numeric and non-finite cells are `None`.
pub fn parse_count(raw: &str) -> Option<f64> {
    let cleaned = clean_str(raw);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Split a period header like `"2024.11"` into `("2024", "11")`.
pub fn split_period(header: &str) -> Option<(&str, &str)> {
    let caps = PERIOD_RE.captures(header.trim())?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}
