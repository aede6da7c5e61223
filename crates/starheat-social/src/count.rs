//! Normalization of abbreviated follower/subscriber counts.

/// Parse a count that may carry a `k`/`m`/`b` multiplier suffix.
///
/// Thousands separators and surrounding whitespace are stripped and matching
/// is case-insensitive, so `"12.4K"`, `" 3m "`, and `"1,234"` all parse.
/// Returns `None` for empty input or anything that is not a number once the
/// suffix is removed. Pure and deterministic; used wherever a count is
/// extracted from heterogeneous page text.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn parse_abbreviated_count(text: &str) -> Option<i64> {
    let cleaned = text.trim().to_lowercase().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }

    let (number, multiplier) = if let Some(stripped) = cleaned.strip_suffix('b') {
        (stripped, 1e9)
    } else if let Some(stripped) = cleaned.strip_suffix('m') {
        (stripped, 1e6)
    } else if let Some(stripped) = cleaned.strip_suffix('k') {
        (stripped, 1e3)
    } else {
        (cleaned.as_str(), 1.0)
    };

    let value = number.trim().parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some((value * multiplier).round() as i64)
}
