//! Culture-tolerant parsing and culture-invariant formatting of numbers.

/// Parse a number written with either a dot or a comma decimal separator.
///
/// Surrounding whitespace and quotes are ignored. The dot convention is
/// tried first; `"12,5"` is then retried as `12.5`. Values with both a comma
/// and a dot are only accepted in dot form.
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<f64>() {
        return Some(v);
    }
    if s.contains(',') && !s.contains('.') && s.matches(',').count() == 1 {
        return s.replace(',', ".").parse().ok();
    }
    None
}

/// Format a number with a fixed count of fraction digits and a dot decimal.
pub fn format_number(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}
