//! Coercion of loosely-typed text cells
//!
//! OED files arrive through CSV readers that may keep every cell as text.
//! These helpers accept the spellings seen in practice.

/// Parse an integer, accepting integral decimals such as `"2000.0"`
pub fn parse_integer(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(value) = s.parse::<i64>() {
        return Some(value);
    }
    s.parse::<f64>().ok().and_then(integral_float)
}

/// Integer value of a float with no fractional part
pub fn integral_float(value: f64) -> Option<i64> {
    // i64 bounds as exactly representable floats
    const MIN: f64 = -9_223_372_036_854_775_808.0;
    const MAX: f64 = 9_223_372_036_854_775_808.0;

    if !value.is_finite() || value < MIN || value >= MAX {
        return None;
    }
    let truncated = value as i64;
    (truncated as f64 == value).then_some(truncated)
}

/// Parse a float, rejecting NaN and infinities
pub fn parse_float(s: &str) -> Option<f64> {
    let value = s.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

/// Parse a boolean-like flag
pub fn parse_bool(s: &str) -> Option<bool> {
    const TRUE: [&str; 5] = ["true", "t", "yes", "y", "1"];
    const FALSE: [&str; 5] = ["false", "f", "no", "n", "0"];

    let s = s.trim();
    if TRUE.iter().any(|t| s.eq_ignore_ascii_case(t)) {
        Some(true)
    } else if FALSE.iter().any(|f| s.eq_ignore_ascii_case(f)) {
        Some(false)
    } else {
        None
    }
}

/// Year built, or 0 when it is not in `1..=current_year + 1`
pub fn sanitize_year_built(year: Option<i64>, current_year: i32) -> i32 {
    match year {
        Some(year) if year > 0 && year <= current_year as i64 + 1 => year as i32,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("2000"), Some(2000));
        assert_eq!(parse_integer(" 42 "), Some(42));
        assert_eq!(parse_integer("-7"), Some(-7));
        assert_eq!(parse_integer("2000.0"), Some(2000));
        assert_eq!(parse_integer("2000.5"), None);
        assert_eq!(parse_integer("a"), None);
        assert_eq!(parse_integer(""), None);
        assert_eq!(parse_integer("nan"), None);
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float("-33.8688"), Some(-33.8688));
        assert_eq!(parse_float("151"), Some(151.0));
        assert_eq!(parse_float("inf"), None);
        assert_eq!(parse_float("x"), None);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("True"), Some(true));
        assert_eq!(parse_bool("y"), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("NO"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_year_built() {
        assert_eq!(sanitize_year_built(Some(2001), 2024), 2001);
        assert_eq!(sanitize_year_built(Some(2025), 2024), 2025);
        assert_eq!(sanitize_year_built(Some(2026), 2024), 0);
        assert_eq!(sanitize_year_built(Some(0), 2024), 0);
        assert_eq!(sanitize_year_built(Some(-5), 2024), 0);
        assert_eq!(sanitize_year_built(None, 2024), 0);
    }
}
