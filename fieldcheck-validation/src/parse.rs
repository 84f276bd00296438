// Explicit parsers for loosely-typed form input

/// Parse a form value as a boolean.
///
/// Accepts `1`, `true`, `on`, `yes` as `true` and `0`, `false`, `off`, `no`
/// or an empty string as `false`, ignoring ASCII case and surrounding
/// whitespace. Anything else is unparseable and yields `None`.
///
/// ```
/// use fieldcheck_validation::parse_bool;
///
/// assert_eq!(parse_bool("Yes"), Some(true));
/// assert_eq!(parse_bool(" off "), Some(false));
/// assert_eq!(parse_bool("trueg111hj"), None);
/// ```
pub fn parse_bool(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" | "" => Some(false),
        _ => None,
    }
}

/// Parse a form value as a signed 64-bit integer.
///
/// An optional sign followed by decimal digits, no leading zeros except for
/// `0` itself. Surrounding whitespace is ignored.
pub fn parse_int(input: &str) -> Option<i64> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }

    trimmed.parse::<i64>().ok()
}

/// Parse a form value as a finite floating-point number.
///
/// Plain decimal and exponent notation are accepted (`1.5`, `.5`, `-3e2`).
/// Textual forms such as `inf` or `NaN` are rejected.
pub fn parse_float(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if !trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        return None;
    }
    if !trimmed.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
}
