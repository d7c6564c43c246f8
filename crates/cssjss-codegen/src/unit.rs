//! Unit stripping.
//!
//! `10px` becomes the number `10` when the configured unit is `px`.
//! Compound values (`10px 20px`, `1px, 2px`) are never touched.

use tracing::trace;

use crate::value::StyleValue;

/// Strip `unit` from a single numeric value.
///
/// Returns the value unchanged (as text) when no unit is configured, the
/// value is compound, it does not end in the unit, or it has no leading
/// number.
pub fn strip_unit(value: &str, unit: Option<&str>) -> StyleValue {
    let Some(unit) = unit.filter(|u| !u.is_empty()) else {
        return StyleValue::Scalar(value.to_string());
    };
    if is_compound(value) || !value.ends_with(unit) {
        return StyleValue::Scalar(value.to_string());
    }

    match parse_leading_number(value) {
        Some(n) => {
            trace!(value, unit, "stripped unit");
            StyleValue::Number(n)
        }
        None => StyleValue::Scalar(value.to_string()),
    }
}

/// A value holding several parts: anything with whitespace or a comma.
pub fn is_compound(value: &str) -> bool {
    value.chars().any(|c| c.is_whitespace() || c == ',')
}

/// Parse the longest numeric prefix: sign, digits, fraction, exponent.
/// `"12.5px"` → `12.5`, `"1e3px"` → `1000`, `"px"` → `None`.
pub fn parse_leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |at: usize| bytes[at.min(bytes.len())..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_digits = digits_from(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_from(end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = digits_from(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_matching_unit() {
        assert_eq!(strip_unit("10px", Some("px")), StyleValue::Number(10.0));
        assert_eq!(strip_unit("1.5px", Some("px")), StyleValue::Number(1.5));
        assert_eq!(strip_unit("-4px", Some("px")), StyleValue::Number(-4.0));
        assert_eq!(strip_unit(".5em", Some("em")), StyleValue::Number(0.5));
    }

    #[test]
    fn test_no_unit_configured() {
        assert_eq!(strip_unit("10px", None), StyleValue::from("10px"));
        assert_eq!(strip_unit("10px", Some("")), StyleValue::from("10px"));
    }

    #[test]
    fn test_compound_values_untouched() {
        assert_eq!(strip_unit("10px 20px", Some("px")), StyleValue::from("10px 20px"));
        assert_eq!(strip_unit("1px,2px", Some("px")), StyleValue::from("1px,2px"));
        assert_eq!(strip_unit("10px\t", Some("px")), StyleValue::from("10px\t"));
    }

    #[test]
    fn test_other_unit_untouched() {
        assert_eq!(strip_unit("10em", Some("px")), StyleValue::from("10em"));
        assert_eq!(strip_unit("50%", Some("px")), StyleValue::from("50%"));
        assert_eq!(strip_unit("0", Some("px")), StyleValue::from("0"));
    }

    #[test]
    fn test_non_numeric_with_unit_untouched() {
        assert_eq!(strip_unit("px", Some("px")), StyleValue::from("px"));
        assert_eq!(strip_unit("calc(1px)", Some("px")), StyleValue::from("calc(1px)"));
        assert_eq!(strip_unit("autopx", Some("px")), StyleValue::from("autopx"));
    }

    #[test]
    fn test_parse_leading_number() {
        assert_eq!(parse_leading_number("12px"), Some(12.0));
        assert_eq!(parse_leading_number("12.25rem"), Some(12.25));
        assert_eq!(parse_leading_number("10.px"), Some(10.0));
        assert_eq!(parse_leading_number("+3px"), Some(3.0));
        assert_eq!(parse_leading_number("1e3px"), Some(1000.0));
        assert_eq!(parse_leading_number("2epx"), Some(2.0));
        assert_eq!(parse_leading_number("-.5"), Some(-0.5));
        assert_eq!(parse_leading_number("."), None);
        assert_eq!(parse_leading_number("-px"), None);
        assert_eq!(parse_leading_number(""), None);
    }
}
