//! Real-number literals and result formatting
//!
//! Raw text from an entry box is parsed here before it reaches a converter.
//! Results go back out either rounded to a fixed number of places (converter
//! tabs) or in their natural shortest form (calculator display).

use thiserror::Error;

/// Error type for literal parsing
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumberError {
    #[error("Empty number")]
    Empty,

    #[error("Invalid number format: {0}")]
    Malformed(String),

    #[error("Number is not finite: {0}")]
    NonFinite(String),
}

/// Magnitudes at or above this switch the natural form to exponent notation
const EXP_UPPER: f64 = 1e16;
/// Non-zero magnitudes below this switch the natural form to exponent notation
const EXP_LOWER: f64 = 1e-4;

/// Parse a real-number literal.
///
/// Surrounding whitespace is ignored. Accepts an optional sign, integer and
/// fractional digits and an optional exponent ("12", "-3.5", ".5", "2.",
/// "1e-3"). Infinities and NaN are rejected.
pub fn parse_number(s: &str) -> Result<f64, NumberError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(NumberError::Empty);
    }

    let value: f64 = s.parse()
        .map_err(|_| NumberError::Malformed(s.to_string()))?;

    if !value.is_finite() {
        return Err(NumberError::NonFinite(s.to_string()));
    }

    Ok(value)
}

/// Format with exactly `places` digits after the decimal point
pub fn format_fixed(value: f64, places: usize) -> String {
    format!("{:.*}", places, value)
}

/// Format in the shortest form that parses back to the same value.
///
/// Integral values print without a fractional part ("1024"), very large or
/// very small magnitudes use exponent notation ("1e16", "6.5e-5").
pub fn format_natural(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let abs = value.abs();
    if abs >= EXP_UPPER || abs < EXP_LOWER {
        format!("{:e}", value)
    } else {
        format!("{}", value)
    }
}

/// Compare two floats with a relative tolerance of 1e-9
/// (absolute 1e-12 near zero)
pub fn approx_eq(a: f64, b: f64) -> bool {
    let diff = (a - b).abs();
    diff <= 1e-12 || diff <= 1e-9 * a.abs().max(b.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_number("42"), Ok(42.0));
        assert_eq!(parse_number("  -7 "), Ok(-7.0));
    }

    #[test]
    fn test_parse_decimal_forms() {
        assert_eq!(parse_number("3.25"), Ok(3.25));
        assert_eq!(parse_number(".5"), Ok(0.5));
        assert_eq!(parse_number("2."), Ok(2.0));
        assert_eq!(parse_number("+1.5"), Ok(1.5));
    }

    #[test]
    fn test_parse_scientific() {
        assert_eq!(parse_number("1.5e2"), Ok(150.0));
        assert_eq!(parse_number("1E-3"), Ok(0.001));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_number(""), Err(NumberError::Empty));
        assert_eq!(parse_number("   "), Err(NumberError::Empty));
        assert!(matches!(parse_number("abc"), Err(NumberError::Malformed(_))));
        assert!(matches!(parse_number("1.2.3"), Err(NumberError::Malformed(_))));
        assert!(matches!(parse_number("12 kg"), Err(NumberError::Malformed(_))));
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        assert!(matches!(parse_number("inf"), Err(NumberError::NonFinite(_))));
        assert!(matches!(parse_number("NaN"), Err(NumberError::NonFinite(_))));
        assert!(matches!(parse_number("1e400"), Err(NumberError::NonFinite(_))));
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(1.0, 4), "1.0000");
        assert_eq!(format_fixed(1609.34, 4), "1609.3400");
        assert_eq!(format_fixed(2.0 / 3.0, 4), "0.6667");
    }

    #[test]
    fn test_format_natural() {
        assert_eq!(format_natural(14.0), "14");
        assert_eq!(format_natural(-10.0), "-10");
        assert_eq!(format_natural(0.25), "0.25");
        assert_eq!(format_natural(0.0), "0");
        assert_eq!(format_natural(1e16), "1e16");
        assert_eq!(format_natural(0.000065), "6.5e-5");
    }

    #[test]
    fn test_natural_round_trips() {
        for v in [1.0 / 3.0, 1e20, -2.5e-7, 123456.789, 0.1 + 0.2] {
            let text = format_natural(v);
            assert_eq!(parse_number(&text), Ok(v), "round trip of {}", text);
        }
    }

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(0.1 + 0.2, 0.3));
        assert!(approx_eq(1609.34, 1609.3400000000001));
        assert!(!approx_eq(1.0, 1.001));
    }
}
