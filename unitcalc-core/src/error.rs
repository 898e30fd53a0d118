//! Structured errors
//!
//! Errors never crash the caller. They are values carrying a stable code
//! that the presentation layer maps to a placeholder string.

use crate::NumberError;
use serde::{Deserialize, Serialize};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INVALID_INPUT: &str = "INVALID_INPUT";
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const UNSUPPORTED_UNIT_PAIR: &str = "UNSUPPORTED_UNIT_PAIR";
    pub const DIV_ZERO: &str = "DIV_ZERO";
}

/// The closed error taxonomy of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Unparseable or malformed numeric literal / expression, or a non-finite result
    InvalidInput,
    /// Unit identifier not a member of the stated category
    UnknownUnit,
    /// Temperature pair outside the defined conversions
    UnsupportedUnitPair,
    /// Arithmetic evaluator divided by an exact zero
    DivisionByZero,
}

impl ErrorKind {
    /// Machine-readable code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => codes::INVALID_INPUT,
            ErrorKind::UnknownUnit => codes::UNKNOWN_UNIT,
            ErrorKind::UnsupportedUnitPair => codes::UNSUPPORTED_UNIT_PAIR,
            ErrorKind::DivisionByZero => codes::DIV_ZERO,
        }
    }
}

/// Structured engine error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalcError {
    /// Error category
    pub kind: ErrorKind,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl CalcError {
    /// Create a new error
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Machine-readable code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    // ========== Common Error Constructors ==========

    pub fn invalid_input(details: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, format!("Invalid input: {}", details.into()))
            .with_suggestion("Enter a plain number such as 12 or 3.5")
    }

    pub fn unknown_unit(unit: &str, category: &str) -> Self {
        Self::new(ErrorKind::UnknownUnit, format!("Unknown {} unit: {}", category, unit))
            .with_suggestion(format!("Pick a unit listed for {}", category))
    }

    pub fn unsupported_pair(from: &str, to: &str) -> Self {
        Self::new(
            ErrorKind::UnsupportedUnitPair,
            format!("No temperature conversion from '{}' to '{}'", from, to),
        )
        .with_suggestion("Use Celsius, Fahrenheit or Kelvin")
    }

    pub fn div_zero() -> Self {
        Self::new(ErrorKind::DivisionByZero, "Division by zero")
            .with_suggestion("Ensure divisor is not zero")
    }

    pub fn non_finite(operation: &str) -> Self {
        Self::new(
            ErrorKind::InvalidInput,
            format!("Invalid input: {} has no finite result", operation),
        )
    }
}

impl std::fmt::Display for CalcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for CalcError {}

impl From<NumberError> for CalcError {
    fn from(err: NumberError) -> Self {
        match err {
            NumberError::Empty => Self::invalid_input("empty value"),
            NumberError::Malformed(s) => Self::invalid_input(format!("'{}' is not a number", s)),
            NumberError::NonFinite(s) => Self::invalid_input(format!("'{}' is not finite", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let err = CalcError::div_zero();
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
        assert_eq!(err.code(), codes::DIV_ZERO);
    }

    #[test]
    fn test_error_display() {
        let err = CalcError::unknown_unit("Furlong", "length");
        let display = format!("{}", err);
        assert!(display.starts_with("[UNKNOWN_UNIT]"));
        assert!(display.contains("Furlong"));
        assert!(display.contains("suggestion"));
    }

    #[test]
    fn test_from_number_error() {
        let err: CalcError = NumberError::Malformed("abc".to_string()).into();
        assert_eq!(err.kind, ErrorKind::InvalidInput);
        assert!(err.message.contains("abc"));
    }

    #[test]
    fn test_serialize_kind_snake_case() {
        let json = serde_json::to_string(&CalcError::unsupported_pair("Rankine", "Kelvin")).unwrap();
        assert!(json.contains("\"unsupported_unit_pair\""));
    }
}
