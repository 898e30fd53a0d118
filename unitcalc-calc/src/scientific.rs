//! Keypad expression dispatch
//!
//! A display string is classified by its structure, first match wins:
//! 1. `sin<arg>` `cos<arg>` `tan<arg>` (arg in degrees)
//! 2. `log<arg>` (base 10), `exp<arg>`, `√<arg>`
//! 3. contains `^`: `base^exponent`, split at the first `^`
//! 4. anything else: arithmetic over `+ - * / ( )`

use serde::Serialize;
use tracing::debug;
use unitcalc_core::{parse_number, CalcError, CalcResult};
use crate::parse_arithmetic;

/// A single-argument function selected by a prefix of the display text
#[derive(Debug, Clone, Serialize)]
pub struct ScientificFn {
    /// Keypad label and prefix ("sin", "√")
    pub prefix: &'static str,
    pub description: &'static str,
    #[serde(skip)]
    apply: fn(f64) -> f64,
}

impl ScientificFn {
    /// Apply to the literal that follows the prefix
    pub fn call(&self, arg: &str) -> CalcResult<f64> {
        let x = parse_number(arg)
            .map_err(|e| CalcError::from(e).with_suggestion(format!("{} takes a single number, e.g. {}90", self.prefix, self.prefix)))?;

        let result = (self.apply)(x);
        if !result.is_finite() {
            return Err(CalcError::non_finite(&format!("{}{}", self.prefix, arg)));
        }
        Ok(result)
    }
}

fn sin_degrees(x: f64) -> f64 {
    x.to_radians().sin()
}

fn cos_degrees(x: f64) -> f64 {
    x.to_radians().cos()
}

fn tan_degrees(x: f64) -> f64 {
    x.to_radians().tan()
}

/// Prefix functions in dispatch priority order
pub static SCIENTIFIC_FUNCTIONS: [ScientificFn; 6] = [
    ScientificFn { prefix: "sin", description: "Sine of an angle in degrees", apply: sin_degrees },
    ScientificFn { prefix: "cos", description: "Cosine of an angle in degrees", apply: cos_degrees },
    ScientificFn { prefix: "tan", description: "Tangent of an angle in degrees", apply: tan_degrees },
    ScientificFn { prefix: "log", description: "Base-10 logarithm", apply: f64::log10 },
    ScientificFn { prefix: "exp", description: "e raised to the argument", apply: f64::exp },
    ScientificFn { prefix: "√", description: "Square root", apply: f64::sqrt },
];

/// Evaluate a keypad expression. Whitespace is ignored.
pub fn evaluate(text: &str) -> CalcResult<f64> {
    let expression: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let result = dispatch(&expression);
    debug!(expression = %expression, ok = result.is_ok(), "evaluated expression");
    result
}

fn dispatch(expression: &str) -> CalcResult<f64> {
    for func in SCIENTIFIC_FUNCTIONS.iter() {
        if let Some(arg) = expression.strip_prefix(func.prefix) {
            return func.call(arg);
        }
    }

    if let Some((base, exponent)) = expression.split_once('^') {
        return power(base, exponent);
    }

    parse_arithmetic(expression)?.eval()
}

/// `base^exponent` where both sides are single literals
fn power(base: &str, exponent: &str) -> CalcResult<f64> {
    let b = parse_number(base)?;
    let e = parse_number(exponent)?;

    let result = b.powf(e);
    if !result.is_finite() {
        return Err(CalcError::non_finite(&format!("{}^{}", base, exponent)));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use unitcalc_core::{approx_eq, format_natural, ErrorKind};

    #[test]
    fn test_arithmetic() {
        assert_eq!(evaluate("2+3*4").unwrap(), 14.0);
        assert_eq!(evaluate(" 2 + 3 * 4 ").unwrap(), 14.0);
    }

    #[test]
    fn test_trig_in_degrees() {
        assert!(approx_eq(evaluate("sin90").unwrap(), 1.0));
        assert!(approx_eq(evaluate("cos0").unwrap(), 1.0));
        assert!(approx_eq(evaluate("tan45").unwrap(), 1.0));
        assert!(approx_eq(evaluate("sin-30").unwrap(), -0.5));
    }

    #[test]
    fn test_log_exp_sqrt() {
        assert!(approx_eq(evaluate("log1000").unwrap(), 3.0));
        assert!(approx_eq(evaluate("exp1").unwrap(), std::f64::consts::E));
        assert_eq!(evaluate("√16").unwrap(), 4.0);
        assert_eq!(evaluate("√ 2.25").unwrap(), 1.5);
    }

    #[test]
    fn test_power() {
        assert_eq!(evaluate("2^10").unwrap(), 1024.0);
        assert_eq!(evaluate("2^-1").unwrap(), 0.5);
        assert_eq!(evaluate("9^.5").unwrap(), 3.0);
    }

    #[test]
    fn test_power_operands_must_be_literals() {
        for input in ["2^", "^3", "2^3^2", "1+1^2", "2^(3)"] {
            let err = evaluate(input).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidInput, "input {:?}", input);
        }
    }

    #[test]
    fn test_prefix_argument_errors() {
        for input in ["sin", "cos(90)", "log", "expx", "√", "√-4", "log0", "log-1", "sin1+1"] {
            let err = evaluate(input).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidInput, "input {:?}", input);
        }
    }

    #[test]
    fn test_division_by_zero_never_infinite() {
        let err = evaluate("5/0").unwrap_err();
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
    }

    #[test]
    fn test_rejects_identifiers() {
        assert_eq!(evaluate("abc").unwrap_err().kind, ErrorKind::InvalidInput);
        assert_eq!(evaluate("__import__('os').system('ls')").unwrap_err().kind, ErrorKind::InvalidInput);
        assert_eq!(evaluate("").unwrap_err().kind, ErrorKind::InvalidInput);
    }

    #[test]
    fn test_long_chains_are_rejected() {
        for terms in [100_000, 500_000] {
            let chain = vec!["1"; terms].join("+");
            assert_eq!(evaluate(&chain).unwrap_err().kind, ErrorKind::InvalidInput);
        }
        let chain = vec!["2"; 300].join("*1*");
        assert_eq!(evaluate(&chain).unwrap_err().kind, ErrorKind::InvalidInput);
        assert_eq!(evaluate(&vec!["1"; 100].join("+")).unwrap(), 100.0);
    }

    #[test]
    fn test_overflow_is_invalid() {
        assert_eq!(evaluate("exp1000").unwrap_err().kind, ErrorKind::InvalidInput);
        assert_eq!(evaluate("10^400").unwrap_err().kind, ErrorKind::InvalidInput);
    }

    #[test]
    fn test_idempotent_on_results() {
        for input in ["2+3*4", "sin90", "2^10", "√16", "1/3", "exp50", "log2", "-7*3", "2^-20", "cos90"] {
            let first = evaluate(input).unwrap();
            let again = evaluate(&format_natural(first)).unwrap();
            assert!(approx_eq(first, again), "{} -> {} -> {}", input, first, again);
        }
    }

    #[test]
    fn test_dispatch_order_matches_table() {
        let prefixes: Vec<&str> = SCIENTIFIC_FUNCTIONS.iter().map(|f| f.prefix).collect();
        assert_eq!(prefixes, vec!["sin", "cos", "tan", "log", "exp", "√"]);
    }
}
