//! unitcalc Calc - Scientific keypad calculator
//!
//! Evaluates the single-line expressions built up on the calculator keypad:
//! - Prefix functions: `sin`, `cos`, `tan` (degrees), `log` (base 10), `exp`, `√`
//! - Power: `base^exponent`
//! - Arithmetic: `+ - * /`, parentheses, unary minus, decimal literals
//!
//! Arithmetic is parsed by a closed recursive descent grammar. Nothing typed
//! into the display is ever interpreted as code.

mod ast;
mod parser;
mod eval;
mod scientific;
mod session;

pub use ast::{Expr, BinOp, UnaryOp};
pub use parser::parse_arithmetic;
pub use scientific::{evaluate, ScientificFn, SCIENTIFIC_FUNCTIONS};
pub use session::{Key, Operator, Session, SessionState, ERROR_MARKER};
