//! Arithmetic evaluator

use crate::ast::{BinOp, Expr, UnaryOp};
use unitcalc_core::{CalcError, CalcResult};

impl Expr {
    /// Evaluate the tree. Division by an exact zero is `DivisionByZero`;
    /// any other non-finite intermediate is `InvalidInput`.
    pub fn eval(&self) -> CalcResult<f64> {
        let value = match self {
            Expr::Number(n) => *n,
            Expr::UnaryOp(op, operand) => {
                let v = operand.eval()?;
                match op {
                    UnaryOp::Neg => -v,
                    UnaryOp::Plus => v,
                }
            }
            Expr::BinaryOp(left, op, right) => {
                let l = left.eval()?;
                let r = right.eval()?;
                match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => {
                        if r == 0.0 {
                            return Err(CalcError::div_zero());
                        }
                        l / r
                    }
                }
            }
        };

        if !value.is_finite() {
            return Err(CalcError::non_finite("arithmetic"));
        }
        Ok(value)
    }
}
