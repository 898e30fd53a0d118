//! Abstract Syntax Tree for keypad arithmetic

use serde::{Deserialize, Serialize};

/// A parsed arithmetic expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Finite decimal literal
    Number(f64),
    /// Left operand, operator, right operand. Chains nest to the left:
    /// `1-2-3` is `(1-2)-3`.
    BinaryOp(Box<Expr>, BinOp, Box<Expr>),
    /// Prefix sign applied to its operand
    UnaryOp(UnaryOp, Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp { Add, Sub, Mul, Div }

/// Prefix sign; `Plus` keeps the value unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp { Neg, Plus }

impl Expr {
    /// Build `left op right`
    pub fn binary(left: Expr, op: BinOp, right: Expr) -> Self {
        Expr::BinaryOp(Box::new(left), op, Box::new(right))
    }

    /// Build `op operand`
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::UnaryOp(op, Box::new(operand))
    }
}
