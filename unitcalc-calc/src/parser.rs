//! Arithmetic parser (recursive descent)
//!
//! Grammar:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | primary
//! primary := number | '(' expr ')'
//! ```
//!
//! Numbers are decimal literals with an optional exponent (`12`, `.5`, `2.`,
//! `1.5e-3`). Identifiers, calls and every other character are rejected.

use crate::ast::{BinOp, Expr, UnaryOp};
use unitcalc_core::{CalcError, CalcResult};

/// Parentheses and unary signs nested deeper than this are rejected
const MAX_DEPTH: usize = 256;

/// Expressions with more tokens than this are rejected. Binary chains build
/// one tree level per operator, so this also bounds evaluation depth.
const MAX_TOKENS: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => n.to_string(),
            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Star => "*".to_string(),
            Token::Slash => "/".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
        }
    }
}

/// Parse an arithmetic expression into an AST
pub fn parse_arithmetic(input: &str) -> CalcResult<Expr> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(CalcError::invalid_input("empty expression"));
    }

    let mut parser = Parser { tokens, pos: 0, depth: 0 };
    let expr = parser.parse_expr()?;

    if let Some((token, at)) = parser.peek() {
        return Err(CalcError::invalid_input(format!(
            "unexpected '{}' at position {}", token.describe(), at
        )));
    }
    Ok(expr)
}

/// Split input into tokens, recording the char position of each
fn tokenize(input: &str) -> CalcResult<Vec<(Token, usize)>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if !chars[i].is_whitespace() && tokens.len() >= MAX_TOKENS {
            return Err(CalcError::invalid_input(format!(
                "expression longer than {} tokens", MAX_TOKENS
            )));
        }
        let c = chars[i];
        let token = match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '0'..='9' | '.' => {
                let (value, len) = scan_number(&chars[i..])
                    .ok_or_else(|| CalcError::invalid_input(format!("malformed number at position {}", i)))?;
                tokens.push((Token::Number(value), i));
                i += len;
                continue;
            }
            other => {
                return Err(CalcError::invalid_input(format!(
                    "unexpected '{}' at position {}", other, i
                )));
            }
        };
        tokens.push((token, i));
        i += 1;
    }

    Ok(tokens)
}

/// Scan a decimal literal at the start of `chars`; returns its value and length
fn scan_number(chars: &[char]) -> Option<(f64, usize)> {
    let mut end = 0;
    let mut digits = 0;

    while end < chars.len() && chars[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < chars.len() && chars[end] == '.' {
        end += 1;
        while end < chars.len() && chars[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows
    if end < chars.len() && (chars[end] == 'e' || chars[end] == 'E') {
        let mut exp_end = end + 1;
        if exp_end < chars.len() && (chars[exp_end] == '+' || chars[exp_end] == '-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < chars.len() && chars[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end == exp_digits_start {
            return None;
        }
        end = exp_end;
    }

    let text: String = chars[..end].iter().collect();
    let value: f64 = text.parse().ok()?;
    Some((value, end))
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<(Token, usize)> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<(Token, usize)> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn enter(&mut self) -> CalcResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CalcError::invalid_input("expression nested too deeply"));
        }
        Ok(())
    }

    fn parse_expr(&mut self) -> CalcResult<Expr> {
        let mut left = self.parse_term()?;

        while let Some((token, _)) = self.peek() {
            let op = match token {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = Expr::binary(left, op, right);
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> CalcResult<Expr> {
        let mut left = self.parse_unary()?;

        while let Some((token, _)) = self.peek() {
            let op = match token {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::binary(left, op, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> CalcResult<Expr> {
        let op = match self.peek() {
            Some((Token::Minus, _)) => UnaryOp::Neg,
            Some((Token::Plus, _)) => UnaryOp::Plus,
            _ => return self.parse_primary(),
        };
        self.advance();
        self.enter()?;
        let operand = self.parse_unary()?;
        self.depth -= 1;
        Ok(Expr::unary(op, operand))
    }

    fn parse_primary(&mut self) -> CalcResult<Expr> {
        match self.advance() {
            Some((Token::Number(n), _)) => Ok(Expr::Number(n)),
            Some((Token::LParen, at)) => {
                self.enter()?;
                let inner = self.parse_expr()?;
                self.depth -= 1;
                match self.advance() {
                    Some((Token::RParen, _)) => Ok(inner),
                    _ => Err(CalcError::invalid_input(format!(
                        "unclosed '(' at position {}", at
                    ))),
                }
            }
            Some((token, at)) => Err(CalcError::invalid_input(format!(
                "unexpected '{}' at position {}", token.describe(), at
            ))),
            None => Err(CalcError::invalid_input("unexpected end of expression")),
        }
    }
}
