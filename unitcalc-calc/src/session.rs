//! Calculator keypad session
//!
//! The display is an append-only buffer. `=` evaluates it, `C` clears it.
//! After a result is shown, further keys append to the result text.

use std::fmt;
use serde::{Deserialize, Serialize};
use tracing::debug;
use unitcalc_core::format_natural;
use crate::evaluate;

/// Text shown when evaluation fails
pub const ERROR_MARKER: &str = "Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }
}

/// A keypad button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Digit(u8),
    Point,
    Operator(Operator),
    Power,
    Sqrt,
    Sin,
    Cos,
    Tan,
    Log,
    Exp,
    Equals,
    Clear,
}

impl Key {
    /// Keypad layout, row by row
    pub const KEYPAD: [&'static str; 24] = [
        "7", "8", "9", "/",
        "4", "5", "6", "*",
        "1", "2", "3", "-",
        "0", ".", "=", "+",
        "^", "√", "sin", "cos",
        "tan", "log", "exp", "C",
    ];

    /// Parse a button label
    pub fn from_label(label: &str) -> Option<Key> {
        let key = match label.trim() {
            "." => Key::Point,
            "+" => Key::Operator(Operator::Add),
            "-" => Key::Operator(Operator::Sub),
            "*" => Key::Operator(Operator::Mul),
            "/" => Key::Operator(Operator::Div),
            "^" => Key::Power,
            "√" => Key::Sqrt,
            "sin" => Key::Sin,
            "cos" => Key::Cos,
            "tan" => Key::Tan,
            "log" => Key::Log,
            "exp" => Key::Exp,
            "=" => Key::Equals,
            "C" | "c" => Key::Clear,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(d), None) if d.is_ascii_digit() => Key::Digit(d as u8 - b'0'),
                    _ => return None,
                }
            }
        };
        Some(key)
    }

    /// Text appended to the display by this key
    pub fn label(&self) -> String {
        match self {
            Key::Digit(d) => d.to_string(),
            Key::Point => ".".to_string(),
            Key::Operator(op) => op.symbol().to_string(),
            Key::Power => "^".to_string(),
            Key::Sqrt => "√".to_string(),
            Key::Sin => "sin".to_string(),
            Key::Cos => "cos".to_string(),
            Key::Tan => "tan".to_string(),
            Key::Log => "log".to_string(),
            Key::Exp => "exp".to_string(),
            Key::Equals => "=".to_string(),
            Key::Clear => "C".to_string(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Where the session is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "text", rename_all = "snake_case")]
pub enum SessionState {
    Empty,
    Accumulating(String),
    /// A result is shown; further input appends to it
    Displayed(String),
    /// The last evaluation failed
    Error,
}

/// One calculator display and its input buffer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    state: SessionState,
    error_marker: String,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Empty,
            error_marker: ERROR_MARKER.to_string(),
        }
    }

    pub fn with_error_marker(mut self, marker: impl Into<String>) -> Self {
        self.error_marker = marker.into();
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Current display text
    pub fn display(&self) -> &str {
        match &self.state {
            SessionState::Empty => "",
            SessionState::Accumulating(buffer) => buffer,
            SessionState::Displayed(text) => text,
            SessionState::Error => &self.error_marker,
        }
    }

    /// Press a key and return the new display text
    pub fn press(&mut self, key: Key) -> &str {
        let next = match (std::mem::replace(&mut self.state, SessionState::Empty), key) {
            (_, Key::Clear) => SessionState::Empty,
            (SessionState::Empty, Key::Equals) | (SessionState::Error, Key::Equals) => SessionState::Error,
            (SessionState::Accumulating(buffer), Key::Equals)
            | (SessionState::Displayed(buffer), Key::Equals) => self.evaluate(&buffer),
            (SessionState::Empty, key) | (SessionState::Error, key) => SessionState::Accumulating(key.label()),
            (SessionState::Accumulating(mut buffer), key) | (SessionState::Displayed(mut buffer), key) => {
                buffer.push_str(&key.label());
                SessionState::Accumulating(buffer)
            }
        };
        self.state = next;
        self.display()
    }

    /// Press a key by its label. Unknown labels leave the session unchanged
    /// and return `None`.
    pub fn press_label(&mut self, label: &str) -> Option<&str> {
        let key = Key::from_label(label)?;
        Some(self.press(key))
    }

    /// Reset to an empty display
    pub fn clear(&mut self) {
        self.state = SessionState::Empty;
    }

    fn evaluate(&self, buffer: &str) -> SessionState {
        match evaluate(buffer) {
            Ok(value) => SessionState::Displayed(format_natural(value)),
            Err(e) => {
                debug!(buffer, error = %e, "calculator evaluation failed");
                SessionState::Error
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
