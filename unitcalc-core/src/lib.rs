//! unitcalc Core - Fundamental types
//!
//! This crate provides the types shared by every unitcalc component:
//! - `CalcError`: Structured errors returned as values, never panics
//! - `parse_number`: Real-number literal parsing for raw text input
//! - `format_fixed` / `format_natural`: Display formatting of results

mod error;
mod number;

pub use error::{CalcError, ErrorKind, codes};
pub use number::{NumberError, parse_number, format_fixed, format_natural, approx_eq};

/// Result alias used throughout the workspace
pub type CalcResult<T> = Result<T, CalcError>;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{CalcError, CalcResult, ErrorKind};
    pub use crate::error::codes;
}
