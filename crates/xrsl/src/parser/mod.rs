//! xRSL scanner, parser and printer.
//!
//! This module turns xRSL text into a raw syntax tree and prints trees back to
//! text. Variables and concatenations are left unresolved; see
//! [`crate::interpreter`] for evaluation.

pub mod ast;
pub mod error;
mod printer;
mod rsl;
mod scanner;
mod value;

pub use ast::*;
pub use error::ParseError;
pub use rsl::parse_rsl;
