//! xRSL evaluator.
//!
//! This module resolves `$(name)` references and concatenations in a raw
//! syntax tree, and splits multi-request documents into independent units.

mod document;
mod error;
mod evaluator;
mod scope;
mod split;

pub use document::RslParser;
pub use error::{EvalError, RslError};
pub use evaluator::evaluate;
pub use scope::Scope;
pub use split::split_rsl;
