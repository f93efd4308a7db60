//! The NorduGrid xRSL job description language.
//!
//! Text is parsed into a syntax tree ([`parser`]), variables and
//! concatenations are resolved ([`interpreter`]), and each request in the
//! document is mapped onto a [`JobDescription`] ([`mapping`]). The reverse
//! direction writes a job description back out as xRSL text.

mod api;
pub mod diagnostics;
pub mod interpreter;
pub mod job;
pub mod mapping;
pub mod parser;

pub use api::{JobDescriptionParser, assemble, parse};
pub use diagnostics::{Diagnostic, Diagnostics, ParseStatus};
pub use job::JobDescription;
pub use xrsl_semantics::Dialect;
