//! Error types for the xRSL evaluator.

use thiserror::Error;

use crate::parser::{Location, ParseError};

/// An error that occurred while resolving variables and concatenations.
///
/// Offending operands are carried in printed xRSL form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A `+` group below the document root.
    #[error("multi-request operator only allowed at top level")]
    MultiNotAtTopLevel { location: Option<Location> },

    /// An `rsl_substitution` value that is not a sequence.
    #[error("rsl_substitution is not a sequence: {value}")]
    SubstitutionNotSequence {
        value: String,
        location: Option<Location>,
    },

    /// An `rsl_substitution` sequence that does not hold exactly two values.
    #[error("rsl_substitution sequence is not of length 2: {value}")]
    SubstitutionLength {
        value: String,
        location: Option<Location>,
    },

    /// The variable name of a substitution is not a literal.
    #[error("rsl_substitution variable name does not evaluate to a literal: {value}")]
    SubstitutionName {
        value: String,
        location: Option<Location>,
    },

    /// The value of a substitution is not a literal.
    #[error("rsl_substitution variable value does not evaluate to a literal: {value}")]
    SubstitutionValue {
        value: String,
        location: Option<Location>,
    },

    /// The left side of a concatenation is not a literal.
    #[error("left operand for concatenation does not evaluate to a literal: {value}")]
    ConcatLeft {
        value: String,
        location: Option<Location>,
    },

    /// The right side of a concatenation is not a literal.
    #[error("right operand for concatenation does not evaluate to a literal: {value}")]
    ConcatRight {
        value: String,
        location: Option<Location>,
    },
}

impl EvalError {
    pub fn location(&self) -> Option<Location> {
        match self {
            EvalError::MultiNotAtTopLevel { location }
            | EvalError::SubstitutionNotSequence { location, .. }
            | EvalError::SubstitutionLength { location, .. }
            | EvalError::SubstitutionName { location, .. }
            | EvalError::SubstitutionValue { location, .. }
            | EvalError::ConcatLeft { location, .. }
            | EvalError::ConcatRight { location, .. } => *location,
        }
    }
}

/// Either stage of turning text into an evaluated tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RslError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}
