//! Parse error types for xRSL.

use thiserror::Error;

use crate::diagnostics::ParseStatus;
use crate::parser::ast::Location;

/// A syntax error. Parsing stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Malformed grammar at a known position.
    ///
    /// `recognized` is set once any inner expression of a boolean group had
    /// been parsed before the failure.
    #[error("syntax error at {location}: {message}")]
    Syntax {
        location: Location,
        message: String,
        recognized: bool,
    },

    /// A `(*` without its closing `*)`.
    #[error("end of comment not found at {location}")]
    UnterminatedComment { location: Location },

    /// Content left over after a complete expression.
    #[error("junk at end of RSL at {location}")]
    TrailingInput { location: Location },
}

impl ParseError {
    pub fn location(&self) -> Location {
        match self {
            ParseError::Syntax { location, .. }
            | ParseError::UnterminatedComment { location }
            | ParseError::TrailingInput { location } => *location,
        }
    }

    /// Whether the input looked like xRSL at all.
    pub fn status(&self) -> ParseStatus {
        match self {
            ParseError::Syntax {
                recognized: false, ..
            }
            | ParseError::UnterminatedComment { .. } => ParseStatus::WrongLanguage,
            ParseError::Syntax {
                recognized: true, ..
            }
            | ParseError::TrailingInput { .. } => ParseStatus::Failure,
        }
    }
}
