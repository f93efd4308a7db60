//! Result status and positioned messages reported by `parse` and `assemble`.

use std::error::Error;
use std::fmt;

use crate::interpreter::{EvalError, RslError};
use crate::mapping::{AssembleError, MappingError};
use crate::parser::{Location, ParseError};

/// Overall outcome of a parse or assemble call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ParseStatus {
    /// The input is not xRSL, or the requested language is not handled.
    WrongLanguage,
    /// The input is xRSL but could not be processed.
    Failure,
    #[default]
    Success,
}

/// A single message, positioned when the source location is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub location: Option<Location>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Diagnostic {
        Diagnostic {
            message: message.into(),
            location: None,
        }
    }

    pub fn at(mut self, location: Option<Location>) -> Diagnostic {
        self.location = location;
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(location) => write!(f, "{location}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// An ordered list of messages plus the overall status.
///
/// A non-success value is returned as the error of `parse` and `assemble`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    status: ParseStatus,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Diagnostics {
        Diagnostics::default()
    }

    pub fn wrong_language(message: impl Into<String>) -> Diagnostics {
        Diagnostics {
            status: ParseStatus::WrongLanguage,
            entries: vec![Diagnostic::new(message)],
        }
    }

    pub fn failure(message: impl Into<String>) -> Diagnostics {
        Diagnostics {
            status: ParseStatus::Failure,
            entries: vec![Diagnostic::new(message)],
        }
    }

    pub fn status(&self) -> ParseStatus {
        self.status
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any entry's message contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.entries.iter().any(|entry| entry.message.contains(needle))
    }

    /// Record an error and mark the result as failed.
    pub fn fail(&mut self, diagnostic: impl Into<Diagnostic>) {
        self.status = ParseStatus::Failure;
        self.entries.push(diagnostic.into());
    }

    /// `Ok(value)` unless an error has been recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Diagnostics> {
        match self.status {
            ParseStatus::Success => Ok(value),
            ParseStatus::WrongLanguage | ParseStatus::Failure => Err(self),
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self.status {
            ParseStatus::WrongLanguage => "wrong language",
            ParseStatus::Failure => "failure",
            ParseStatus::Success => "success",
        };
        write!(f, "{status}")?;
        for entry in &self.entries {
            write!(f, "\n  {entry}")?;
        }
        Ok(())
    }
}

impl Error for Diagnostics {}

impl From<&ParseError> for Diagnostic {
    fn from(error: &ParseError) -> Diagnostic {
        let message = match error {
            ParseError::Syntax { message, .. } => message.clone(),
            ParseError::UnterminatedComment { .. } => "end of comment not found".to_string(),
            ParseError::TrailingInput { .. } => "junk at end of RSL".to_string(),
        };
        Diagnostic::new(message).at(Some(error.location()))
    }
}

impl From<ParseError> for Diagnostics {
    fn from(error: ParseError) -> Diagnostics {
        Diagnostics {
            status: error.status(),
            entries: vec![Diagnostic::from(&error)],
        }
    }
}

impl From<EvalError> for Diagnostic {
    fn from(error: EvalError) -> Diagnostic {
        Diagnostic::new(error.to_string()).at(error.location())
    }
}

impl From<MappingError> for Diagnostic {
    fn from(error: MappingError) -> Diagnostic {
        Diagnostic::new(error.to_string()).at(error.location())
    }
}

impl From<AssembleError> for Diagnostic {
    fn from(error: AssembleError) -> Diagnostic {
        Diagnostic::new(error.to_string())
    }
}

impl From<RslError> for Diagnostics {
    fn from(error: RslError) -> Diagnostics {
        match error {
            RslError::Parse(error) => Diagnostics::from(error),
            RslError::Eval(error) => Diagnostics::from(error),
        }
    }
}

macro_rules! failure_from {
    ($($error:ty),*) => {
        $(
            impl From<$error> for Diagnostics {
                fn from(error: $error) -> Diagnostics {
                    Diagnostics {
                        status: ParseStatus::Failure,
                        entries: vec![Diagnostic::from(error)],
                    }
                }
            }
        )*
    };
}

failure_from!(EvalError, MappingError, AssembleError);
