//! Error types for mapping between xRSL and job descriptions.

use thiserror::Error;

use crate::job::{PeriodError, UrlError};
use crate::parser::{Location, RelOp};

/// A semantic error found while applying a condition to a job description.
///
/// These are collected rather than returned early so that one pass reports
/// every problem in a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("xRSL attribute {attribute} is not a single value")]
    NotSingleValue {
        attribute: String,
        location: Option<Location>,
    },

    #[error("xRSL attribute {attribute} is not a string")]
    NotString {
        attribute: String,
        location: Option<Location>,
    },

    #[error("xRSL attribute {attribute} is not sequence")]
    NotSequence {
        attribute: String,
        location: Option<Location>,
    },

    #[error("xRSL attribute {attribute} has wrong sequence length, expected {expected}")]
    SequenceLength {
        attribute: String,
        expected: &'static str,
        location: Option<Location>,
    },

    #[error("operator {op} is not allowed for xRSL attribute {attribute}")]
    InvalidOperator {
        attribute: String,
        op: RelOp,
        location: Option<Location>,
    },

    #[error("invalid {attribute} value '{value}'")]
    InvalidValue {
        attribute: String,
        value: String,
        location: Option<Location>,
    },

    #[error("{attribute} value {value} is out of range {range}")]
    OutOfRange {
        attribute: String,
        value: String,
        range: &'static str,
        location: Option<Location>,
    },

    #[error("invalid time for xRSL attribute {attribute}: {source}")]
    Period {
        attribute: String,
        source: PeriodError,
        location: Option<Location>,
    },

    #[error("xRSL attribute {attribute}: {source}")]
    Url {
        attribute: String,
        source: UrlError,
        location: Option<Location>,
    },

    #[error("file option '{option}' is not of the form key=value")]
    FileOption {
        option: String,
        location: Option<Location>,
    },

    #[error("syntax error in notify attribute value ('{value}'), {reason}")]
    Notify {
        value: String,
        reason: &'static str,
        location: Option<Location>,
    },

    #[error("xRSL attribute action is not allowed in a client-side job description")]
    ActionNotAllowed { location: Option<Location> },

    #[error("file '{name}' listed in executables is not one of the input files")]
    UnknownExecutable {
        name: String,
        location: Option<Location>,
    },

    #[error("countpernode requires count to be specified")]
    CountPerNodeWithoutCount { location: Option<Location> },

    #[error("join requires stdout to be specified")]
    JoinWithoutStdout { location: Option<Location> },

    #[error("join is set but stdout ({stdout}) and stderr ({stderr}) differ")]
    JoinConflict {
        stdout: String,
        stderr: String,
        location: Option<Location>,
    },

    #[error("gridtime cannot be combined with cputime or walltime")]
    GridTimeConflict { location: Option<Location> },

    #[error("no executable given")]
    MissingExecutable,

    #[error("multiple job requests in one description are not supported by this dialect")]
    MultipleRequests,
}

impl MappingError {
    pub fn location(&self) -> Option<Location> {
        match self {
            MappingError::NotSingleValue { location, .. }
            | MappingError::NotString { location, .. }
            | MappingError::NotSequence { location, .. }
            | MappingError::SequenceLength { location, .. }
            | MappingError::InvalidOperator { location, .. }
            | MappingError::InvalidValue { location, .. }
            | MappingError::OutOfRange { location, .. }
            | MappingError::Period { location, .. }
            | MappingError::Url { location, .. }
            | MappingError::FileOption { location, .. }
            | MappingError::Notify { location, .. }
            | MappingError::ActionNotAllowed { location }
            | MappingError::UnknownExecutable { location, .. }
            | MappingError::CountPerNodeWithoutCount { location }
            | MappingError::JoinWithoutStdout { location }
            | MappingError::JoinConflict { location, .. }
            | MappingError::GridTimeConflict { location } => *location,
            MappingError::MissingExecutable | MappingError::MultipleRequests => None,
        }
    }
}

/// A job description that cannot be written as xRSL.
///
/// Assembly stops at the first one; no partial text is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssembleError {
    #[error("language '{language}' is not supported, only nordugrid:xrsl is")]
    UnsupportedLanguage { language: String },

    #[error("no executable given")]
    MissingExecutable,

    #[error("an input file has an empty name")]
    EmptyInputFileName,

    #[error("an output file has an empty name")]
    EmptyOutputFileName,

    #[error("slots per host is set without a number of slots")]
    SlotsPerHostWithoutCount,

    #[error("notification for {email} has no states")]
    EmptyNotification { email: String },
}
