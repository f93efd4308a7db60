//! A parsed xRSL document with cached results.

use std::cell::OnceCell;

use tracing::debug;

use super::error::RslError;
use super::evaluator::evaluate;
use crate::parser::{ParseError, Rsl, parse_rsl};

/// Parser for one xRSL source text.
///
/// The raw and evaluated trees are each computed at most once; later calls
/// return the cached tree or error.
///
/// ```
/// use xrsl::interpreter::RslParser;
///
/// let parser = RslParser::new("&(rsl_substitution=(X /bin))(executable=$(X)/true)");
/// let evaluated = parser.evaluate().unwrap();
/// assert_eq!(
///     evaluated.to_string(),
///     r#"&(rslsubstitution = ("X" "/bin"))(executable = "/bin/true")"#
/// );
/// ```
#[derive(Debug)]
pub struct RslParser {
    source: String,
    parsed: OnceCell<Result<Rsl, ParseError>>,
    evaluated: OnceCell<Result<Rsl, RslError>>,
}

impl RslParser {
    pub fn new(source: impl Into<String>) -> RslParser {
        RslParser {
            source: source.into(),
            parsed: OnceCell::new(),
            evaluated: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The raw syntax tree.
    pub fn parse(&self) -> Result<&Rsl, ParseError> {
        self.parsed
            .get_or_init(|| {
                let result = parse_rsl(&self.source);
                if let Err(error) = &result {
                    debug!(%error, "RSL parsing failed");
                }
                result
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// The tree with variables and concatenations resolved.
    pub fn evaluate(&self) -> Result<&Rsl, RslError> {
        self.evaluated
            .get_or_init(|| {
                let raw = self.parse()?;
                let result = evaluate(raw);
                if let Err(error) = &result {
                    debug!(%error, "RSL evaluation failed");
                }
                result.map_err(RslError::from)
            })
            .as_ref()
            .map_err(Clone::clone)
    }
}
