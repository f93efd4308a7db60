//! Condition and boolean parser.
//!
//! Grammar:
//!
//! ```text
//! rsl       := boolop '(' rsl ')' { '(' rsl ')' } | condition
//! boolop    := '+' | '&' | '|'
//! condition := attr relop valuelist
//! relop     := '=' | '!=' | '<' | '>' | '<=' | '>='
//! ```

use xrsl_semantics::contains_reserved;

use super::ast::{Boolean, BoolOp, Condition, Location, Rsl};
use super::error::ParseError;
use super::scanner::{self, attempt, bare_token, bool_op, calculate_position, rel_op};

const USER_DELIMITED_UNTERMINATED: &str = "end of user delimiter quoted string not found";

/// Parse an xRSL document into its raw syntax tree.
///
/// Comments are skipped wherever whitespace is allowed. Content left after a
/// complete expression is an error.
pub fn parse_rsl(source: &str) -> Result<Rsl, ParseError> {
    let mut grammar = Grammar {
        source,
        recognized: false,
    };
    let mut input = source;
    let rsl = grammar.rsl(&mut input)?;
    grammar.blank(&mut input)?;
    if input.is_empty() {
        Ok(rsl)
    } else {
        Err(ParseError::TrailingInput {
            location: calculate_position(source, input),
        })
    }
}

/// Parser state for one invocation.
pub(super) struct Grammar<'s> {
    source: &'s str,
    /// Set once an inner expression of a boolean group has been parsed.
    recognized: bool,
}

impl<'s> Grammar<'s> {
    pub(super) fn location(&self, input: &str) -> Location {
        calculate_position(self.source, input)
    }

    pub(super) fn syntax(&self, input: &str, message: &str) -> ParseError {
        ParseError::Syntax {
            location: self.location(input),
            message: message.to_string(),
            recognized: self.recognized,
        }
    }

    /// Skip whitespace and comments, reporting whether anything was skipped.
    pub(super) fn blank(&self, input: &mut &'s str) -> Result<bool, ParseError> {
        scanner::blank(input).map_err(|opener| ParseError::UnterminatedComment {
            location: self.location(opener),
        })
    }

    pub(super) fn expect(
        &self,
        input: &mut &'s str,
        token: char,
        message: &str,
    ) -> Result<(), ParseError> {
        match attempt(input, token) {
            Some(_) => Ok(()),
            None => Err(self.syntax(input, message)),
        }
    }

    /// A literal under any of the three quoting styles, or a bare token.
    ///
    /// Returns `None` when no string starts here; that is not an error.
    pub(super) fn string(&self, input: &mut &'s str) -> Result<Option<String>, ParseError> {
        let start = *input;
        let (delim, unterminated) = match input.chars().next() {
            Some('\'') => ('\'', "end of single quoted string not found"),
            Some('"') => ('"', "end of double quoted string not found"),
            Some('^') => match start[1..].chars().next() {
                Some(delim) => (delim, USER_DELIMITED_UNTERMINATED),
                None => return Err(self.syntax(start, USER_DELIMITED_UNTERMINATED)),
            },
            _ => return Ok(attempt(input, bare_token).map(str::to_string)),
        };
        // Step over the opener: one char for quotes, '^' plus the delimiter otherwise.
        let opener_len = if start.starts_with('^') {
            1 + delim.len_utf8()
        } else {
            1
        };
        *input = &start[opener_len..];
        match attempt(input, |i: &mut &'s str| scanner::quoted_body(i, delim)) {
            Some(text) => Ok(Some(text)),
            None => {
                *input = start;
                Err(self.syntax(start, unterminated))
            }
        }
    }

    fn rsl(&mut self, input: &mut &'s str) -> Result<Rsl, ParseError> {
        self.blank(input)?;
        let location = self.location(input);
        match attempt(input, bool_op) {
            Some(op) => self.boolean(input, op, location),
            None => self.condition(input, location),
        }
    }

    fn boolean(
        &mut self,
        input: &mut &'s str,
        op: BoolOp,
        location: Location,
    ) -> Result<Rsl, ParseError> {
        let mut children = Vec::new();
        loop {
            self.blank(input)?;
            if attempt(input, '(').is_none() {
                if children.is_empty() {
                    return Err(self.syntax(input, "'(' expected"));
                }
                break;
            }
            let child = self.rsl(input)?;
            self.recognized = true;
            self.blank(input)?;
            self.expect(input, ')', "')' expected")?;
            children.push(child);
        }
        Ok(Rsl::Boolean(Boolean {
            op,
            children,
            location: Some(location),
        }))
    }

    fn condition(&mut self, input: &mut &'s str, location: Location) -> Result<Rsl, ParseError> {
        let Some(attribute) = self.string(input)? else {
            return Err(self.syntax(input, "attribute name expected"));
        };
        if contains_reserved(&attribute) {
            return Err(self.syntax(input, "attribute name contains invalid character"));
        }
        self.blank(input)?;
        let Some(op) = attempt(input, rel_op) else {
            return Err(self.syntax(input, "relation operator expected"));
        };
        self.blank(input)?;
        let values = self.value_list(input)?;
        Ok(Rsl::Condition(
            Condition::new(&attribute, op, values).at(Some(location)),
        ))
    }
}
