//! Token-level primitives shared by the value and condition parsers.

use winnow::combinator::{alt, opt};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{take_till, take_until, take_while};
use xrsl_semantics::RESERVED_CHARS;

use crate::parser::ast::{BoolOp, Location, RelOp};

/// Run `parser`, restoring the input if it fails.
pub(super) fn attempt<'i, O>(
    input: &mut &'i str,
    mut parser: impl Parser<&'i str, O, ErrMode<ContextError>>,
) -> Option<O> {
    let start = *input;
    match parser.parse_next(input) {
        Ok(output) => Some(output),
        Err(_) => {
            *input = start;
            None
        }
    }
}

/// Calculate line and column from original input and remaining input.
pub(super) fn calculate_position(original: &str, remaining: &str) -> Location {
    let consumed = original.len() - remaining.len();
    let consumed_str = &original[..consumed];
    let line = consumed_str.chars().filter(|&c| c == '\n').count() + 1;
    let column = match consumed_str.rfind('\n') {
        Some(pos) => consumed_str[pos + 1..].chars().count() + 1,
        None => consumed_str.chars().count() + 1,
    };
    Location { line, column }
}

pub(super) fn is_rsl_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Skip whitespace and `(* ... *)` comments.
///
/// Returns whether anything was skipped. On an unterminated comment the
/// error carries the input at the comment opener.
pub(super) fn blank<'i>(input: &mut &'i str) -> Result<bool, &'i str> {
    let before = input.len();
    loop {
        attempt(input, take_while(0.., is_rsl_space));
        let opener = *input;
        if attempt(input, "(*").is_none() {
            break;
        }
        if attempt(input, (take_until(0.., "*)"), "*)")).is_none() {
            return Err(opener);
        }
    }
    Ok(input.len() != before)
}

/// The body of a quoted literal after its opening delimiter.
///
/// A doubled delimiter stands for one literal delimiter.
pub(super) fn quoted_body(input: &mut &str, mut delim: char) -> ModalResult<String> {
    let mut text = String::new();
    loop {
        let chunk: &str = take_till(0.., delim).parse_next(input)?;
        text.push_str(chunk);
        delim.parse_next(input)?;
        if opt(delim).parse_next(input)?.is_none() {
            return Ok(text);
        }
        text.push(delim);
    }
}

/// A maximal run of characters that are neither reserved nor whitespace.
pub(super) fn bare_token<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| !is_rsl_space(c) && !RESERVED_CHARS.contains(c)).parse_next(input)
}

pub(super) fn bool_op(input: &mut &str) -> ModalResult<BoolOp> {
    alt((
        '+'.value(BoolOp::Multi),
        '&'.value(BoolOp::And),
        '|'.value(BoolOp::Or),
    ))
    .parse_next(input)
}

pub(super) fn rel_op(input: &mut &str) -> ModalResult<RelOp> {
    alt((
        "!=".value(RelOp::Ne),
        "<=".value(RelOp::Le),
        ">=".value(RelOp::Ge),
        '='.value(RelOp::Eq),
        '<'.value(RelOp::Lt),
        '>'.value(RelOp::Gt),
    ))
    .parse_next(input)
}
