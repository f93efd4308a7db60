//! Shape checks for condition values.

use std::str::FromStr;

use strsim::levenshtein;
use xrsl_semantics::{Dialect, accepted_attribute_names};

use super::error::MappingError;
use crate::parser::Condition;

/// The one literal of a single-valued attribute.
pub(super) fn single(condition: &Condition) -> Result<&str, MappingError> {
    let [value] = condition.values.values.as_slice() else {
        return Err(MappingError::NotSingleValue {
            attribute: condition.attribute().to_string(),
            location: condition.location,
        });
    };
    value.as_literal().ok_or_else(|| MappingError::NotString {
        attribute: condition.attribute().to_string(),
        location: condition.location,
    })
}

/// All literals of a list-valued attribute.
pub(super) fn list(condition: &Condition) -> Result<Vec<&str>, MappingError> {
    condition
        .values
        .iter()
        .map(|value| {
            value.as_literal().ok_or_else(|| MappingError::NotString {
                attribute: condition.attribute().to_string(),
                location: condition.location,
            })
        })
        .collect()
}

/// Allowed element counts of a sequence-valued attribute.
#[derive(Debug, Clone, Copy)]
pub(super) enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    fn accepts(self, len: usize) -> bool {
        match self {
            Arity::Exactly(n) => len == n,
            Arity::AtLeast(n) => len >= n,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Arity::Exactly(2) => "2",
            Arity::Exactly(3) => "3",
            Arity::AtLeast(2) => "at least 2",
            Arity::Exactly(_) | Arity::AtLeast(_) => "another length",
        }
    }
}

/// The literal elements of each sequence of a tuple-valued attribute.
pub(super) fn sequences(
    condition: &Condition,
    arity: Arity,
) -> Result<Vec<Vec<&str>>, MappingError> {
    let attribute = || condition.attribute().to_string();
    condition
        .values
        .iter()
        .map(|value| {
            let location = value.location().or(condition.location);
            let sequence = value.as_sequence().ok_or_else(|| MappingError::NotSequence {
                attribute: attribute(),
                location,
            })?;
            if !arity.accepts(sequence.len()) {
                return Err(MappingError::SequenceLength {
                    attribute: attribute(),
                    expected: arity.describe(),
                    location,
                });
            }
            sequence
                .iter()
                .map(|element| {
                    element.as_literal().ok_or_else(|| MappingError::NotString {
                        attribute: attribute(),
                        location,
                    })
                })
                .collect()
        })
        .collect()
}

/// Parse a number, reporting the attribute on failure.
pub(super) fn number<T: FromStr>(condition: &Condition, text: &str) -> Result<T, MappingError> {
    text.trim()
        .parse()
        .map_err(|_| MappingError::InvalidValue {
            attribute: condition.attribute().to_string(),
            value: text.to_string(),
            location: condition.location,
        })
}

pub(super) fn invalid(condition: &Condition, value: &str) -> MappingError {
    MappingError::InvalidValue {
        attribute: condition.attribute().to_string(),
        value: value.to_string(),
        location: condition.location,
    }
}

/// Attribute names close to an unknown one, nearest first.
pub(super) fn suggestions(name: &str, dialect: Dialect) -> Vec<&'static str> {
    let max_distance = if name.len() <= 3 { 1 } else { 2 };
    let mut close: Vec<(usize, &'static str)> = accepted_attribute_names(dialect)
        .into_iter()
        .filter_map(|candidate| {
            let dist = levenshtein(name, candidate);
            (dist > 0 && dist <= max_distance).then_some((dist, candidate))
        })
        .collect();
    close.sort_by_key(|(dist, _)| *dist);
    close.into_iter().take(3).map(|(_, name)| name).collect()
}
