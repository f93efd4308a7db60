//! Value list parser.
//!
//! Values are separated by whitespace. Two values are joined into a
//! [`Value::Concat`] either explicitly with `#` or implicitly when a literal
//! or variable directly follows another one with no whitespace in between.

use xrsl_semantics::contains_reserved;

use super::ast::{Value, ValueList};
use super::error::ParseError;
use super::rsl::Grammar;
use super::scanner::attempt;

/// How the next parsed value relates to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Adjacency {
    Separate,
    Explicit,
    Implicit,
}

impl<'s> Grammar<'s> {
    /// Parse values until none can be read. Running out of values ends the
    /// list and is not an error.
    pub(super) fn value_list(&mut self, input: &mut &'s str) -> Result<ValueList, ParseError> {
        let location = self.location(input);
        let mut values = Vec::new();
        let mut left: Option<Value> = None;
        let mut adjacency = Adjacency::Separate;
        loop {
            if self.blank(input)? {
                adjacency = Adjacency::Separate;
            }
            let marker = *input;
            if attempt(input, '#').is_some() {
                self.blank(input)?;
                adjacency = Adjacency::Explicit;
            }
            let right = self.value(input)?;
            let produced = right.is_some();
            let next = match &right {
                Some(Value::Literal { .. } | Value::Variable { .. }) => Adjacency::Implicit,
                Some(Value::Concat { .. } | Value::Sequence { .. }) | None => Adjacency::Separate,
            };
            match adjacency {
                Adjacency::Separate => {
                    values.extend(left.take());
                    left = right;
                }
                Adjacency::Explicit => {
                    let Some(operand) = left.take() else {
                        return Err(
                            self.syntax(marker, "no left operand for concatenation operator")
                        );
                    };
                    let Some(next_operand) = right else {
                        return Err(
                            self.syntax(input, "no right operand for concatenation operator")
                        );
                    };
                    left = Some(Value::concat(operand, next_operand));
                }
                Adjacency::Implicit => {
                    left = match (left.take(), right) {
                        (Some(operand), Some(next_operand)) => {
                            Some(Value::concat(operand, next_operand))
                        }
                        (operand, None) => operand,
                        (None, next_operand) => next_operand,
                    };
                }
            }
            adjacency = next;
            if left.is_none() && !produced {
                break;
            }
        }
        Ok(ValueList {
            values,
            location: Some(location),
        })
    }

    /// One value: a parenthesized sequence, a `$(name)` variable or a literal.
    fn value(&mut self, input: &mut &'s str) -> Result<Option<Value>, ParseError> {
        let location = Some(self.location(input));
        if attempt(input, '(').is_some() {
            let values = self.value_list(input)?;
            self.blank(input)?;
            self.expect(input, ')', "')' expected")?;
            return Ok(Some(Value::Sequence { values, location }));
        }
        if attempt(input, '$').is_some() {
            self.blank(input)?;
            self.expect(input, '(', "'(' expected")?;
            self.blank(input)?;
            let Some(name) = self.string(input)? else {
                return Err(self.syntax(input, "variable name expected"));
            };
            if contains_reserved(&name) {
                return Err(self.syntax(input, "variable name contains invalid character"));
            }
            self.blank(input)?;
            self.expect(input, ')', "')' expected")?;
            return Ok(Some(Value::Variable { name, location }));
        }
        Ok(self
            .string(input)?
            .map(|text| Value::Literal { text, location }))
    }
}
