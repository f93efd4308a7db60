//! Resolution of variables and concatenations.
//!
//! Evaluation returns a new tree in which only literals, lists and sequences
//! remain. `rsl_substitution` conditions bind variables for the siblings that
//! follow them and are kept in the evaluated tree.

use tracing::trace;
use xrsl_semantics::AttributeId;

use super::error::EvalError;
use super::scope::Scope;
use crate::parser::{BoolOp, Boolean, Condition, Rsl, Value, ValueList};

/// Evaluate a raw document.
///
/// A `+` root evaluates each of its children with a fresh scope. Any other
/// root is evaluated in a single empty scope.
pub fn evaluate(rsl: &Rsl) -> Result<Rsl, EvalError> {
    match rsl {
        Rsl::Boolean(boolean) if boolean.op == BoolOp::Multi => {
            let children = boolean
                .children
                .iter()
                .map(|child| evaluate_rsl(child, &mut Scope::root()))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Rsl::Boolean(Boolean {
                op: BoolOp::Multi,
                children,
                location: boolean.location,
            }))
        }
        Rsl::Boolean(_) | Rsl::Condition(_) => evaluate_rsl(rsl, &mut Scope::root()),
    }
}

fn evaluate_rsl(rsl: &Rsl, scope: &mut Scope<'_>) -> Result<Rsl, EvalError> {
    match rsl {
        Rsl::Boolean(boolean) => {
            let children = match boolean.op {
                BoolOp::Multi => {
                    return Err(EvalError::MultiNotAtTopLevel {
                        location: boolean.location,
                    });
                }
                BoolOp::And => {
                    let mut shared = scope.child();
                    boolean
                        .children
                        .iter()
                        .map(|child| evaluate_rsl(child, &mut shared))
                        .collect::<Result<Vec<_>, _>>()?
                }
                BoolOp::Or => boolean
                    .children
                    .iter()
                    .map(|child| evaluate_rsl(child, &mut scope.child()))
                    .collect::<Result<Vec<_>, _>>()?,
            };
            Ok(Rsl::Boolean(Boolean {
                op: boolean.op,
                children,
                location: boolean.location,
            }))
        }
        Rsl::Condition(condition) => {
            if condition.attribute() == AttributeId::RslSubstitution.name() {
                evaluate_substitution(condition, scope)
            } else {
                let values = evaluate_list(&condition.values, scope)?;
                Ok(Rsl::Condition(rebuild(condition, values)))
            }
        }
    }
}

/// Bind every `(name value)` pair and keep the evaluated pairs.
fn evaluate_substitution(
    condition: &Condition,
    scope: &mut Scope<'_>,
) -> Result<Rsl, EvalError> {
    let mut pairs = Vec::with_capacity(condition.values.len());
    for value in &condition.values {
        let location = value.location();
        let Some(sequence) = value.as_sequence() else {
            return Err(EvalError::SubstitutionNotSequence {
                value: value.to_string(),
                location,
            });
        };
        let [name, bound] = sequence.values.as_slice() else {
            return Err(EvalError::SubstitutionLength {
                value: value.to_string(),
                location,
            });
        };
        let name = evaluate_value(name, scope)?;
        let bound = evaluate_value(bound, scope)?;
        let Some(name_text) = name.as_literal() else {
            return Err(EvalError::SubstitutionName {
                value: name.to_string(),
                location,
            });
        };
        let Some(bound_text) = bound.as_literal() else {
            return Err(EvalError::SubstitutionValue {
                value: bound.to_string(),
                location,
            });
        };
        trace!(variable = name_text, value = bound_text, "rsl_substitution binding");
        scope.bind(name_text, bound_text);
        pairs.push(Value::Sequence {
            values: ValueList {
                values: vec![name, bound],
                location: sequence.location,
            },
            location,
        });
    }
    Ok(Rsl::Condition(rebuild(
        condition,
        ValueList {
            values: pairs,
            location: condition.values.location,
        },
    )))
}

fn rebuild(condition: &Condition, values: ValueList) -> Condition {
    Condition::new(condition.attribute(), condition.op, values).at(condition.location)
}

fn evaluate_list(list: &ValueList, scope: &Scope<'_>) -> Result<ValueList, EvalError> {
    let values = list
        .iter()
        .map(|value| evaluate_value(value, scope))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ValueList {
        values,
        location: list.location,
    })
}

fn evaluate_value(value: &Value, scope: &Scope<'_>) -> Result<Value, EvalError> {
    match value {
        Value::Literal { .. } => Ok(value.clone()),
        Value::Variable { name, location } => {
            let text = scope.lookup(name).unwrap_or_else(|| {
                trace!(variable = name.as_str(), "unbound variable evaluates to empty");
                ""
            });
            Ok(Value::Literal {
                text: text.to_string(),
                location: *location,
            })
        }
        Value::Concat {
            left,
            right,
            location,
        } => {
            let left = evaluate_value(left, scope)?;
            let right = evaluate_value(right, scope)?;
            let Some(left_text) = left.as_literal() else {
                return Err(EvalError::ConcatLeft {
                    value: left.to_string(),
                    location: *location,
                });
            };
            let Some(right_text) = right.as_literal() else {
                return Err(EvalError::ConcatRight {
                    value: right.to_string(),
                    location: *location,
                });
            };
            Ok(Value::Literal {
                text: format!("{left_text}{right_text}"),
                location: *location,
            })
        }
        Value::Sequence { values, location } => Ok(Value::Sequence {
            values: evaluate_list(values, scope)?,
            location: *location,
        }),
    }
}
