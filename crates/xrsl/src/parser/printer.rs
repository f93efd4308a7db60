//! Serialization of syntax trees back to xRSL text.
//!
//! Literals are always written double-quoted with embedded `"` doubled, so
//! printed output parses back to the same tree regardless of how the
//! original was quoted.

use std::fmt;

use super::ast::{BoolOp, Boolean, Condition, RelOp, Rsl, Value, ValueList};

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BoolOp::Multi => "+",
            BoolOp::And => "&",
            BoolOp::Or => "|",
        };
        f.write_str(symbol)
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            RelOp::Eq => "=",
            RelOp::Ne => "!=",
            RelOp::Lt => "<",
            RelOp::Gt => ">",
            RelOp::Le => "<=",
            RelOp::Ge => ">=",
        };
        f.write_str(symbol)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Literal { text, .. } => write!(f, "\"{}\"", text.replace('"', "\"\"")),
            Value::Variable { name, .. } => write!(f, "$({name})"),
            Value::Concat { left, right, .. } => write!(f, "{left} # {right}"),
            Value::Sequence { values, .. } => write!(f, "({values})"),
        }
    }
}

impl fmt::Display for ValueList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.attribute(), self.op, self.values)
    }
}

impl fmt::Display for Boolean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.op)?;
        for child in &self.children {
            write!(f, "({child})")?;
        }
        Ok(())
    }
}

impl fmt::Display for Rsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rsl::Boolean(boolean) => fmt::Display::fmt(boolean, f),
            Rsl::Condition(condition) => fmt::Display::fmt(condition, f),
        }
    }
}
