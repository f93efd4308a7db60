//! Public syntax tree types for xRSL documents.
//!
//! A document is a tree of [`Rsl`] nodes. Leaves are [`Condition`]s binding an
//! attribute to a [`ValueList`]; inner nodes are [`Boolean`] combinators.

use std::fmt;
use std::slice;

use xrsl_semantics::normalize_attribute;

/// A 1-based position in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A single value inside a value list.
///
/// `Variable` and `Concat` only exist before evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Quoted or bare text.
    Literal {
        text: String,
        location: Option<Location>,
    },
    /// A `$(name)` reference.
    Variable {
        name: String,
        location: Option<Location>,
    },
    /// Two values joined by `#` or by adjacency.
    Concat {
        left: Box<Value>,
        right: Box<Value>,
        location: Option<Location>,
    },
    /// A parenthesized tuple such as `("in1" "gsiftp://host/in1")`.
    Sequence {
        values: ValueList,
        location: Option<Location>,
    },
}

impl Value {
    /// A literal with no source location.
    pub fn literal(text: impl Into<String>) -> Value {
        Value::Literal {
            text: text.into(),
            location: None,
        }
    }

    /// A sequence of literals with no source location.
    pub fn sequence<I, S>(items: I) -> Value
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::Sequence {
            values: ValueList::literals(items),
            location: None,
        }
    }

    pub fn concat(left: Value, right: Value) -> Value {
        let location = left.location();
        Value::Concat {
            left: Box::new(left),
            right: Box::new(right),
            location,
        }
    }

    pub fn location(&self) -> Option<Location> {
        match self {
            Value::Literal { location, .. }
            | Value::Variable { location, .. }
            | Value::Concat { location, .. }
            | Value::Sequence { location, .. } => *location,
        }
    }

    /// The literal text, if this value is a literal.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Value::Literal { text, .. } => Some(text),
            Value::Variable { .. } | Value::Concat { .. } | Value::Sequence { .. } => None,
        }
    }

    /// The inner list, if this value is a sequence.
    pub fn as_sequence(&self) -> Option<&ValueList> {
        match self {
            Value::Sequence { values, .. } => Some(values),
            Value::Literal { .. } | Value::Variable { .. } | Value::Concat { .. } => None,
        }
    }
}

/// An ordered list of values.
///
/// Whitespace-separated values on the right-hand side of a condition form a
/// list, as do the members of a sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueList {
    pub values: Vec<Value>,
    pub location: Option<Location>,
}

impl ValueList {
    pub fn new(values: Vec<Value>) -> ValueList {
        ValueList {
            values,
            location: None,
        }
    }

    /// A list of literals with no source location.
    pub fn literals<I, S>(items: I) -> ValueList
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValueList::new(items.into_iter().map(Value::literal).collect())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Value> {
        self.values.iter()
    }
}

impl<'a> IntoIterator for &'a ValueList {
    type Item = &'a Value;
    type IntoIter = slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Boolean combinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolOp {
    /// `+`: independent job requests bundled in one document.
    Multi,
    /// `&`: conjunction.
    And,
    /// `|`: alternative interpretations of the same request.
    Or,
}

/// Relational operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

/// A node of the boolean tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Rsl {
    Boolean(Boolean),
    Condition(Condition),
}

impl Rsl {
    pub fn location(&self) -> Option<Location> {
        match self {
            Rsl::Boolean(boolean) => boolean.location,
            Rsl::Condition(condition) => condition.location,
        }
    }
}

/// A combinator with one child per parenthesized group, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Boolean {
    pub op: BoolOp,
    pub children: Vec<Rsl>,
    pub location: Option<Location>,
}

impl Boolean {
    pub fn new(op: BoolOp, children: Vec<Rsl>) -> Boolean {
        Boolean {
            op,
            children,
            location: None,
        }
    }
}

/// An `attribute op values` leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    attribute: String,
    pub op: RelOp,
    pub values: ValueList,
    pub location: Option<Location>,
}

impl Condition {
    /// Build a condition, normalizing the attribute name.
    pub fn new(attribute: &str, op: RelOp, values: ValueList) -> Condition {
        Condition {
            attribute: normalize_attribute(attribute),
            op,
            values,
            location: None,
        }
    }

    /// Attach a source location.
    pub fn at(mut self, location: Option<Location>) -> Condition {
        self.location = location;
        self
    }

    /// The normalized attribute name.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }
}
