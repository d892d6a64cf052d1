use std::fmt;

/// A dynamically-typed Ybor value. Used for token literals, AST literals and
/// everything the interpreter produces.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Nil,
    Number(f64),
    String(String),
}

impl Value {
    /// `nil` and `false` are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(x) => *x,
            Value::Nil => false,
            Value::Number(_) | Value::String(_) => true,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        if let Value::Number(x) = self {
            Some(*x)
        } else {
            None
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(x) => write!(f, "{}", x),
            Value::Nil => write!(f, "nil"),
            // integral numbers keep a trailing ".0" so `3` prints as `3.0`
            Value::Number(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            Value::Number(x) => write!(f, "{}", x),
            Value::String(x) => write!(f, "{}", x),
        }
    }
}
