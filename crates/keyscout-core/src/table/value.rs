use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single cell of an ingested table.
///
/// The variant is the cell's storage representation, decided once at
/// ingestion time. Profiling never re-parses strings: a column of `String`
/// cells holding digits is still a string column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    DateTime(NaiveDateTime),
    String(String),
}

impl Value {
    /// `Null` and `Float(NaN)` are both missing values.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Hashable identity used for distinct counts and set overlap.
    ///
    /// Returns `None` for missing values. Floats holding an integral value
    /// share the integer key, so `3` and `3.0` are the same member.
    pub fn key(&self) -> Option<ValueKey<'_>> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(ValueKey::Bool(*b)),
            Value::Int(i) => Some(ValueKey::Int(*i)),
            Value::Float(f) => {
                if f.is_nan() {
                    None
                } else if f.fract() == 0.0 && f.abs() < 9.0e15 {
                    Some(ValueKey::Int(*f as i64))
                } else {
                    Some(ValueKey::Float(f.to_bits()))
                }
            }
            Value::DateTime(dt) => Some(ValueKey::DateTime(*dt)),
            Value::String(s) => Some(ValueKey::String(s)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => {
                if fl.is_finite() && fl.fract() == 0.0 && fl.abs() < 1.0e16 {
                    write!(f, "{:.1}", fl)
                } else {
                    write!(f, "{}", fl)
                }
            }
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Value::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Borrowed set-membership key for a non-null [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKey<'a> {
    Bool(bool),
    Int(i64),
    /// Bit pattern of a non-integral, non-NaN float.
    Float(u64),
    DateTime(NaiveDateTime),
    String(&'a str),
}
