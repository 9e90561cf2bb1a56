use serde::{Serialize, Deserialize};
use std::fmt;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Coarse value kind used to route an index record to its index table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataTypeCode {
    Unknown,
    IntegerNumber,
    FractalNumber,
    Bool,
    DateTime,
    Guid,
    String,
    Enum,
    Text,
}

impl DataTypeCode {
    /// Value column holding this kind inside an index table.
    pub fn value_column(&self) -> &'static str {
        match self {
            DataTypeCode::IntegerNumber => "IntegerValue",
            DataTypeCode::FractalNumber => "FractalValue",
            DataTypeCode::Bool => "BoolValue",
            DataTypeCode::DateTime => "DateTimeValue",
            DataTypeCode::Guid => "GuidValue",
            DataTypeCode::String
            | DataTypeCode::Enum
            | DataTypeCode::Text
            | DataTypeCode::Unknown => "StringValue",
        }
    }
}

/// A scalar value extracted from a structure member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IndexValue {
    Integer(i64),
    Fractal(f64),
    Bool(bool),
    DateTime(DateTime<Utc>),
    Guid(Uuid),
    String(String),
}

impl IndexValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            IndexValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            IndexValue::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for IndexValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IndexValue::Integer(v) => write!(f, "{}", v),
            IndexValue::Fractal(v) => write!(f, "{}", v),
            IndexValue::Bool(v) => write!(f, "{}", v),
            IndexValue::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            IndexValue::Guid(v) => write!(f, "{}", v.hyphenated()),
            IndexValue::String(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for IndexValue {
    fn from(v: i64) -> Self {
        IndexValue::Integer(v)
    }
}

impl From<i32> for IndexValue {
    fn from(v: i32) -> Self {
        IndexValue::Integer(v as i64)
    }
}

impl From<f64> for IndexValue {
    fn from(v: f64) -> Self {
        IndexValue::Fractal(v)
    }
}

impl From<bool> for IndexValue {
    fn from(v: bool) -> Self {
        IndexValue::Bool(v)
    }
}

impl From<DateTime<Utc>> for IndexValue {
    fn from(v: DateTime<Utc>) -> Self {
        IndexValue::DateTime(v)
    }
}

impl From<Uuid> for IndexValue {
    fn from(v: Uuid) -> Self {
        IndexValue::Guid(v)
    }
}

impl From<&str> for IndexValue {
    fn from(v: &str) -> Self {
        IndexValue::String(v.to_string())
    }
}

impl From<String> for IndexValue {
    fn from(v: String) -> Self {
        IndexValue::String(v)
    }
}
