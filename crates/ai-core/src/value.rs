use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A value stored in a [`Blackboard`](crate::Blackboard).
///
/// The set of kinds is closed: cloning is always a deep structural copy and equality is
/// structural (`Int(1)` and `Float(1.0)` are different values).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, ValueError>;

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view over both `Int` and `Float`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value.into())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Value::Map(value)
    }
}

/// Typed extraction from a [`Value`].
pub trait FromValue: Sized {
    const KIND: &'static str;

    fn from_value(value: &Value) -> Result<Self>;
}

fn mismatch<T: FromValue>(value: &Value) -> ValueError {
    ValueError::TypeMismatch {
        expected: T::KIND,
        found: value.kind(),
    }
}

impl FromValue for bool {
    const KIND: &'static str = "bool";

    fn from_value(value: &Value) -> Result<Self> {
        value.as_bool().ok_or_else(|| mismatch::<Self>(value))
    }
}

impl FromValue for i64 {
    const KIND: &'static str = "int";

    fn from_value(value: &Value) -> Result<Self> {
        value.as_int().ok_or_else(|| mismatch::<Self>(value))
    }
}

impl FromValue for f64 {
    const KIND: &'static str = "number";

    fn from_value(value: &Value) -> Result<Self> {
        value.as_number().ok_or_else(|| mismatch::<Self>(value))
    }
}

impl FromValue for f32 {
    const KIND: &'static str = "number";

    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_number()
            .map(|n| n as f32)
            .ok_or_else(|| mismatch::<Self>(value))
    }
}

impl FromValue for String {
    const KIND: &'static str = "text";

    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| mismatch::<Self>(value))
    }
}

impl FromValue for Vec<Value> {
    const KIND: &'static str = "list";

    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_list()
            .map(<[Value]>::to_vec)
            .ok_or_else(|| mismatch::<Self>(value))
    }
}

impl FromValue for BTreeMap<String, Value> {
    const KIND: &'static str = "map";

    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_map()
            .cloned()
            .ok_or_else(|| mismatch::<Self>(value))
    }
}

impl FromValue for Value {
    const KIND: &'static str = "value";

    fn from_value(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}
