use std::fmt;

use serde_json::{Map, Number};

/// Canonical semi-structured value.
///
/// Objects keep their keys in input order. Values are finite trees; there is
/// no sharing between nodes, so a `Value` can be freely cloned and compared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Null,
    Bool(bool),
    Num(Number),
    Str(String),
    Obj(Vec<(String, Value)>),
    Arr(Vec<Value>),
}

/// Shape discriminant of a [`Value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Num,
    Str,
    Obj,
    Arr,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Num => "number",
            Self::Str => "string",
            Self::Obj => "object",
            Self::Arr => "array",
        };
        f.write_str(name)
    }
}

impl Value {
    /// The shape of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Num(_) => ValueKind::Num,
            Self::Str(_) => ValueKind::Str,
            Self::Obj(_) => ValueKind::Obj,
            Self::Arr(_) => ValueKind::Arr,
        }
    }

    /// Returns `true` for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for bools, numbers and strings.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Bool(_) | Self::Num(_) | Self::Str(_))
    }

    /// Look up a key on an object. Returns `None` for non-objects.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Obj(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Returns a copy of this value with every object entry named `key`
    /// removed, at every depth.
    pub fn without_key(&self, key: &str) -> Value {
        match self {
            Self::Obj(entries) => Self::Obj(
                entries
                    .iter()
                    .filter(|(k, _)| k != key)
                    .map(|(k, v)| (k.clone(), v.without_key(key)))
                    .collect(),
            ),
            Self::Arr(items) => Self::Arr(items.iter().map(|v| v.without_key(key)).collect()),
            other => other.clone(),
        }
    }

    /// Returns `true` if any object in this tree has an entry named `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        match self {
            Self::Obj(entries) => entries
                .iter()
                .any(|(k, v)| k == key || v.contains_key(key)),
            Self::Arr(items) => items.iter().any(|v| v.contains_key(key)),
            _ => false,
        }
    }
}

impl From<&serde_json::Value> for Value {
    /// Structural deep copy. Strings are kept as literal text here; probing
    /// them for embedded documents is the normalizer's job.
    fn from(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => Self::Num(n.clone()),
            serde_json::Value::String(s) => Self::Str(s.clone()),
            serde_json::Value::Array(items) => Self::Arr(items.iter().map(Self::from).collect()),
            serde_json::Value::Object(map) => Self::Obj(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Num(n) => Self::Number(n.clone()),
            Value::Str(s) => Self::String(s.clone()),
            Value::Arr(items) => Self::Array(items.iter().map(Self::from).collect()),
            Value::Obj(entries) => {
                let mut map = Map::new();
                for (k, v) in entries {
                    map.insert(k.clone(), Self::from(v));
                }
                Self::Object(map)
            }
        }
    }
}
