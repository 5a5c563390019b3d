// File: src/value.rs
// Purpose: Template variable values

use std::collections::HashMap;
use std::fmt;

use strata_router::ParamValue;

/// Values a template can interpolate
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    String(String),
    /// Ordered values, rendered joined with `/`
    List(Vec<String>),
    Object(HashMap<String, Value>),
    Null,
}

impl Value {
    /// Builds an object from key/value pairs
    pub fn object<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Follows a dotted path (`params.id`) through nested objects
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        path.split('.').try_fold(self, |current, part| match current {
            Value::Object(map) => map.get(part),
            _ => None,
        })
    }

    /// Whether the value can be written into a template
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Object(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::String(s) => f.write_str(s),
            Value::List(items) => f.write_str(&items.join("/")),
            Value::Object(_) => f.write_str("[Object]"),
            Value::Null => Ok(()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(obj: HashMap<String, Value>) -> Self {
        Value::Object(obj)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<&ParamValue> for Value {
    fn from(param: &ParamValue) -> Self {
        match param {
            ParamValue::One(v) => Value::String(v.clone()),
            ParamValue::Many(vs) => Value::List(vs.clone()),
        }
    }
}
