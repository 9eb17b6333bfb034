//! Dynamically typed values

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::Timestamp;

/// A shared handle to a domain object
///
/// Objects are opaque to the engine; properties read them through their
/// accessor closures.
pub type Object = Arc<dyn Any + Send + Sync>;

/// A value read from an object or converted from filter text
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f32),
    Double(f64),
    String(String),
    Date(Timestamp),
    /// Enum variant name
    Enum(String),
    Object(Object),
    Collection(Vec<Value>),
}

impl Value {
    /// Wrap a domain object
    pub fn object<T: Any + Send + Sync>(object: Arc<T>) -> Self {
        Value::Object(object)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Text of a string or enum value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Text form used by pattern and token matching; null, objects and
    /// collections have none
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::String(s) | Value::Enum(s) => Some(s.clone()),
            Value::Boolean(_) | Value::Integer(_) | Value::Float(_) | Value::Double(_) | Value::Date(_) => {
                Some(self.to_string())
            }
            Value::Null | Value::Object(_) | Value::Collection(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(f64::from(*f)),
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&[Value]> {
        match self {
            Value::Collection(items) => Some(items),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Enum(_) => "enum",
            Value::Object(_) => "object",
            Value::Collection(_) => "collection",
        }
    }

    /// Type-dispatched comparison
    ///
    /// Returns `None` when the two values are not comparable: different kinds,
    /// NaN, or two distinct objects. Numbers compare across integer, float and
    /// double; enums compare by variant name and against plain strings.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b))
            | (Value::Enum(a), Value::Enum(b))
            | (Value::String(a), Value::Enum(b))
            | (Value::Enum(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b).then_some(Ordering::Equal),
            (Value::Collection(a), Value::Collection(b)) => {
                if a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y) {
                    Some(Ordering::Equal)
                } else {
                    None
                }
            }
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            },
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Double(x) => write!(f, "{}", x),
            Value::String(s) | Value::Enum(s) => write!(f, "{}", s),
            Value::Date(ts) => write!(f, "{}", ts),
            Value::Object(_) => write!(f, "<object>"),
            Value::Collection(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::String(v.clone())
    }
}

impl From<Timestamp> for Value {
    fn from(v: Timestamp) -> Self {
        Value::Date(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Collection(v.into_iter().map(Into::into).collect())
    }
}
