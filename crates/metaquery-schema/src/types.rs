//! Declared property types

use std::fmt;

use serde::{Deserialize, Serialize};

/// The declared type of a property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueType {
    /// Primitive types
    String,
    Integer,
    Float,
    Double,
    Boolean,
    Date,

    /// Enumeration, matched by variant name
    Enum(EnumType),

    /// Reference to another schema-described type
    Reference(String),

    /// Collection of items
    Collection(Box<ValueType>),
}

/// An enumeration and its legal variant names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    pub variants: Vec<String>,
}

impl EnumType {
    pub fn new(name: impl Into<String>, variants: &[&str]) -> Self {
        Self {
            name: name.into(),
            variants: variants.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn contains(&self, variant: &str) -> bool {
        self.variants.iter().any(|v| v == variant)
    }
}

impl ValueType {
    pub fn collection_of(item: ValueType) -> Self {
        ValueType::Collection(Box::new(item))
    }

    pub fn reference(type_name: impl Into<String>) -> Self {
        ValueType::Reference(type_name.into())
    }

    /// Scalar: neither a reference nor a collection
    pub fn is_simple(&self) -> bool {
        !matches!(self, ValueType::Reference(_) | ValueType::Collection(_))
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, ValueType::Collection(_))
    }

    pub fn item_type(&self) -> Option<&ValueType> {
        match self {
            ValueType::Collection(item) => Some(item),
            _ => None,
        }
    }

    /// Schema name reached when a path walks through this type
    pub fn referenced_type(&self) -> Option<&str> {
        match self {
            ValueType::Reference(name) => Some(name),
            ValueType::Collection(item) => item.referenced_type(),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::String => write!(f, "String"),
            ValueType::Integer => write!(f, "Integer"),
            ValueType::Float => write!(f, "Float"),
            ValueType::Double => write!(f, "Double"),
            ValueType::Boolean => write!(f, "Boolean"),
            ValueType::Date => write!(f, "Date"),
            ValueType::Enum(e) => write!(f, "{}", e.name),
            ValueType::Reference(name) => write!(f, "{}", name),
            ValueType::Collection(item) => write!(f, "Collection<{}>", item),
        }
    }
}
