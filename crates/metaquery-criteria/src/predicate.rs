//! Native predicate model handed to store adapters

use std::fmt;

use metaquery_schema::Value;

use crate::MatchMode;

/// Addresses a property inside a store query: an optional join alias plus the
/// property name on the aliased (or root) type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorePath {
    alias: Option<String>,
    property: String,
}

impl StorePath {
    /// A property of the root type
    pub fn root(property: impl Into<String>) -> Self {
        Self {
            alias: None,
            property: property.into(),
        }
    }

    /// A property reached through a join alias
    pub fn aliased(alias: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            property: property.into(),
        }
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn property(&self) -> &str {
        &self.property
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{}.{}", alias, self.property),
            None => write!(f, "{}", self.property),
        }
    }
}

/// A predicate in the store's own vocabulary
#[derive(Debug, Clone, PartialEq)]
pub enum StorePredicate {
    And(Vec<StorePredicate>),
    Or(Vec<StorePredicate>),

    Eq(StorePath, Value),
    Ne(StorePath, Value),
    Gt(StorePath, Value),
    Lt(StorePath, Value),
    Ge(StorePath, Value),
    Le(StorePath, Value),
    Between(StorePath, Value, Value),

    Like {
        path: StorePath,
        pattern: String,
        mode: MatchMode,
        case_insensitive: bool,
        negated: bool,
    },
    /// Every token must prefix some word of the value, ignoring case
    Tokens {
        path: StorePath,
        tokens: Vec<String>,
        negated: bool,
    },
    In {
        path: StorePath,
        values: Vec<Value>,
        negated: bool,
    },

    IsNull(StorePath),
    IsNotNull(StorePath),
    IsEmpty(StorePath),
    IsNotEmpty(StorePath),
}

impl StorePredicate {
    /// Number of leaf predicates in this tree
    pub fn leaf_count(&self) -> usize {
        match self {
            StorePredicate::And(children) | StorePredicate::Or(children) => {
                children.iter().map(StorePredicate::leaf_count).sum()
            }
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_path_display() {
        assert_eq!(StorePath::root("name").to_string(), "name");
        assert_eq!(StorePath::aliased("parent_parent", "id").to_string(), "parent_parent.id");
    }

    #[test]
    fn test_leaf_count() {
        let predicate = StorePredicate::And(vec![
            StorePredicate::IsNull(StorePath::root("code")),
            StorePredicate::Or(vec![
                StorePredicate::Eq(StorePath::root("id"), Value::from("a")),
                StorePredicate::Eq(StorePath::root("id"), Value::from("b")),
            ]),
            StorePredicate::Or(vec![]),
        ]);
        assert_eq!(predicate.leaf_count(), 3);
    }
}
