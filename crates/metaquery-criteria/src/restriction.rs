//! Restrictions: one operator applied to one property path

use std::fmt;
use std::sync::Arc;

use metaquery_schema::Value;

use crate::{
    Between, Empty, Equal, GreaterEqual, GreaterThan, In, LessEqual, LessThan, Like, MatchMode,
    NotEmpty, NotEqual, NotNull, Null, Operator, OperatorError, StorePath, StorePredicate, Token,
};

/// A leaf criterion: `path` tested by `operator`
///
/// The store path is filled in by the planner once the restriction is known to
/// be persisted; restrictions evaluated in memory never carry one.
#[derive(Debug, Clone)]
pub struct Restriction {
    path: String,
    operator: Arc<dyn Operator>,
    store_path: Option<StorePath>,
}

impl Restriction {
    pub fn new(path: impl Into<String>, operator: impl Operator + 'static) -> Self {
        Self {
            path: path.into(),
            operator: Arc::new(operator),
            store_path: None,
        }
    }

    /// A copy of this restriction bound to a location in the store
    pub fn with_store_path(&self, store_path: StorePath) -> Restriction {
        Restriction {
            path: self.path.clone(),
            operator: Arc::clone(&self.operator),
            store_path: Some(store_path),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn operator(&self) -> &dyn Operator {
        self.operator.as_ref()
    }

    pub fn store_path(&self) -> Option<&StorePath> {
        self.store_path.as_ref()
    }

    pub fn test(&self, value: &Value) -> bool {
        self.operator.test(value)
    }

    /// Lower to the store's predicate model, if bound to a store path
    pub fn to_store_predicate(&self) -> Option<StorePredicate> {
        self.store_path
            .clone()
            .map(|path| self.operator.to_store_predicate(path))
    }

    // === Constructors ===

    pub fn eq(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(path, Equal(value.into()))
    }

    pub fn ne(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(path, NotEqual(value.into()))
    }

    pub fn gt(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(path, GreaterThan(value.into()))
    }

    pub fn lt(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(path, LessThan(value.into()))
    }

    pub fn ge(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(path, GreaterEqual(value.into()))
    }

    pub fn le(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(path, LessEqual(value.into()))
    }

    pub fn between(path: impl Into<String>, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        Self::new(
            path,
            Between {
                low: low.into(),
                high: high.into(),
            },
        )
    }

    pub fn like(path: impl Into<String>, pattern: impl Into<String>, mode: MatchMode) -> Self {
        Self::new(path, Like::like(pattern, mode))
    }

    pub fn not_like(path: impl Into<String>, pattern: impl Into<String>, mode: MatchMode) -> Self {
        Self::new(path, Like::like(pattern, mode).negate())
    }

    pub fn ilike(path: impl Into<String>, pattern: impl Into<String>, mode: MatchMode) -> Self {
        Self::new(path, Like::ilike(pattern, mode))
    }

    pub fn not_ilike(path: impl Into<String>, pattern: impl Into<String>, mode: MatchMode) -> Self {
        Self::new(path, Like::ilike(pattern, mode).negate())
    }

    pub fn token(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(path, Token::new(value))
    }

    pub fn not_token(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(path, Token::new(value).negate())
    }

    pub fn is_in(path: impl Into<String>, values: Vec<Value>) -> Result<Self, OperatorError> {
        Ok(Self::new(path, In::new(values)?))
    }

    pub fn not_in(path: impl Into<String>, values: Vec<Value>) -> Result<Self, OperatorError> {
        Ok(Self::new(path, In::not_in(values)?))
    }

    pub fn is_null(path: impl Into<String>) -> Self {
        Self::new(path, Null)
    }

    pub fn is_not_null(path: impl Into<String>) -> Self {
        Self::new(path, NotNull)
    }

    pub fn is_empty(path: impl Into<String>) -> Self {
        Self::new(path, Empty)
    }

    pub fn is_not_empty(path: impl Into<String>) -> Self {
        Self::new(path, NotEmpty)
    }
}

impl fmt::Display for Restriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.operator.name())?;
        let args = self.operator.args();
        if !args.is_empty() {
            let rendered: Vec<String> = args.iter().map(Value::to_string).collect();
            write!(f, ":{}", rendered.join(","))?;
        }
        Ok(())
    }
}
