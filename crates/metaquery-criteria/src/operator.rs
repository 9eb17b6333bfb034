//! Operators: typed predicates with an in-memory test and a store lowering
//!
//! Each operator holds its comparison value(s) and implements [`Operator`]
//! twice over: `test` evaluates it against a value read from a live object,
//! `to_store_predicate` expresses the same condition in the store's native
//! predicate model. Engines never switch on operator names.

use std::cmp::Ordering;
use std::fmt;

use metaquery_schema::Value;
use serde::{Deserialize, Serialize};

use crate::{OperatorError, StorePath, StorePredicate};

/// A typed predicate over a single property value
pub trait Operator: fmt::Debug + Send + Sync {
    /// Filter token this operator is written as (`eq`, `!like`, `ilike$`, ...)
    fn name(&self) -> &'static str;

    /// Comparison arguments, in filter order
    fn args(&self) -> Vec<Value>;

    /// Evaluate against a value read from an object
    fn test(&self, value: &Value) -> bool;

    /// Express this operator on `path` in the store's predicate model
    fn to_store_predicate(&self, path: StorePath) -> StorePredicate;

    /// Whether a collection value is tested as a whole rather than per element
    fn accepts_collection(&self) -> bool {
        false
    }
}

/// Where a `like` pattern must occur in the value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    Exact,
    Start,
    End,
    Anywhere,
}

impl MatchMode {
    pub fn matches(self, haystack: &str, needle: &str) -> bool {
        match self {
            MatchMode::Exact => haystack == needle,
            MatchMode::Start => haystack.starts_with(needle),
            MatchMode::End => haystack.ends_with(needle),
            MatchMode::Anywhere => haystack.contains(needle),
        }
    }
}

fn compares(value: &Value, arg: &Value, accept: &[Ordering]) -> bool {
    value
        .compare(arg)
        .map(|ord| accept.contains(&ord))
        .unwrap_or(false)
}

// === Equality ===

#[derive(Debug, Clone)]
pub struct Equal(pub Value);

impl Operator for Equal {
    fn name(&self) -> &'static str {
        "eq"
    }

    fn args(&self) -> Vec<Value> {
        vec![self.0.clone()]
    }

    fn test(&self, value: &Value) -> bool {
        *value == self.0
    }

    fn to_store_predicate(&self, path: StorePath) -> StorePredicate {
        StorePredicate::Eq(path, self.0.clone())
    }
}

/// Inequality; a missing value counts as not equal
#[derive(Debug, Clone)]
pub struct NotEqual(pub Value);

impl Operator for NotEqual {
    fn name(&self) -> &'static str {
        "ne"
    }

    fn args(&self) -> Vec<Value> {
        vec![self.0.clone()]
    }

    fn test(&self, value: &Value) -> bool {
        *value != self.0
    }

    fn to_store_predicate(&self, path: StorePath) -> StorePredicate {
        StorePredicate::Ne(path, self.0.clone())
    }
}

// === Comparison ===

#[derive(Debug, Clone)]
pub struct GreaterThan(pub Value);

impl Operator for GreaterThan {
    fn name(&self) -> &'static str {
        "gt"
    }

    fn args(&self) -> Vec<Value> {
        vec![self.0.clone()]
    }

    fn test(&self, value: &Value) -> bool {
        compares(value, &self.0, &[Ordering::Greater])
    }

    fn to_store_predicate(&self, path: StorePath) -> StorePredicate {
        StorePredicate::Gt(path, self.0.clone())
    }
}

#[derive(Debug, Clone)]
pub struct LessThan(pub Value);

impl Operator for LessThan {
    fn name(&self) -> &'static str {
        "lt"
    }

    fn args(&self) -> Vec<Value> {
        vec![self.0.clone()]
    }

    fn test(&self, value: &Value) -> bool {
        compares(value, &self.0, &[Ordering::Less])
    }

    fn to_store_predicate(&self, path: StorePath) -> StorePredicate {
        StorePredicate::Lt(path, self.0.clone())
    }
}

#[derive(Debug, Clone)]
pub struct GreaterEqual(pub Value);

impl Operator for GreaterEqual {
    fn name(&self) -> &'static str {
        "ge"
    }

    fn args(&self) -> Vec<Value> {
        vec![self.0.clone()]
    }

    fn test(&self, value: &Value) -> bool {
        compares(value, &self.0, &[Ordering::Greater, Ordering::Equal])
    }

    fn to_store_predicate(&self, path: StorePath) -> StorePredicate {
        StorePredicate::Ge(path, self.0.clone())
    }
}

#[derive(Debug, Clone)]
pub struct LessEqual(pub Value);

impl Operator for LessEqual {
    fn name(&self) -> &'static str {
        "le"
    }

    fn args(&self) -> Vec<Value> {
        vec![self.0.clone()]
    }

    fn test(&self, value: &Value) -> bool {
        compares(value, &self.0, &[Ordering::Less, Ordering::Equal])
    }

    fn to_store_predicate(&self, path: StorePath) -> StorePredicate {
        StorePredicate::Le(path, self.0.clone())
    }
}

/// Inclusive range
#[derive(Debug, Clone)]
pub struct Between {
    pub low: Value,
    pub high: Value,
}

impl Operator for Between {
    fn name(&self) -> &'static str {
        "between"
    }

    fn args(&self) -> Vec<Value> {
        vec![self.low.clone(), self.high.clone()]
    }

    fn test(&self, value: &Value) -> bool {
        compares(value, &self.low, &[Ordering::Greater, Ordering::Equal])
            && compares(value, &self.high, &[Ordering::Less, Ordering::Equal])
    }

    fn to_store_predicate(&self, path: StorePath) -> StorePredicate {
        StorePredicate::Between(path, self.low.clone(), self.high.clone())
    }
}

// === Pattern matching ===

/// Substring/prefix/suffix/exact match, optionally case-insensitive or negated
///
/// A null value matches neither `like` nor `!like`.
#[derive(Debug, Clone)]
pub struct Like {
    pub pattern: String,
    pub mode: MatchMode,
    pub case_insensitive: bool,
    pub negated: bool,
}

impl Like {
    pub fn like(pattern: impl Into<String>, mode: MatchMode) -> Self {
        Self {
            pattern: pattern.into(),
            mode,
            case_insensitive: false,
            negated: false,
        }
    }

    pub fn ilike(pattern: impl Into<String>, mode: MatchMode) -> Self {
        Self {
            case_insensitive: true,
            ..Self::like(pattern, mode)
        }
    }

    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }
}

impl Operator for Like {
    fn name(&self) -> &'static str {
        match (self.mode, self.case_insensitive, self.negated) {
            (MatchMode::Anywhere, false, false) => "like",
            (MatchMode::Anywhere, false, true) => "!like",
            (MatchMode::Anywhere, true, false) => "ilike",
            (MatchMode::Anywhere, true, true) => "!ilike",
            (MatchMode::Start, false, false) => "$like",
            (MatchMode::Start, false, true) => "!$like",
            (MatchMode::Start, true, false) => "$ilike",
            (MatchMode::Start, true, true) => "!$ilike",
            (MatchMode::End, false, false) => "like$",
            (MatchMode::End, false, true) => "!like$",
            (MatchMode::End, true, false) => "ilike$",
            (MatchMode::End, true, true) => "!ilike$",
            (MatchMode::Exact, false, false) => "eq",
            (MatchMode::Exact, false, true) => "ne",
            (MatchMode::Exact, true, false) => "ieq",
            (MatchMode::Exact, true, true) => "!ieq",
        }
    }

    fn args(&self) -> Vec<Value> {
        vec![Value::String(self.pattern.clone())]
    }

    fn test(&self, value: &Value) -> bool {
        let Some(text) = value.to_text() else {
            return false;
        };
        let matched = if self.case_insensitive {
            self.mode
                .matches(&text.to_lowercase(), &self.pattern.to_lowercase())
        } else {
            self.mode.matches(&text, &self.pattern)
        };
        matched != self.negated
    }

    fn to_store_predicate(&self, path: StorePath) -> StorePredicate {
        StorePredicate::Like {
            path,
            pattern: self.pattern.clone(),
            mode: self.mode,
            case_insensitive: self.case_insensitive,
            negated: self.negated,
        }
    }
}

/// Word-prefix search used for name lookups
///
/// Every whitespace-separated token of the query must be a case-insensitive
/// prefix of some word in the value: `"clin ba"` matches `"Bahati Clinic"`.
#[derive(Debug, Clone)]
pub struct Token {
    pub value: String,
    pub negated: bool,
}

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            negated: false,
        }
    }

    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    pub fn tokens(&self) -> Vec<String> {
        self.value.split_whitespace().map(str::to_lowercase).collect()
    }
}

/// Whether every token prefixes some word of `text`, ignoring case
pub fn token_match(text: &str, tokens: &[String]) -> bool {
    let words: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
    tokens
        .iter()
        .all(|token| words.iter().any(|word| word.starts_with(token.as_str())))
}

impl Operator for Token {
    fn name(&self) -> &'static str {
        if self.negated {
            "!token"
        } else {
            "token"
        }
    }

    fn args(&self) -> Vec<Value> {
        vec![Value::String(self.value.clone())]
    }

    fn test(&self, value: &Value) -> bool {
        let Some(text) = value.to_text() else {
            return false;
        };
        token_match(&text, &self.tokens()) != self.negated
    }

    fn to_store_predicate(&self, path: StorePath) -> StorePredicate {
        StorePredicate::Tokens {
            path,
            tokens: self.tokens(),
            negated: self.negated,
        }
    }
}

// === Membership ===

/// Set membership; never constructed over an empty set
#[derive(Debug, Clone)]
pub struct In {
    values: Vec<Value>,
    negated: bool,
}

impl In {
    pub fn new(values: Vec<Value>) -> Result<Self, OperatorError> {
        if values.is_empty() {
            return Err(OperatorError::EmptyCollection("in"));
        }
        Ok(Self {
            values,
            negated: false,
        })
    }

    pub fn not_in(values: Vec<Value>) -> Result<Self, OperatorError> {
        if values.is_empty() {
            return Err(OperatorError::EmptyCollection("!in"));
        }
        Ok(Self {
            values,
            negated: true,
        })
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }
}

impl Operator for In {
    fn name(&self) -> &'static str {
        if self.negated {
            "!in"
        } else {
            "in"
        }
    }

    fn args(&self) -> Vec<Value> {
        vec![Value::Collection(self.values.clone())]
    }

    fn test(&self, value: &Value) -> bool {
        self.values.contains(value) != self.negated
    }

    fn to_store_predicate(&self, path: StorePath) -> StorePredicate {
        StorePredicate::In {
            path,
            values: self.values.clone(),
            negated: self.negated,
        }
    }
}

// === Nullity and emptiness ===

#[derive(Debug, Clone, Copy)]
pub struct Null;

impl Operator for Null {
    fn name(&self) -> &'static str {
        "null"
    }

    fn args(&self) -> Vec<Value> {
        Vec::new()
    }

    fn test(&self, value: &Value) -> bool {
        value.is_null()
    }

    fn to_store_predicate(&self, path: StorePath) -> StorePredicate {
        StorePredicate::IsNull(path)
    }

    fn accepts_collection(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NotNull;

impl Operator for NotNull {
    fn name(&self) -> &'static str {
        "!null"
    }

    fn args(&self) -> Vec<Value> {
        Vec::new()
    }

    fn test(&self, value: &Value) -> bool {
        !value.is_null()
    }

    fn to_store_predicate(&self, path: StorePath) -> StorePredicate {
        StorePredicate::IsNotNull(path)
    }

    fn accepts_collection(&self) -> bool {
        true
    }
}

/// An empty collection or string; null counts as empty
#[derive(Debug, Clone, Copy)]
pub struct Empty;

pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Collection(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

impl Operator for Empty {
    fn name(&self) -> &'static str {
        "empty"
    }

    fn args(&self) -> Vec<Value> {
        Vec::new()
    }

    fn test(&self, value: &Value) -> bool {
        is_empty_value(value)
    }

    fn to_store_predicate(&self, path: StorePath) -> StorePredicate {
        StorePredicate::IsEmpty(path)
    }

    fn accepts_collection(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NotEmpty;

impl Operator for NotEmpty {
    fn name(&self) -> &'static str {
        "!empty"
    }

    fn args(&self) -> Vec<Value> {
        Vec::new()
    }

    fn test(&self, value: &Value) -> bool {
        !is_empty_value(value)
    }

    fn to_store_predicate(&self, path: StorePath) -> StorePredicate {
        StorePredicate::IsNotEmpty(path)
    }

    fn accepts_collection(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metaquery_schema::Timestamp;

    #[test]
    fn test_equal_and_not_equal() {
        assert!(Equal(Value::from("Foo")).test(&Value::from("Foo")));
        assert!(!Equal(Value::from("Foo")).test(&Value::from("foo")));
        assert!(NotEqual(Value::from("Foo")).test(&Value::from("Bar")));
        assert!(NotEqual(Value::from("Foo")).test(&Value::Null));
    }

    #[test]
    fn test_comparisons_on_dates() {
        let y2003 = Value::Date(Timestamp::parse("2003").unwrap());
        let y2004 = Value::Date(Timestamp::parse("2004").unwrap());
        assert!(GreaterThan(y2003.clone()).test(&y2004));
        assert!(!GreaterThan(y2003.clone()).test(&y2003));
        assert!(GreaterEqual(y2003.clone()).test(&y2003));
        assert!(LessThan(y2004.clone()).test(&y2003));
        assert!(LessEqual(y2004.clone()).test(&y2004));
    }

    #[test]
    fn test_comparison_with_null_fails() {
        assert!(!GreaterThan(Value::Integer(1)).test(&Value::Null));
        assert!(!LessThan(Value::Integer(1)).test(&Value::Null));
    }

    #[test]
    fn test_between_is_inclusive() {
        let op = Between {
            low: Value::Integer(3),
            high: Value::Integer(5),
        };
        assert!(op.test(&Value::Integer(3)));
        assert!(op.test(&Value::Integer(5)));
        assert!(!op.test(&Value::Integer(6)));
    }

    #[test]
    fn test_like_modes() {
        let name = Value::from("Bahati Clinic");
        assert!(Like::like("Clinic", MatchMode::Anywhere).test(&name));
        assert!(!Like::like("clinic", MatchMode::Anywhere).test(&name));
        assert!(Like::ilike("clinic", MatchMode::Anywhere).test(&name));
        assert!(Like::like("Bahati", MatchMode::Start).test(&name));
        assert!(Like::ilike("CLINIC", MatchMode::End).test(&name));
        assert!(Like::ilike("bahati clinic", MatchMode::Exact).test(&name));
        assert!(!Like::ilike("bahati clinicc", MatchMode::Exact).test(&name));
    }

    #[test]
    fn test_negated_like_rejects_null() {
        let op = Like::like("x", MatchMode::Anywhere).negate();
        assert!(op.test(&Value::from("abc")));
        assert!(!op.test(&Value::from("xyz")));
        assert!(!op.test(&Value::Null));
    }

    #[test]
    fn test_like_names() {
        assert_eq!(Like::like("a", MatchMode::Start).name(), "$like");
        assert_eq!(Like::ilike("a", MatchMode::End).negate().name(), "!ilike$");
        assert_eq!(Like::ilike("a", MatchMode::Exact).name(), "ieq");
    }

    #[test]
    fn test_token_prefix_match() {
        let op = Token::new("clin ba");
        assert!(op.test(&Value::from("Bahati Clinic")));
        assert!(!op.test(&Value::from("Clinic Kigoma")));
        assert!(Token::new("kig").negate().test(&Value::from("Bahati Clinic")));
    }

    #[test]
    fn test_in_rejects_empty() {
        assert_eq!(In::new(vec![]).unwrap_err(), OperatorError::EmptyCollection("in"));
        assert_eq!(In::not_in(vec![]).unwrap_err(), OperatorError::EmptyCollection("!in"));
    }

    #[test]
    fn test_in_membership() {
        let op = In::new(vec![Value::from("a"), Value::from("b")]).unwrap();
        assert!(op.test(&Value::from("a")));
        assert!(!op.test(&Value::from("c")));
        let op = In::not_in(vec![Value::from("a")]).unwrap();
        assert!(op.test(&Value::from("c")));
        assert!(!op.test(&Value::from("a")));
    }

    #[test]
    fn test_null_and_empty() {
        assert!(Null.test(&Value::Null));
        assert!(NotNull.test(&Value::Collection(vec![])));
        assert!(Empty.test(&Value::Collection(vec![])));
        assert!(Empty.test(&Value::Null));
        assert!(NotEmpty.test(&Value::from(vec![1i64])));
        assert!(Empty.accepts_collection());
        assert!(!Equal(Value::Null).accepts_collection());
    }

    #[test]
    fn test_store_lowering() {
        let path = StorePath::root("name");
        assert_eq!(
            Like::ilike("clinic", MatchMode::Anywhere).to_store_predicate(path.clone()),
            StorePredicate::Like {
                path: path.clone(),
                pattern: "clinic".into(),
                mode: MatchMode::Anywhere,
                case_insensitive: true,
                negated: false,
            }
        );
        assert_eq!(Null.to_store_predicate(path.clone()), StorePredicate::IsNull(path));
    }
}
