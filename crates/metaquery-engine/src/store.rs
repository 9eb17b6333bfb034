//! The store adapter seam

use metaquery_criteria::{Alias, Direction, StorePath, StorePredicate};
use metaquery_schema::Object;

/// Errors raised by a store are passed through untouched
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOrder {
    pub path: StorePath,
    pub direction: Direction,
    pub ignore_case: bool,
}

/// A fully lowered query in the store's vocabulary
#[derive(Debug, Clone, PartialEq)]
pub struct StoreQuery {
    pub type_name: String,
    /// Root `And`/`Or` over the top-level criteria; an empty `And` selects all
    pub predicate: StorePredicate,
    pub aliases: Vec<Alias>,
    pub orders: Vec<StoreOrder>,
    pub offset: usize,
    pub limit: Option<usize>,
    /// Actor the query runs on behalf of, for stores that apply sharing rules
    pub user: Option<String>,
}

impl StoreQuery {
    /// Select every object of a type
    pub fn all(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            predicate: StorePredicate::And(Vec::new()),
            aliases: Vec::new(),
            orders: Vec::new(),
            offset: 0,
            limit: None,
            user: None,
        }
    }

    /// The same selection without ordering or a window, for counting
    pub fn for_count(&self) -> StoreQuery {
        StoreQuery {
            orders: Vec::new(),
            offset: 0,
            limit: None,
            ..self.clone()
        }
    }
}

/// A backing store that can run [`StoreQuery`]s
///
/// Results must be distinct objects; joins through collection aliases must
/// not duplicate the root object.
pub trait Store: Send + Sync {
    fn fetch(&self, query: &StoreQuery) -> Result<Vec<Object>, StoreError>;

    fn count(&self, query: &StoreQuery) -> Result<usize, StoreError>;
}
