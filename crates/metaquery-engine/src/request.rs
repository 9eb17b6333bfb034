//! Request-shaped query input

use metaquery_criteria::{Defaults, JunctionType};
use serde::{Deserialize, Serialize};

/// Query parameters as a client sends them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryRequest {
    /// `path:operator[:value]` filters
    pub filters: Vec<String>,
    /// `property[:asc|desc|iasc|idesc]` orders
    pub orders: Vec<String>,
    pub root_junction: JunctionType,
    /// `false` returns every match
    pub paging: bool,
    /// 1-based page number
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub defaults: Option<Defaults>,
    pub user: Option<String>,
}

impl Default for QueryRequest {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            orders: Vec::new(),
            root_junction: JunctionType::And,
            paging: true,
            page: None,
            page_size: None,
            defaults: None,
            user: None,
        }
    }
}

impl QueryRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filters.push(filter.into());
        self
    }

    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.orders.push(order.into());
        self
    }

    pub fn root_junction(mut self, root_junction: JunctionType) -> Self {
        self.root_junction = root_junction;
        self
    }

    pub fn page(mut self, page: usize, page_size: usize) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }

    pub fn unpaged(mut self) -> Self {
        self.paging = false;
        self
    }

    pub fn defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = Some(defaults);
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }
}
