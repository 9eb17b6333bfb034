//! The query model and its builder operations

use std::collections::BTreeSet;
use std::sync::Arc;

use metaquery_schema::{Object, Schema};
use serde::{Deserialize, Serialize};

use crate::{Criterion, Junction, JunctionType, Order};

/// Whether objects named `"default"` survive post-processing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Defaults {
    Include,
    #[default]
    Exclude,
}

/// A result window
///
/// `max_results: None` means unpaged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub first_result: usize,
    pub max_results: Option<usize>,
}

impl Pagination {
    pub fn new(first_result: usize, max_results: usize) -> Self {
        Self {
            first_result,
            max_results: Some(max_results),
        }
    }

    pub fn unpaged() -> Self {
        Self::default()
    }

    /// 1-based page number to a window; page 0 is treated as page 1
    ///
    /// An offset past `usize::MAX` saturates, which selects an empty page.
    pub fn from_page(page: usize, page_size: usize) -> Self {
        Self::new(page.saturating_sub(1).saturating_mul(page_size), page_size)
    }

    pub fn is_paged(&self) -> bool {
        self.first_result > 0 || self.max_results.is_some()
    }

    /// Cut the window out of `items`, clamped to their length
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let start = self.first_result.min(items.len());
        let end = match self.max_results {
            Some(max) => start.saturating_add(max).min(items.len()),
            None => items.len(),
        };
        items.into_iter().skip(start).take(end - start).collect()
    }
}

/// A join alias for a nested path prefix: `parent.parent` is `parent_parent`
///
/// Underscores in the path are doubled first, so `a_b` (`a__b`) and `a.b`
/// (`a_b`) never share a name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Alias {
    path: String,
    name: String,
}

impl Alias {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = path.replace('_', "__").replace('.', "_");
        Self { path, name }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A query over one schema-described type
#[derive(Debug, Clone)]
pub struct Query {
    schema: Arc<Schema>,
    root_junction: JunctionType,
    criteria: Vec<Criterion>,
    orders: Vec<Order>,
    pagination: Pagination,
    aliases: BTreeSet<Alias>,
    objects: Option<Vec<Object>>,
    user: Option<String>,
    defaults: Defaults,
}

impl Query {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self::with_junction(schema, JunctionType::And)
    }

    pub fn with_junction(schema: Arc<Schema>, root_junction: JunctionType) -> Self {
        Self {
            schema,
            root_junction,
            criteria: Vec::new(),
            orders: Vec::new(),
            pagination: Pagination::unpaged(),
            aliases: BTreeSet::new(),
            objects: None,
            user: None,
            defaults: Defaults::default(),
        }
    }

    /// An empty query sharing this one's schema, root junction, user and
    /// defaults mode
    pub fn derive(&self) -> Query {
        let mut query = Query::with_junction(Arc::clone(&self.schema), self.root_junction);
        query.user = self.user.clone();
        query.defaults = self.defaults;
        query
    }

    // === Accessors ===

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn root_junction(&self) -> JunctionType {
        self.root_junction
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn aliases(&self) -> &BTreeSet<Alias> {
        &self.aliases
    }

    pub fn objects(&self) -> Option<&[Object]> {
        self.objects.as_deref()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn defaults(&self) -> Defaults {
        self.defaults
    }

    /// No criteria and no orders
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty() && self.orders.is_empty()
    }

    // === Builder ===

    pub fn add(&mut self, criterion: impl Into<Criterion>) -> &mut Self {
        self.criteria.push(criterion.into());
        self
    }

    /// Append an empty AND junction and return it for population
    pub fn add_conjunction(&mut self) -> &mut Junction {
        self.push_junction(JunctionType::And)
    }

    /// Append an empty OR junction and return it for population
    pub fn add_disjunction(&mut self) -> &mut Junction {
        self.push_junction(JunctionType::Or)
    }

    fn push_junction(&mut self, kind: JunctionType) -> &mut Junction {
        self.criteria.push(Criterion::junction(kind, Junction::new()));
        match self.criteria.last_mut() {
            Some(Criterion::Conjunction(j)) | Some(Criterion::Disjunction(j)) => j,
            _ => unreachable!("a junction was just pushed"),
        }
    }

    /// Replace every top-level criterion
    pub fn set_criteria(&mut self, criteria: Vec<Criterion>) -> &mut Self {
        self.criteria = criteria;
        self
    }

    pub fn set_root_junction(&mut self, root_junction: JunctionType) -> &mut Self {
        self.root_junction = root_junction;
        self
    }

    pub fn add_order(&mut self, order: Order) -> &mut Self {
        self.orders.push(order);
        self
    }

    pub fn add_orders(&mut self, orders: impl IntoIterator<Item = Order>) -> &mut Self {
        self.orders.extend(orders);
        self
    }

    pub fn clear_orders(&mut self) -> &mut Self {
        self.orders.clear();
        self
    }

    /// Order by `name` then `id`, for whichever exist, when no order is set
    pub fn set_default_order(&mut self) -> &mut Self {
        if !self.orders.is_empty() {
            return self;
        }
        for name in ["name", "id"] {
            if let Some(property) = self.schema.property(name) {
                self.orders.push(Order::asc(Arc::clone(property)));
            }
        }
        self
    }

    pub fn set_pagination(&mut self, pagination: Pagination) -> &mut Self {
        self.pagination = pagination;
        self
    }

    /// Register a join alias for a nested path prefix
    pub fn add_alias(&mut self, path: impl Into<String>) -> &mut Self {
        self.aliases.insert(Alias::new(path));
        self
    }

    pub fn add_aliases<'a>(&mut self, aliases: impl IntoIterator<Item = &'a Alias>) -> &mut Self {
        self.aliases.extend(aliases.into_iter().cloned());
        self
    }

    /// Run against these objects instead of the store
    pub fn set_objects(&mut self, objects: Vec<Object>) -> &mut Self {
        self.objects = Some(objects);
        self
    }

    pub fn take_objects(&mut self) -> Option<Vec<Object>> {
        self.objects.take()
    }

    pub fn set_user(&mut self, user: impl Into<String>) -> &mut Self {
        self.user = Some(user.into());
        self
    }

    pub fn set_defaults(&mut self, defaults: Defaults) -> &mut Self {
        self.defaults = defaults;
        self
    }
}
