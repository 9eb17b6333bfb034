//! Translates planned queries into store queries
//!
//! The translation is one-to-one:
//!
//! ```text
//! Conjunction ──▶ StorePredicate::And
//! Disjunction ──▶ StorePredicate::Or
//! Restriction ──▶ operator.to_store_predicate(store_path)
//! Order       ──▶ StoreOrder
//! Pagination  ──▶ offset / limit
//! ```

use std::sync::Arc;

use metaquery_criteria::{Criterion, JunctionType, Query, StorePath, StorePredicate};
use metaquery_schema::Object;
use tracing::debug;

use crate::error::{QueryError, Result};
use crate::store::{Store, StoreOrder, StoreQuery};

pub struct StoreQueryEngine {
    store: Arc<dyn Store>,
}

impl StoreQueryEngine {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn query(&self, query: &Query) -> Result<Vec<Object>> {
        let store_query = translate(query)?;
        debug!(
            type_name = %store_query.type_name,
            leaves = store_query.predicate.leaf_count(),
            aliases = store_query.aliases.len(),
            orders = store_query.orders.len(),
            offset = store_query.offset,
            limit = ?store_query.limit,
            "store fetch"
        );
        self.store
            .fetch(&store_query)
            .map_err(|source| QueryError::Store {
                type_name: store_query.type_name.clone(),
                source,
            })
    }

    /// Number of matching objects; ordering and pagination are ignored
    pub fn count(&self, query: &Query) -> Result<usize> {
        let store_query = translate(query)?.for_count();
        debug!(type_name = %store_query.type_name, "store count");
        self.store
            .count(&store_query)
            .map_err(|source| QueryError::Store {
                type_name: store_query.type_name.clone(),
                source,
            })
    }
}

/// Lower a planned query
pub fn translate(query: &Query) -> Result<StoreQuery> {
    let children = query
        .criteria()
        .iter()
        .map(translate_criterion)
        .collect::<Result<Vec<_>>>()?;
    // No criteria selects everything, whatever the root junction
    let predicate = match query.root_junction() {
        _ if children.is_empty() => StorePredicate::And(children),
        JunctionType::And => StorePredicate::And(children),
        JunctionType::Or => StorePredicate::Or(children),
    };

    let orders = query
        .orders()
        .iter()
        .map(|order| StoreOrder {
            path: StorePath::root(order.property().name()),
            direction: order.direction(),
            ignore_case: order.is_ignore_case(),
        })
        .collect();

    let pagination = query.pagination();
    Ok(StoreQuery {
        type_name: query.schema().name().to_string(),
        predicate,
        aliases: query.aliases().iter().cloned().collect(),
        orders,
        offset: pagination.first_result,
        limit: pagination.max_results,
        user: query.user().map(str::to_string),
    })
}

fn translate_criterion(criterion: &Criterion) -> Result<StorePredicate> {
    match criterion {
        Criterion::Restriction(r) => r
            .to_store_predicate()
            .ok_or_else(|| QueryError::Unplanned(r.to_string())),
        Criterion::Conjunction(j) => Ok(StorePredicate::And(
            j.criteria()
                .iter()
                .map(translate_criterion)
                .collect::<Result<_>>()?,
        )),
        Criterion::Disjunction(j) => Ok(StorePredicate::Or(
            j.criteria()
                .iter()
                .map(translate_criterion)
                .collect::<Result<_>>()?,
        )),
    }
}
