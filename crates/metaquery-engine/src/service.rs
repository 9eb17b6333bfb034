//! Query dispatch
//!
//! ```text
//! QueryRequest ──parse──▶ Query ──expand $query──┐
//!                                                ▼
//!                       objects preloaded? ──yes──▶ InMemoryQueryEngine
//!                                │ no
//!                                ▼
//!                          QueryPlanner
//!                        ┌──────┴───────┐
//!                   persisted      non-persisted
//!                        │              │
//!                StoreQueryEngine ──▶ InMemoryQueryEngine (over store results)
//!                                       │
//!                                 defaults filter
//! ```

use std::sync::Arc;

use metaquery_criteria::{Pagination, Query};
use metaquery_parser::{parse_orders, QueryParser};
use metaquery_planner::QueryPlanner;
use metaquery_schema::{Object, SchemaProvider};
use tracing::debug;

use crate::config::EngineConfig;
use crate::defaults::{apply_defaults, filters_defaults};
use crate::error::Result;
use crate::memory::InMemoryQueryEngine;
use crate::request::QueryRequest;
use crate::store::Store;
use crate::store_engine::StoreQueryEngine;
use crate::text::expand_text_query;

pub struct QueryService {
    parser: QueryParser,
    planner: QueryPlanner,
    store_engine: StoreQueryEngine,
    memory_engine: InMemoryQueryEngine,
    config: EngineConfig,
}

impl QueryService {
    pub fn new(provider: Arc<dyn SchemaProvider>, store: Arc<dyn Store>) -> Self {
        Self::with_config(provider, store, EngineConfig::default())
    }

    pub fn with_config(
        provider: Arc<dyn SchemaProvider>,
        store: Arc<dyn Store>,
        config: EngineConfig,
    ) -> Self {
        Self {
            parser: QueryParser::new(Arc::clone(&provider)),
            planner: QueryPlanner::new(Arc::clone(&provider)),
            store_engine: StoreQueryEngine::new(store),
            memory_engine: InMemoryQueryEngine::new(provider),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn parser(&self) -> &QueryParser {
        &self.parser
    }

    /// Run a query to completion
    pub fn query(&self, mut query: Query) -> Result<Vec<Object>> {
        expand_text_query(&mut query);
        let schema = Arc::clone(query.schema());
        let defaults = query.defaults();

        let objects = if query.objects().is_some() {
            debug!(type_name = schema.name(), "preloaded objects, in-memory only");
            self.memory_engine.query(&query)?
        } else {
            let (persisted, mut residual) = self.planner.plan(query)?.into_parts();
            let fetched = self.store_engine.query(&persisted)?;
            if residual.is_empty() {
                fetched
            } else {
                debug!(
                    type_name = schema.name(),
                    fetched = fetched.len(),
                    "evaluating residual in memory"
                );
                residual.set_objects(fetched);
                self.memory_engine.query(&residual)?
            }
        };

        Ok(apply_defaults(&schema, defaults, objects))
    }

    /// Number of objects the query matches, ignoring pagination
    pub fn count(&self, mut query: Query) -> Result<usize> {
        expand_text_query(&mut query);
        let schema = Arc::clone(query.schema());

        if query.objects().is_none() && !filters_defaults(&schema, query.defaults()) {
            let (persisted, residual) = self.planner.plan(query.clone())?.into_parts();
            if residual.criteria().is_empty() {
                return self.store_engine.count(&persisted);
            }
        }

        query.clear_orders().set_pagination(Pagination::unpaged());
        Ok(self.query(query)?.len())
    }

    /// Build the query a request describes
    pub fn build_query(&self, type_name: &str, request: &QueryRequest) -> Result<Query> {
        let mut query = self
            .parser
            .parse(type_name, &request.filters, request.root_junction)?;

        let orders = parse_orders(query.schema(), &request.orders)?;
        query.add_orders(orders);
        if query.orders().is_empty() && self.config.default_order {
            query.set_default_order();
        }

        if request.paging {
            let page_size = self.config.page_size(request.page_size);
            let page = request.page.unwrap_or(1).max(1);
            query.set_pagination(Pagination::from_page(page, page_size));
        }

        query.set_defaults(request.defaults.unwrap_or(self.config.defaults));
        if let Some(user) = &request.user {
            query.set_user(user.as_str());
        }
        Ok(query)
    }

    pub fn query_from_request(&self, type_name: &str, request: &QueryRequest) -> Result<Vec<Object>> {
        self.query(self.build_query(type_name, request)?)
    }

    pub fn count_from_request(&self, type_name: &str, request: &QueryRequest) -> Result<usize> {
        self.count(self.build_query(type_name, request)?)
    }
}
