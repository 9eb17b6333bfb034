//! metaquery-engine: running queries
//!
//! Two engines share one query model:
//!
//! - [`StoreQueryEngine`] lowers a planned query to a [`StoreQuery`] and hands
//!   it to a [`Store`] adapter.
//! - [`InMemoryQueryEngine`] evaluates a query over preloaded objects through
//!   their property accessors.
//!
//! [`QueryService`] ties them together with the parser and planner: the store
//! answers what it can, the in-memory engine finishes the rest, and the
//! defaults filter runs last. [`MemoryStore`] is a reference store for tests
//! and embedding.

mod config;
mod defaults;
mod error;
mod memory;
mod memory_store;
mod request;
mod service;
mod sort;
mod store;
mod store_engine;
mod text;

pub use config::EngineConfig;
pub use defaults::{apply_defaults, filters_defaults, DEFAULT_NAME};
pub use error::{MemoryStoreError, QueryError, Result};
pub use memory::{test_restriction, InMemoryQueryEngine};
pub use memory_store::MemoryStore;
pub use request::QueryRequest;
pub use service::QueryService;
pub use sort::{compare_keys, sort_objects};
pub use store::{Store, StoreError, StoreOrder, StoreQuery};
pub use store_engine::{translate, StoreQueryEngine};
pub use text::expand_text_query;
