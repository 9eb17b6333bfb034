//! metaquery: schema-driven dynamic queries over domain objects
//!
//! ```text
//! "level:eq:2", "name:like:Clinic"      metaquery-parser
//!                 │
//!                 ▼
//!        Query (criteria tree)           metaquery-criteria
//!                 │
//!                 ▼
//!     persisted │ non-persisted          metaquery-planner
//!          │             │
//!          ▼             ▼
//!   Store adapter   in-memory engine     metaquery-engine
//! ```
//!
//! Types describe themselves through [`schema`]; nothing reflects over Rust
//! types at runtime.

pub use metaquery_criteria as criteria;
pub use metaquery_engine as engine;
pub use metaquery_parser as parser;
pub use metaquery_planner as planner;
pub use metaquery_schema as schema;

pub use metaquery_criteria::{Criterion, Defaults, JunctionType, Order, Pagination, Query, Restriction};
pub use metaquery_engine::{EngineConfig, MemoryStore, QueryError, QueryRequest, QueryService, Store};
pub use metaquery_parser::QueryParser;
pub use metaquery_planner::QueryPlanner;
pub use metaquery_schema::{Object, Property, Schema, SchemaProvider, SchemaRegistry, Value, ValueType};
