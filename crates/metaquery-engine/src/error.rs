use metaquery_parser::QueryParserError;
use metaquery_planner::PlanError;
use metaquery_schema::SchemaError;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Parse(#[from] QueryParserError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("in-memory query on '{0}' requires preloaded objects")]
    MissingObjects(String),

    #[error("restriction '{0}' has no store path, the query was not planned")]
    Unplanned(String),

    #[error("store query on '{type_name}' failed")]
    Store {
        type_name: String,
        #[source]
        source: StoreError,
    },
}

/// Errors raised by [`MemoryStore`](crate::MemoryStore)
#[derive(Debug, Error)]
pub enum MemoryStoreError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("property path '{0}' is not persisted")]
    NotPersisted(String),

    #[error("unknown join alias '{0}'")]
    UnknownAlias(String),
}

pub type Result<T> = std::result::Result<T, QueryError>;
