use metaquery_schema::SchemaError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("unknown path '{path}' on type '{type_name}'")]
    UnknownPath { path: String, type_name: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

pub type Result<T> = std::result::Result<T, PlanError>;
