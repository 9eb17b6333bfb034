use thiserror::Error;

/// Errors raised while resolving schema metadata
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("no schema registered for type '{0}'")]
    UnknownType(String),

    #[error("unknown property '{property}' on type '{type_name}'")]
    UnknownProperty { type_name: String, property: String },

    #[error("invalid path '{path}': '{segment}' is a simple property and must be the last segment")]
    SimpleSegment { path: String, segment: String },

    #[error("invalid path '{path}': '{segment}' is a collection of {item_type} and cannot be traversed")]
    NotTraversable {
        path: String,
        segment: String,
        item_type: String,
    },

    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),
}
