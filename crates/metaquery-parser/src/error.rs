use metaquery_criteria::OperatorError;
use metaquery_schema::SchemaError;
use thiserror::Error;

/// Which part of a `path:operator[:value]` filter an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterPart {
    Whole,
    Path,
    Operator,
    Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryParserError {
    #[error("invalid filter '{0}': expected 'path:operator[:value]'")]
    MalformedFilter(String),

    #[error("unknown path '{path}' on type '{type_name}'")]
    UnknownPath { path: String, type_name: String },

    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("operator '{0}' requires a value")]
    MissingValue(String),

    #[error("unable to convert value '{value}' to {target}")]
    Conversion { value: String, target: String },

    #[error("'{value}' is not a valid {enum_name}, legal values are: {legal}")]
    InvalidEnum {
        value: String,
        enum_name: String,
        legal: String,
    },

    #[error("invalid order '{0}': expected 'property[:asc|desc|iasc|idesc]'")]
    InvalidOrder(String),

    #[error(transparent)]
    Operator(#[from] OperatorError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl QueryParserError {
    /// The filter segment this error points at
    pub fn part(&self) -> FilterPart {
        match self {
            QueryParserError::UnknownPath { .. } | QueryParserError::Schema(_) => FilterPart::Path,
            QueryParserError::UnknownOperator(_) | QueryParserError::MissingValue(_) => {
                FilterPart::Operator
            }
            QueryParserError::Conversion { .. }
            | QueryParserError::InvalidEnum { .. }
            | QueryParserError::Operator(_) => FilterPart::Value,
            QueryParserError::MalformedFilter(_) | QueryParserError::InvalidOrder(_) => {
                FilterPart::Whole
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, QueryParserError>;
