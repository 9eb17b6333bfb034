use thiserror::Error;

/// Errors raised while constructing operators
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperatorError {
    /// `in` / `!in` over nothing would silently match no rows or every row
    #[error("operator '{0}' requires a non-empty collection")]
    EmptyCollection(&'static str),

    #[error("operator '{operator}' expects {expected}, got {actual}")]
    InvalidArgument {
        operator: &'static str,
        expected: &'static str,
        actual: String,
    },
}
