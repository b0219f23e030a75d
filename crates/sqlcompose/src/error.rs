//! Error types for sqlcompose

use thiserror::Error;

/// Boxed error returned by [`Valuer`](crate::Valuer) implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for sqlcompose operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Errors raised while compiling an expression tree or statement.
///
/// The first error aborts the whole compile; any SQL text or arguments
/// produced before it must be discarded.
#[derive(Debug, Error)]
pub enum SqlError {
    /// A required clause is missing (CASE without WHEN, empty IN list,
    /// statement without table, ...).
    #[error("{0}")]
    Structural(String),

    /// A predicate of an unsupported kind reached a part.
    #[error("{0}")]
    Type(String),

    /// A value is not usable with the requested operator.
    #[error("{0}")]
    Semantic(String),

    /// Error produced by a value's own unwrap capability, passed through as-is.
    #[error(transparent)]
    Valuer(BoxError),
}

impl SqlError {
    /// Create a structural error
    pub fn structural(message: impl Into<String>) -> Self {
        Self::Structural(message.into())
    }

    /// Create a type error
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::Type(message.into())
    }

    /// Create a semantic error
    pub fn semantic(message: impl Into<String>) -> Self {
        Self::Semantic(message.into())
    }

    /// Check if this is a structural error
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Structural(_))
    }

    /// Check if this is a type error
    pub fn is_type_error(&self) -> bool {
        matches!(self, Self::Type(_))
    }

    /// Check if this is a semantic error
    pub fn is_semantic(&self) -> bool {
        matches!(self, Self::Semantic(_))
    }

    /// Check if this error came from a [`Valuer`](crate::Valuer)
    pub fn is_valuer(&self) -> bool {
        matches!(self, Self::Valuer(_))
    }
}
