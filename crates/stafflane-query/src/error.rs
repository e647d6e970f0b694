use stafflane_core::CoreError;
use thiserror::Error;

/// Errors surfaced by the list-query engine.
///
/// Validation errors short-circuit before any store access; store errors
/// carry the operation that failed and keep the underlying cause out of
/// client-facing messages.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Invalid {param} parameter: {message}")]
    InvalidPagination {
        param: &'static str,
        message: String,
    },

    #[error("Invalid boolean parameter {param}: expected \"true\" or \"false\"")]
    InvalidBoolean { param: String },

    #[error("Search term exceeds {max} characters")]
    SearchTermTooLong { max: usize },

    #[error("Search term is empty after sanitization")]
    SearchTermEmpty,

    #[error("Filter value for {param} exceeds {max} characters")]
    FilterValueTooLong { param: String, max: usize },

    #[error("Too many count relations: {requested} (maximum {max})")]
    TooManyCountRelations { requested: usize, max: usize },

    #[error("Too many include relations: {requested} (maximum {max})")]
    TooManyIncludeRelations { requested: usize, max: usize },

    #[error("Custom predicate error: {0}")]
    PredicateHook(String),

    #[error("Database error during {operation}")]
    Store {
        operation: &'static str,
        #[source]
        source: CoreError,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl QueryError {
    pub fn invalid_pagination(param: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidPagination {
            param,
            message: message.into(),
        }
    }

    pub fn invalid_boolean(param: impl Into<String>) -> Self {
        Self::InvalidBoolean {
            param: param.into(),
        }
    }

    /// Stable machine-readable code for the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidPagination { .. } => "INVALID_PAGINATION",
            Self::InvalidBoolean { .. } => "INVALID_BOOLEAN_PARAM",
            Self::SearchTermTooLong { .. } => "SEARCH_TERM_TOO_LONG",
            Self::SearchTermEmpty => "SEARCH_TERM_EMPTY",
            Self::FilterValueTooLong { .. } => "FILTER_VALUE_TOO_LONG",
            Self::TooManyCountRelations { .. } => "TOO_MANY_COUNT_RELATIONS",
            Self::TooManyIncludeRelations { .. } => "TOO_MANY_INCLUDE_RELATIONS",
            Self::PredicateHook(_) => "CUSTOM_PREDICATE_ERROR",
            Self::Store { .. } => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether this error belongs to the 400 class. Configuration guards
    /// (relation limits) fail closed as client errors too.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Store { .. } | Self::Internal(_))
    }
}
