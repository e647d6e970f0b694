use thiserror::Error;

/// Core error types for Stafflane operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid entity kind: {0}")]
    InvalidEntityKind(String),

    #[error("Invalid record ID: {0}")]
    InvalidId(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Time parsing error: {0}")]
    TimeError(#[from] time::error::Parse),

    #[error("UUID error: {0}")]
    UuidError(#[from] uuid::Error),

    #[error("Record not found: {kind}/{id}")]
    RecordNotFound { kind: String, id: String },

    #[error("Record conflict: {kind}/{id} already exists")]
    RecordConflict { kind: String, id: String },

    #[error("Invalid record data: {message}")]
    InvalidRecord { message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl CoreError {
    /// Create a new InvalidEntityKind error
    pub fn invalid_entity_kind(kind: impl Into<String>) -> Self {
        Self::InvalidEntityKind(kind.into())
    }

    /// Create a new InvalidId error
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId(id.into())
    }

    /// Create a new RecordNotFound error
    pub fn record_not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::RecordNotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Create a new RecordConflict error
    pub fn record_conflict(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::RecordConflict {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Create a new InvalidRecord error
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            message: message.into(),
        }
    }

    /// Create a new Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a new Store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Check if this error is a client error (4xx category)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidEntityKind(_)
                | Self::InvalidId(_)
                | Self::InvalidTimestamp(_)
                | Self::InvalidRecord { .. }
                | Self::RecordNotFound { .. }
                | Self::RecordConflict { .. }
                | Self::JsonError(_)
        )
    }

    /// Check if this error is a server error (5xx category)
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidEntityKind(_)
            | Self::InvalidId(_)
            | Self::InvalidTimestamp(_)
            | Self::InvalidRecord { .. } => ErrorCategory::Validation,
            Self::RecordNotFound { .. } => ErrorCategory::NotFound,
            Self::RecordConflict { .. } => ErrorCategory::Conflict,
            Self::JsonError(_) => ErrorCategory::Serialization,
            Self::TimeError(_) | Self::UuidError(_) => ErrorCategory::System,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Store(_) => ErrorCategory::Store,
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Conflict,
    Serialization,
    System,
    Configuration,
    Store,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::Serialization => write!(f, "serialization"),
            Self::System => write!(f, "system"),
            Self::Configuration => write!(f, "configuration"),
            Self::Store => write!(f, "store"),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
