//! Error types for repository operations.
//!
//! Storage errors carry structured context (operation, entity, id) so that
//! failures on the write path can be diagnosed without digging through logs.

use std::fmt;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// What went wrong, independent of the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryErrorKind {
    /// Connection/pool failure; typically transient.
    Connection,
    /// Query execution failure.
    Query,
    /// Requested entity absent or not owned by the requester.
    NotFound,
    /// Data failed validation before or after a storage operation.
    Validation,
    /// Configuration or initialization failure.
    Configuration,
    /// Commit/rollback failure mid-write; no partial rows are retained.
    Transaction,
    /// Unexpected internal failure.
    Internal,
}

impl RepositoryErrorKind {
    fn label(&self) -> &'static str {
        match self {
            Self::Connection => "Connection error",
            Self::Query => "Query error",
            Self::NotFound => "Not found",
            Self::Validation => "Data validation error",
            Self::Configuration => "Configuration error",
            Self::Transaction => "Transaction error",
            Self::Internal => "Internal error",
        }
    }
}

/// Structured context for repository errors.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "insert_windows_checked")
    pub operation: Option<String>,
    /// The entity type involved (e.g., "window", "block")
    pub entity: Option<String>,
    /// The entity ID if applicable
    pub entity_id: Option<String>,
    /// Whether this error is retryable
    pub retryable: bool,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref entity) = self.entity {
            parts.push(format!("entity={}", entity));
        }
        if let Some(ref id) = self.entity_id {
            parts.push(format!("id={}", id));
        }
        if self.retryable {
            parts.push("retryable=true".to_string());
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for repository operations.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{}: {message} {context}", kind.label())]
pub struct RepositoryError {
    pub kind: RepositoryErrorKind,
    pub message: String,
    pub context: ErrorContext,
}

impl RepositoryError {
    fn of(kind: RepositoryErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        let mut err = Self::of(RepositoryErrorKind::Connection, message);
        err.context.retryable = true;
        err
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::of(RepositoryErrorKind::Query, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::of(RepositoryErrorKind::NotFound, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::of(RepositoryErrorKind::Validation, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::of(RepositoryErrorKind::Configuration, message)
    }

    pub fn transaction(message: impl Into<String>) -> Self {
        Self::of(RepositoryErrorKind::Transaction, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::of(RepositoryErrorKind::Internal, message)
    }

    /// Attach or replace the structured context.
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = context;
        self
    }

    /// Add or update the operation in the error context.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context.operation = Some(operation.into());
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.context.retryable
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == RepositoryErrorKind::NotFound
    }
}
