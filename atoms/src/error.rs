use thiserror::Error;

/// Errors surfaced by the atom services.
///
/// Handlers turn these into JSON error bodies via [`crate::respond::error`],
/// so each variant maps onto exactly one HTTP status.
#[derive(Debug, Error)]
pub enum TodoError {
    /// A required field was missing or blank.
    #[error("{0}")]
    Validation(String),

    /// The referenced record does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The requested lifecycle transition is not legal from the current state.
    #[error("{0}")]
    Conflict(String),

    /// DynamoDB rejected or failed a request.
    #[error("DynamoDB {operation} error: {message}")]
    Storage {
        operation: &'static str,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TodoError {
    pub fn storage(operation: &'static str, err: impl std::fmt::Display) -> Self {
        TodoError::Storage {
            operation,
            message: err.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        TodoError::Validation(message.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        TodoError::NotFound(what.into())
    }
}
