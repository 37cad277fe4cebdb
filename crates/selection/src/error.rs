//! Error types for shortlist and vote operations.

use thiserror::Error;

/// Errors from shortlist and group-vote workflows
#[derive(Error, Debug)]
pub enum SelectionError {
    /// State persistence failed
    #[error("State persistence failed: {0}")]
    Store(#[from] store::StoreError),

    /// Looked up a vote session nobody created
    #[error("No vote session found with id '{id}'")]
    UnknownSession {
        /// Session identifier that failed to resolve
        id: String,
    },

    /// Tried to create a vote session under an id already in use
    #[error("A vote session with id '{id}' already exists")]
    SessionExists {
        /// Session identifier that collided
        id: String,
    },
}

/// Result type alias for selection operations
pub type Result<T> = std::result::Result<T, SelectionError>;
