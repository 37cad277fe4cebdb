use thiserror::Error;

/// Errors that can occur while persisting app state
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem failure while reading or writing the backing file
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be serialized for storage
    #[error("Could not encode {what}: {source}")]
    Encode {
        /// What was being encoded, e.g. `value for key shortlist`
        what: String,
        /// Underlying serialization failure
        source: serde_json::Error,
    },
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
