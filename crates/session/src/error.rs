use thiserror::Error;

/// Errors that can occur while driving a swipe session
#[derive(Error, Debug)]
pub enum SessionError {
    /// The catalog could not produce a candidate
    #[error("Catalog lookup failed: {0}")]
    Catalog(#[from] catalog::CatalogError),

    /// App state could not be persisted
    #[error("State persistence failed: {0}")]
    Store(#[from] store::StoreError),

    /// Both the filtered fetch and the relaxed retry came back empty
    #[error("No movies matched the filter, even after relaxing it")]
    ExhaustedResults,
}

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
