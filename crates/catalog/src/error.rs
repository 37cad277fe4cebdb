use thiserror::Error;

/// Errors that can occur while talking to the movie catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Required credential is absent from the environment
    #[error("Missing catalog credential: set {var}")]
    MissingCredential {
        /// Name of the environment variable that was expected
        var: String,
    },

    /// The configured base URL (or a path joined onto it) did not parse
    #[error("Invalid catalog URL: {0}")]
    BaseUrl(#[from] url::ParseError),

    /// The request never produced a usable response (connection, timeout, ...)
    #[error("Catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The catalog answered with a non-success status code
    #[error("Catalog returned status {status} from {endpoint}")]
    Upstream {
        /// Endpoint path that was queried
        endpoint: String,
        /// HTTP status code of the response
        status: u16,
    },

    /// The response body did not match the expected shape
    #[error("Could not decode catalog response from {endpoint}: {reason}")]
    Decode {
        /// Endpoint path that was queried
        endpoint: String,
        /// Underlying deserialization failure
        reason: String,
    },
}

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
