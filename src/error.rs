//! Wayfinder error types
//!
//! Resolution itself never surfaces these: probes, rankings and cache reads
//! degrade to an unhealthy result, a miss or the fallback host. Errors are
//! returned from construction, configuration, directory fetches and the
//! persistent stores, where the caller decides what to do with them.

/// Wayfinder error types
#[derive(Debug, thiserror::Error)]
pub enum WayfinderError {
    // Network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store error: {0}")]
    Store(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("no gateway directory configured")]
    NoDirectory,
}

impl From<reqwest::Error> for WayfinderError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => WayfinderError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => WayfinderError::Http(err.to_string()),
        }
    }
}

/// Result type alias for Wayfinder operations
pub type Result<T> = std::result::Result<T, WayfinderError>;
