//! Error handling for xclean

use thiserror::Error;

/// Main error type for xclean operations
#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("Authentication failed (HTTP {status}): {detail}")]
    AuthenticationFailed { status: u16, detail: String },

    #[error("Rate limited by the API{}", retry_hint(.retry_after))]
    RateLimited { retry_after: Option<u64> },

    #[error("API request failed with HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Unexpected API response: {0}")]
    UnexpectedResponse(String),

    #[error("Browser cookie error: {0}")]
    BrowserCookie(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

fn retry_hint(retry_after: &Option<u64>) -> String {
    match retry_after {
        Some(seconds) => format!(" (retry in {}s)", seconds),
        None => String::new(),
    }
}

/// Result type alias for xclean operations
pub type Result<T> = std::result::Result<T, CleanerError>;
