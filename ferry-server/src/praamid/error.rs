//! Praamid gateway error types.

use std::fmt;

/// Errors from the praamid.ee HTTP gateway.
#[derive(Debug)]
pub enum PraamidError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// Upstream returned a non-2xx status code; the body is relayed
    /// verbatim to the caller
    Api { status: u16, body: String },

    /// Upstream rejected the forwarded credentials
    Unauthorized,
}

impl fmt::Display for PraamidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PraamidError::Http(e) => write!(f, "HTTP error: {e}"),
            PraamidError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            PraamidError::Api { status, body } => {
                write!(f, "upstream error {status}: {body}")
            }
            PraamidError::Unauthorized => {
                write!(f, "authorization failed (token may be invalid or expired)")
            }
        }
    }
}

impl std::error::Error for PraamidError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PraamidError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for PraamidError {
    fn from(err: reqwest::Error) -> Self {
        PraamidError::Http(err)
    }
}
