//! Error types for the catalog client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because detail screens distinguish
//! "the entity does not exist" from "the request failed." Transport failures
//! and non-2xx statuses other than 404 both land in `Network`, with the status
//! attached when the server answered at all.

use thiserror::Error;

/// Errors returned by the catalog client, stores and configuration loader.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport failure (`status` is `None`) or a non-2xx status other than 404.
    #[error("network error{}: {message}", status_suffix(.status))]
    Network { status: Option<u16>, message: String },

    /// The server returned 404 for the requested entity or page.
    #[error("resource not found")]
    NotFound,

    /// The response body is not well-formed for the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// The key-value store failed to read or write.
    #[error("storage error: {0}")]
    Storage(String),

    /// The configuration file could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),
}

/// Coarse error category, stable across the FFI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    NotFound,
    Parse,
    Storage,
    Config,
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Network { .. } => ErrorKind::Network,
            CatalogError::NotFound => ErrorKind::NotFound,
            CatalogError::Parse(_) => ErrorKind::Parse,
            CatalogError::Storage(_) => ErrorKind::Storage,
            CatalogError::Config(_) => ErrorKind::Config,
        }
    }

    /// HTTP status carried by the error, if the server responded.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            CatalogError::Network { status, .. } => *status,
            CatalogError::NotFound => Some(404),
            _ => None,
        }
    }

    pub(crate) fn transport(message: impl Into<String>) -> Self {
        CatalogError::Network {
            status: None,
            message: message.into(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Parse(e.to_string())
    }
}
