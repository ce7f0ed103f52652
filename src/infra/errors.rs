// src/infra/errors.rs — Error types for docquery

use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::{Provider, RequestKind};

/// Local precondition failures. Raised before any network call.
///
/// `Display` is the text shown to the user; `code()` is the short tag used in
/// logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please upload a file first.")]
    NoFileSelected,

    #[error("Please upload and process a file first.")]
    FileNotProcessed,

    #[error("Please enter a query.")]
    EmptyQuery,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::NoFileSelected => "no file selected",
            ValidationError::FileNotProcessed => "file not processed",
            ValidationError::EmptyQuery => "empty query",
        }
    }
}

/// Failures reported by a backend gateway call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    // The backend answered with an `error` field
    #[error("Backend error (HTTP {status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Backend returned HTTP {status} without an error message")]
    Status { status: u16 },

    #[error("Unexpected response body: {0}")]
    Malformed(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("{provider} is not connected to a backend.")]
    Unwired { provider: Provider },
}

impl GatewayError {
    /// The error text supplied by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            GatewayError::Backend { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Text stored in the session's `error_message` after a failed request.
    pub fn user_message(&self, kind: RequestKind) -> String {
        if let Some(message) = self.server_message() {
            return message.to_string();
        }
        tracing::debug!("{} failed without a server message: {}", kind, self);
        kind.fallback_message().to_string()
    }
}

/// Errors of the outer shell: reading the document and building the HTTP client.
#[derive(Error, Debug)]
pub enum DocQueryError {
    #[error("Cannot read '{}': {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}
