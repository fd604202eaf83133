//! # Error Types
//!
//! This module defines error types used throughout the labelgate library.
//!
//! Only the API boundary, configuration, and console selection checks can
//! fail. Reading persisted state never produces an error past [`crate::store`];
//! corrupt entries are replaced by their fallback there.

use thiserror::Error;

/// Main error type for labelgate operations
#[derive(Debug, Error)]
pub enum LabelgateError {
    /// The gateway answered with a non-success status
    #[error("{message}")]
    Api {
        /// HTTP status code returned by the gateway
        status: u16,
        /// Response body, or a generic message when the body was empty
        message: String,
    },

    /// Connection-level errors (DNS, TLS, refused connection)
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response or payload could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Invalid startup configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// An operation needed a template or printer that is not selected
    #[error("{0}")]
    Selection(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LabelgateError {
    /// Build an API error from a status code and response body.
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let message = if body.trim().is_empty() {
            format!("Request failed: {}", status)
        } else {
            body
        };
        Self::Api { status, message }
    }
}
