//! Error taxonomy for patch stack resolution.
//!
//! Every failure surfaces to the caller of the stack builder. The only
//! condition that degrades instead of failing is a missing or unreachable
//! base revision, which is reported through [`crate::domain::BaseFallback`].

use thiserror::Error;

/// Errors raised while talking to Conduit or driving the working copy.
#[derive(Debug, Error)]
pub enum StackError {
    /// The request never produced a usable HTTP response.
    #[error("Transport failure calling {method}: {message}")]
    Transport { method: String, message: String },

    /// The endpoint answered with a non-success HTTP status.
    #[error("HTTP {status} calling {method}")]
    HttpStatus { method: String, status: u16 },

    /// The endpoint answered with a structured error envelope.
    #[error("Conduit API error {code}: {}", info.as_deref().unwrap_or("unknown"))]
    Conduit { code: String, info: Option<String> },

    /// The response did not match the expected record shape.
    #[error("Invalid response for {method}: {message}")]
    InvalidResponse { method: String, message: String },

    /// A lookup by identity returned zero or several results where one was required.
    #[error("Revision not found: {0}")]
    RevisionNotFound(String),

    /// The edge graph references a revision that has no diffs attached.
    #[error("Revision {0} is listed as a parent but has no diffs")]
    DiffConsistency(String),

    /// Checking out the working copy failed.
    #[error("Failed to update to revision {revision}")]
    Checkout {
        revision: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Invalid PHID {value:?}, expected a {expected} PHID")]
    InvalidPhid { value: String, expected: &'static str },

    #[error("Unrecognised diff reference {0:?}")]
    InvalidReference(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl StackError {
    pub(crate) fn invalid_response(method: &str, message: impl ToString) -> Self {
        StackError::InvalidResponse {
            method: method.to_string(),
            message: message.to_string(),
        }
    }

    /// Remote error code, when the failure came from a Conduit error envelope.
    pub fn conduit_code(&self) -> Option<&str> {
        match self {
            StackError::Conduit { code, .. } => Some(code),
            _ => None,
        }
    }
}

pub type StackResult<T> = std::result::Result<T, StackError>;
