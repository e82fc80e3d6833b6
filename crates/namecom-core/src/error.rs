//! Error types for the namecom provider
//!
//! This module defines all error types used throughout the workspace. The
//! lifecycle layer produces the `Remote`, `IdentifierFormat`,
//! `MissingPrecondition` and `FieldAssignment` kinds; the API client produces
//! the transport-level kinds which the lifecycle layer then wraps in `Remote`.

use thiserror::Error;

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the namecom provider
#[derive(Error, Debug)]
pub enum Error {
    /// A call to the name.com API failed
    #[error("Error {operation}: {source}")]
    Remote {
        /// Outbound operation name (e.g. "CreateRecord")
        operation: &'static str,
        /// Underlying client error
        #[source]
        source: Box<Error>,
    },

    /// Malformed import identifier or non-numeric record id
    #[error("Identifier format error: {0}")]
    IdentifierFormat(String),

    /// A required state field was absent before calling the API
    #[error("Missing precondition: {0}")]
    MissingPrecondition(String),

    /// A mapped value could not be written back into resource state
    #[error("Error setting {field}: {message}")]
    FieldAssignment {
        /// Resource attribute name
        field: &'static str,
        /// Error message
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Remote entity not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Wrap a client error with the name of the outbound operation
    pub fn remote(operation: &'static str, source: Error) -> Self {
        Self::Remote {
            operation,
            source: Box::new(source),
        }
    }

    /// Create an identifier format error
    pub fn identifier_format(msg: impl Into<String>) -> Self {
        Self::IdentifierFormat(msg.into())
    }

    /// Create a missing precondition error
    pub fn missing_precondition(msg: impl Into<String>) -> Self {
        Self::MissingPrecondition(msg.into())
    }

    /// Create a field assignment error
    pub fn field_assignment(field: &'static str, message: impl Into<String>) -> Self {
        Self::FieldAssignment {
            field,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether this error (or the client error it wraps) is a not-found
    ///
    /// Read paths use this to drop a vanished resource from state instead of
    /// failing the refresh.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Remote { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// The outbound operation name, if this is a remote call failure
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Remote { operation, .. } => Some(operation),
            _ => None,
        }
    }
}
