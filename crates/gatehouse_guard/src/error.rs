//! Guard error types.

use gatehouse_core::{ContextField, CoreError};

/// Guard result type
pub type GuardResult<T> = Result<T, GuardError>;

/// Errors raised while building or evaluating guards
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    /// A guard reads a field its route never populates
    #[error("Guard {guard} reads {field}, which is not provided here")]
    Configuration {
        /// Guard name
        guard: String,
        /// Field the guard needs
        field: ContextField,
    },

    /// Session or subscription source failed
    #[error("Upstream failure in {provider}: {message}")]
    Upstream {
        /// Failing provider
        provider: String,
        /// Provider message
        message: String,
    },

    /// Declarative guard spec rejected
    #[error("Invalid guard spec: {reason}")]
    InvalidSpec {
        /// Why it was rejected
        reason: String,
    },
}

impl GuardError {
    /// Shorthand for an upstream failure
    #[must_use]
    pub fn upstream(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upstream {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

impl From<CoreError> for GuardError {
    fn from(err: CoreError) -> Self {
        Self::InvalidSpec {
            reason: err.to_string(),
        }
    }
}
