//! Core error types for GATEHOUSE.

/// Core result type
pub type CoreResult<T> = Result<T, CoreError>;

/// Core error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Permission string is not `<action>_<entity>`
    #[error("Invalid permission: {name}")]
    InvalidPermission {
        /// Offending permission string
        name: String,
    },

    /// Module name not recognised
    #[error("Unknown module: {name}")]
    UnknownModule {
        /// Offending module name
        name: String,
    },

    /// Plan name not recognised
    #[error("Unknown plan: {name}")]
    UnknownPlan {
        /// Offending plan name
        name: String,
    },

    /// Context field name not recognised
    #[error("Unknown context field: {name}")]
    UnknownField {
        /// Offending field name
        name: String,
    },

    /// Malformed session document
    #[error("Parse error: {message}")]
    Parse {
        /// Parser message
        message: String,
    },
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            message: err.to_string(),
        }
    }
}
