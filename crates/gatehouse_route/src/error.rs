//! Route table errors.

use gatehouse_core::CoreError;
use gatehouse_guard::GuardError;

/// Route result type
pub type RouteResult<T> = Result<T, RouteError>;

/// Errors raised while building a route table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// Path pattern could not be parsed
    #[error("Invalid route pattern {pattern}: {reason}")]
    InvalidPattern {
        /// Offending pattern
        pattern: String,
        /// Why it was rejected
        reason: String,
    },

    /// Two routes share a pattern
    #[error("Duplicate route: {pattern}")]
    DuplicateRoute {
        /// Repeated pattern
        pattern: String,
    },

    /// A route's guards could not be built or do not fit its flow
    #[error("Route {route}: {source}")]
    Guard {
        /// Route pattern
        route: String,
        /// Underlying guard error
        #[source]
        source: GuardError,
    },

    /// Malformed route table document
    #[error(transparent)]
    Core(#[from] CoreError),
}
