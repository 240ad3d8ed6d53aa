//! Routing outcomes.

use crate::matcher::PathParams;
use serde::{Deserialize, Serialize};

/// What the router should do with a navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RouteOutcome {
    /// Render the matched route
    Render {
        /// Matched pattern
        route: String,
        /// Captured path parameters
        params: PathParams,
    },
    /// Guards denied; send the user elsewhere
    Redirect {
        /// Matched pattern
        route: String,
        /// Destination
        to: String,
        /// Guard that denied, if known
        denied_by: Option<String>,
    },
    /// Guards could not be evaluated
    Error {
        /// Matched pattern
        route: String,
        /// Error page destination
        to: String,
        /// Error description
        message: String,
    },
    /// No route matches the path
    NotFound {
        /// Requested path
        path: String,
    },
}

impl RouteOutcome {
    /// Check if the route renders
    #[must_use]
    pub fn is_render(&self) -> bool {
        matches!(self, Self::Render { .. })
    }

    /// Destination of a redirect or error
    #[must_use]
    pub fn destination(&self) -> Option<&str> {
        match self {
            Self::Redirect { to, .. } | Self::Error { to, .. } => Some(to),
            _ => None,
        }
    }
}
