//! Router configuration.

use serde::{Deserialize, Serialize};

/// Where the router sends users it will not render a route for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Destination for signed-out users
    pub login_route: String,
    /// Destination for signed-in users who fail a guard
    pub unauthorized_route: String,
    /// Destination when a guard could not be evaluated
    pub error_route: String,
}

impl RouterConfig {
    /// Create the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self {
            login_route: "/login".to_string(),
            unauthorized_route: "/not_found".to_string(),
            error_route: "/error".to_string(),
        }
    }

    /// Set login route
    #[must_use]
    pub fn with_login_route(mut self, route: impl Into<String>) -> Self {
        self.login_route = route.into();
        self
    }

    /// Set unauthorized route
    #[must_use]
    pub fn with_unauthorized_route(mut self, route: impl Into<String>) -> Self {
        self.unauthorized_route = route.into();
        self
    }

    /// Set error route
    #[must_use]
    pub fn with_error_route(mut self, route: impl Into<String>) -> Self {
        self.error_route = route.into();
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}
