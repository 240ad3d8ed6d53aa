//! Route table documents.

use crate::config::RouterConfig;
use crate::error::RouteResult;
use gatehouse_core::{CoreError, FieldSet};
use gatehouse_guard::GuardSpec;
use serde::{Deserialize, Serialize};

/// One route as written in a route table document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSpec {
    /// Path pattern
    pub path: String,
    /// Display name for menus
    #[serde(default)]
    pub name: Option<String>,
    /// Guard chain, all of which must pass
    #[serde(default)]
    pub guards: Vec<GuardSpec>,
    /// Context fields this route's flow populates, on top of the table default
    #[serde(default)]
    pub provides: FieldSet,
}

impl RouteSpec {
    /// Create an unguarded route
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            guards: Vec::new(),
            provides: FieldSet::new(),
        }
    }

    /// Set display name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append a guard
    #[must_use]
    pub fn with_guard(mut self, guard: GuardSpec) -> Self {
        self.guards.push(guard);
        self
    }

    /// Set provided fields
    #[must_use]
    pub fn with_provides(mut self, provides: FieldSet) -> Self {
        self.provides = provides;
        self
    }
}

/// A whole route table document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTableSpec {
    /// Redirect destinations
    #[serde(default)]
    pub config: RouterConfig,
    /// Fields every route provides
    #[serde(default)]
    pub default_provides: FieldSet,
    /// Routes in declaration order
    #[serde(default)]
    pub routes: Vec<RouteSpec>,
}

impl RouteTableSpec {
    /// Parse a route table from JSON
    ///
    /// # Errors
    ///
    /// Returns error if the document is malformed
    pub fn from_json(json: &str) -> RouteResult<Self> {
        Ok(serde_json::from_str(json).map_err(CoreError::from)?)
    }
}
