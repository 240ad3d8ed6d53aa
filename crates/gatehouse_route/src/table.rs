//! Guarded route table.
//!
//! Routes are validated when the table is built: every guard must only read
//! fields the route's flow provides. A route that fails this check is a
//! configuration bug and the table refuses to build.

use crate::config::RouterConfig;
use crate::error::{RouteError, RouteResult};
use crate::matcher::{PathParams, PathPattern};
use crate::outcome::RouteOutcome;
use crate::spec::RouteTableSpec;
use futures::future::join_all;
use gatehouse_core::FieldSet;
use gatehouse_guard::{
    evaluate, evaluate_traced, Decision, EvalContext, GuardChain, GuardCompiler, GuardError,
    GuardResult,
};
use tracing::{info, warn};

/// A path pattern with its guard chain
pub struct Route {
    pattern: PathPattern,
    name: Option<String>,
    guards: GuardChain,
    provides: FieldSet,
}

impl Route {
    /// Create a route, checking its guards against the fields it provides
    ///
    /// # Errors
    ///
    /// Returns `RouteError::Guard` wrapping `GuardError::Configuration` if a
    /// guard reads a field the route does not provide
    pub fn new(pattern: PathPattern, guards: GuardChain, provides: FieldSet) -> RouteResult<Self> {
        for guard in &guards {
            if let Some(field) = guard.reads().missing_from(&provides).first() {
                return Err(RouteError::Guard {
                    route: pattern.to_string(),
                    source: GuardError::Configuration {
                        guard: guard.name(),
                        field: *field,
                    },
                });
            }
        }

        Ok(Self {
            pattern,
            name: None,
            guards,
            provides,
        })
    }

    /// Set display name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Path pattern
    #[must_use]
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// Display name, falling back to the pattern
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.pattern.as_str())
    }

    /// Guard chain
    #[must_use]
    pub fn guards(&self) -> &GuardChain {
        &self.guards
    }

    /// Fields the route provides
    #[must_use]
    pub fn provides(&self) -> &FieldSet {
        &self.provides
    }

    /// Evaluate this route's chain
    ///
    /// # Errors
    ///
    /// Returns the first guard error
    pub async fn allows(&self, ctx: &EvalContext<'_>) -> GuardResult<bool> {
        evaluate(&self.guards, ctx).await
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern.as_str())
            .field("name", &self.name)
            .field(
                "guards",
                &self.guards.iter().map(|g| g.name()).collect::<Vec<_>>(),
            )
            .field("provides", &self.provides)
            .finish()
    }
}

/// Ordered set of guarded routes
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
    config: RouterConfig,
}

impl RouteTable {
    /// Create an empty table
    #[must_use]
    pub fn new(config: RouterConfig) -> Self {
        Self {
            routes: Vec::new(),
            config,
        }
    }

    /// Build a table from a document using the default compiler
    ///
    /// # Errors
    ///
    /// Returns error if a pattern is invalid or repeated, or a route's guards
    /// do not fit its flow
    pub fn build(spec: &RouteTableSpec) -> RouteResult<Self> {
        Self::build_with(spec, &GuardCompiler::new())
    }

    /// Build a table from a document
    ///
    /// # Errors
    ///
    /// Returns error if a pattern is invalid or repeated, or a route's guards
    /// do not compile or do not fit its flow
    pub fn build_with(spec: &RouteTableSpec, compiler: &GuardCompiler) -> RouteResult<Self> {
        let mut table = Self::new(spec.config.clone());

        for route_spec in &spec.routes {
            let pattern = PathPattern::parse(&route_spec.path)?;
            let guards = compiler
                .compile_chain(&route_spec.guards)
                .map_err(|source| RouteError::Guard {
                    route: route_spec.path.clone(),
                    source,
                })?;
            let provides = spec.default_provides.union(&route_spec.provides);

            let mut route = Route::new(pattern, guards, provides)?;
            if let Some(name) = &route_spec.name {
                route = route.with_name(name.clone());
            }
            table.add(route)?;
        }

        Ok(table)
    }

    /// Add a route
    ///
    /// # Errors
    ///
    /// Returns error if a route with the same pattern exists
    pub fn add(&mut self, route: Route) -> RouteResult<()> {
        if self
            .routes
            .iter()
            .any(|r| r.pattern.as_str() == route.pattern.as_str())
        {
            return Err(RouteError::DuplicateRoute {
                pattern: route.pattern.to_string(),
            });
        }
        self.routes.push(route);
        Ok(())
    }

    /// Most specific route matching `path`; earlier routes win ties
    #[must_use]
    pub fn find(&self, path: &str) -> Option<(&Route, PathParams)> {
        let mut best: Option<(&Route, PathParams)> = None;
        for route in &self.routes {
            if let Some(params) = route.pattern.matches(path) {
                let better = best
                    .as_ref()
                    .is_none_or(|(b, _)| route.pattern.specificity() > b.pattern.specificity());
                if better {
                    best = Some((route, params));
                }
            }
        }
        best
    }

    /// Decide what the router does for `path`
    pub async fn authorize(&self, path: &str, ctx: &EvalContext<'_>) -> RouteOutcome {
        let Some((route, params)) = self.find(path) else {
            info!(path, "no route matched");
            return RouteOutcome::NotFound {
                path: path.to_string(),
            };
        };
        let route_name = route.pattern.to_string();

        let outcome = match evaluate_traced(&route.guards, ctx).await {
            Ok(decision) if decision.allowed => RouteOutcome::Render {
                route: route_name,
                params,
            },
            Ok(decision) => {
                let to = if ctx.auth.is_authenticated() {
                    self.config.unauthorized_route.clone()
                } else {
                    self.config.login_route.clone()
                };
                RouteOutcome::Redirect {
                    route: route_name,
                    to,
                    denied_by: decision.deciding_guard().map(str::to_string),
                }
            }
            Err(err) => {
                warn!(path, error = %err, "route guards failed");
                RouteOutcome::Error {
                    route: route_name,
                    to: self.config.error_route.clone(),
                    message: err.to_string(),
                }
            }
        };

        info!(path, outcome = ?outcome, "route authorized");
        outcome
    }

    /// Trace the guard decision for `path`, if a route matches
    pub async fn explain(
        &self,
        path: &str,
        ctx: &EvalContext<'_>,
    ) -> Option<(&Route, GuardResult<Decision>)> {
        let (route, _) = self.find(path)?;
        Some((route, evaluate_traced(&route.guards, ctx).await))
    }

    /// Routes the session may enter, for navigation menus
    ///
    /// Chains are evaluated concurrently, each in order. A route whose
    /// guards fail to evaluate is hidden.
    pub async fn visible_routes(&self, ctx: &EvalContext<'_>) -> Vec<&Route> {
        let checks = self.routes.iter().map(|route| async move {
            let result = route.allows(ctx).await;
            (route, result)
        });

        join_all(checks)
            .await
            .into_iter()
            .filter_map(|(route, result)| match result {
                Ok(true) => Some(route),
                Ok(false) => None,
                Err(err) => {
                    warn!(route = %route.pattern, error = %err, "hiding route");
                    None
                }
            })
            .collect()
    }

    /// Router configuration
    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Routes in declaration order
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Get the number of routes
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Check if empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
