//! Declarative guard specs.
//!
//! Route tables describe guards as JSON trees tagged by `kind`. The compiler
//! turns a tree into shared guards once, at table build time.

use crate::combinator::{all, not, or};
use crate::error::{GuardError, GuardResult};
use crate::guard::{GuardChain, SharedGuard};
use crate::leaf::{admin, authenticated, company_settings, enabled, owner, permission, plan};
use gatehouse_core::{Module, Permission, PlanTier};
use serde::{Deserialize, Serialize};

/// Default nesting limit for combinators
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// A guard described as data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuardSpec {
    /// Company administrator
    Admin,
    /// Account owner
    Owner,
    /// Company-level settings flow
    CompanySettings,
    /// Anyone signed in
    Authenticated,
    /// Subscription includes a tier
    Plan {
        /// Required tier
        plan: PlanTier,
    },
    /// Company user holds a permission
    Permission {
        /// Required permission
        permission: Permission,
    },
    /// Company has a module on
    Enabled {
        /// Required module
        module: Module,
    },
    /// Any inner guard passes
    Any {
        /// Alternatives, tried in order
        guards: Vec<GuardSpec>,
    },
    /// Every inner guard passes
    All {
        /// Requirements, checked in order
        guards: Vec<GuardSpec>,
    },
    /// Inner guard denies
    Not {
        /// Guard to invert
        guard: Box<GuardSpec>,
    },
}

impl GuardSpec {
    /// Nesting depth; leaves are depth 1
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Any { guards } | Self::All { guards } => {
                1 + guards.iter().map(Self::depth).max().unwrap_or(0)
            }
            Self::Not { guard } => 1 + guard.depth(),
            _ => 1,
        }
    }
}

/// Compiles guard specs into shared guards
#[derive(Debug, Clone)]
pub struct GuardCompiler {
    max_depth: usize,
}

impl GuardCompiler {
    /// Create a compiler with the default depth limit
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the nesting limit
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Compile one spec
    ///
    /// # Errors
    ///
    /// Returns `GuardError::InvalidSpec` if the tree nests too deeply
    pub fn compile(&self, spec: &GuardSpec) -> GuardResult<SharedGuard> {
        let depth = spec.depth();
        if depth > self.max_depth {
            return Err(GuardError::InvalidSpec {
                reason: format!("nesting depth {depth} exceeds limit {}", self.max_depth),
            });
        }
        Ok(Self::build(spec))
    }

    /// Compile a chain of specs
    ///
    /// # Errors
    ///
    /// Returns error if any spec is rejected
    pub fn compile_chain(&self, specs: &[GuardSpec]) -> GuardResult<GuardChain> {
        specs.iter().map(|spec| self.compile(spec)).collect()
    }

    /// Compile a chain from JSON source
    ///
    /// # Errors
    ///
    /// Returns error if the source is malformed or a spec is rejected
    pub fn compile_from_source(&self, source: &str) -> GuardResult<GuardChain> {
        let specs: Vec<GuardSpec> =
            serde_json::from_str(source).map_err(|err| GuardError::InvalidSpec {
                reason: err.to_string(),
            })?;
        self.compile_chain(&specs)
    }

    fn build(spec: &GuardSpec) -> SharedGuard {
        match spec {
            GuardSpec::Admin => admin(),
            GuardSpec::Owner => owner(),
            GuardSpec::CompanySettings => company_settings(),
            GuardSpec::Authenticated => authenticated(),
            GuardSpec::Plan { plan: tier } => plan(*tier),
            GuardSpec::Permission { permission: p } => permission(p.clone()),
            GuardSpec::Enabled { module } => enabled(*module),
            GuardSpec::Any { guards } => or(guards.iter().map(Self::build).collect()),
            GuardSpec::All { guards } => all(guards.iter().map(Self::build).collect()),
            GuardSpec::Not { guard } => not(Self::build(guard)),
        }
    }
}

impl Default for GuardCompiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::evaluate;
    use crate::guard::EvalContext;
    use crate::provider::SubscriptionProvider;
    use gatehouse_core::{AuthorizationContext, CompanyUser, ContextField, Subscription};

    #[test]
    fn test_spec_json_shape() {
        let spec: GuardSpec = serde_json::from_str(
            r#"{"kind": "any", "guards": [{"kind": "admin"}, {"kind": "plan", "plan": "enterprise"}]}"#,
        )
        .unwrap();
        assert_eq!(
            spec,
            GuardSpec::Any {
                guards: vec![
                    GuardSpec::Admin,
                    GuardSpec::Plan {
                        plan: PlanTier::Enterprise
                    },
                ]
            }
        );
        assert_eq!(spec.depth(), 2);
    }

    #[test]
    fn test_spec_rejects_bad_permission() {
        let result: Result<GuardSpec, _> =
            serde_json::from_str(r#"{"kind": "permission", "permission": "fly_invoice"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_compile_names() {
        let compiler = GuardCompiler::new();
        let chain = compiler
            .compile_from_source(
                r#"[
                    {"kind": "authenticated"},
                    {"kind": "not", "guard": {"kind": "enabled", "module": "quotes"}},
                    {"kind": "permission", "permission": "view_quote"}
                ]"#,
            )
            .unwrap();

        let names: Vec<_> = chain.iter().map(|g| g.name()).collect();
        assert_eq!(
            names,
            vec!["authenticated", "not(enabled(quotes))", "permission(view_quote)"]
        );
        assert!(chain[1].reads().contains(ContextField::EnabledModules));
    }

    #[test]
    fn test_compile_depth_limit() {
        let mut spec = GuardSpec::Admin;
        for _ in 0..5 {
            spec = GuardSpec::Not {
                guard: Box::new(spec),
            };
        }
        assert_eq!(spec.depth(), 6);

        assert!(GuardCompiler::new().with_max_depth(6).compile(&spec).is_ok());
        let err = GuardCompiler::new()
            .with_max_depth(5)
            .compile(&spec)
            .err()
            .unwrap();
        assert!(matches!(err, GuardError::InvalidSpec { .. }));
    }

    #[test]
    fn test_compile_from_source_malformed() {
        let err = GuardCompiler::new()
            .compile_from_source(r#"[{"kind": "superuser"}]"#)
            .err()
            .unwrap();
        assert!(matches!(err, GuardError::InvalidSpec { .. }));
    }

    #[tokio::test]
    async fn test_compiled_empty_any_denies() {
        let chain = GuardCompiler::new()
            .compile_chain(&[GuardSpec::Any { guards: vec![] }])
            .unwrap();
        let auth = AuthorizationContext::new()
            .with_company_user(CompanyUser::new().with_admin(true));
        let sub = SubscriptionProvider::current(Subscription::none());
        assert!(!evaluate(&chain, &EvalContext::new(&auth, &sub)).await.unwrap());
    }
}
