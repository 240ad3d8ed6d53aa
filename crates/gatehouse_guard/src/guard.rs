//! The guard trait and evaluation context.

use crate::error::GuardResult;
use crate::provider::PlanProvider;
use async_trait::async_trait;
use gatehouse_core::{AuthorizationContext, FieldSet};
use std::sync::Arc;

/// Everything a guard may consult during one evaluation
///
/// Borrowed from the caller; guards never mutate it.
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    /// Session snapshot
    pub auth: &'a AuthorizationContext,
    /// Subscription source
    pub plans: &'a dyn PlanProvider,
}

impl<'a> EvalContext<'a> {
    /// Create an evaluation context
    #[must_use]
    pub fn new(auth: &'a AuthorizationContext, plans: &'a dyn PlanProvider) -> Self {
        Self { auth, plans }
    }
}

impl std::fmt::Debug for EvalContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvalContext")
            .field("auth", self.auth)
            .field("plans", &self.plans.name())
            .finish()
    }
}

/// An asynchronous authorization predicate
///
/// Guards are built once and shared. They hold no per-call state, so
/// checking the same guard twice against the same context gives the same
/// answer.
#[async_trait]
pub trait Guard: Send + Sync {
    /// Name shown in traces and errors
    fn name(&self) -> String;

    /// Context fields this guard reads
    fn reads(&self) -> FieldSet;

    /// Decide for the given context
    ///
    /// Missing fields are falsy. An error means the decision could not be
    /// made at all.
    ///
    /// # Errors
    ///
    /// Returns error if an upstream source fails
    async fn check(&self, ctx: &EvalContext<'_>) -> GuardResult<bool>;
}

/// A guard shared between route tables and combinators
pub type SharedGuard = Arc<dyn Guard>;

/// An ordered chain of guards, all of which must pass
pub type GuardChain = Vec<SharedGuard>;

type CheckFn = dyn Fn(&AuthorizationContext) -> GuardResult<bool> + Send + Sync;

/// A guard backed by a synchronous closure over the session snapshot
pub struct FnGuard {
    name: String,
    reads: FieldSet,
    check: Arc<CheckFn>,
}

impl FnGuard {
    /// Create a closure guard
    pub fn new<F>(name: impl Into<String>, reads: FieldSet, check: F) -> Self
    where
        F: Fn(&AuthorizationContext) -> GuardResult<bool> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            reads,
            check: Arc::new(check),
        }
    }

    /// Wrap into a shared guard
    #[must_use]
    pub fn shared(self) -> SharedGuard {
        Arc::new(self)
    }
}

#[async_trait]
impl Guard for FnGuard {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn reads(&self) -> FieldSet {
        self.reads.clone()
    }

    async fn check(&self, ctx: &EvalContext<'_>) -> GuardResult<bool> {
        (self.check)(ctx.auth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::SubscriptionProvider;
    use gatehouse_core::{ContextField, Subscription};

    #[tokio::test]
    async fn test_fn_guard() {
        let guard = FnGuard::new(
            "has_locale",
            FieldSet::new(),
            |auth: &AuthorizationContext| Ok(auth.extra("locale").is_some()),
        );
        let sub = SubscriptionProvider::current(Subscription::none());

        let auth = AuthorizationContext::new();
        assert!(!guard.check(&EvalContext::new(&auth, &sub)).await.unwrap());

        let auth = auth.with_extra("locale", serde_json::json!("de"));
        assert!(guard.check(&EvalContext::new(&auth, &sub)).await.unwrap());
    }

    #[test]
    fn test_fn_guard_metadata() {
        let guard = FnGuard::new(
            "custom",
            FieldSet::new().with(ContextField::CompanyUser),
            |_: &AuthorizationContext| Ok(true),
        );
        assert_eq!(guard.name(), "custom");
        assert!(guard.reads().contains(ContextField::CompanyUser));
    }

    #[test]
    fn test_eval_context_debug_names_provider() {
        let auth = AuthorizationContext::new();
        let sub = SubscriptionProvider::current(Subscription::none());
        let ctx = EvalContext::new(&auth, &sub);
        assert!(format!("{ctx:?}").contains("subscription"));
    }
}
