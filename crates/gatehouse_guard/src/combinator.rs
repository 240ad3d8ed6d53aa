//! Guard combinators.
//!
//! `or` allows on the first passing guard and denies when the list is empty.
//! `all` is the nested form of a chain and allows when the list is empty.
//! Both await their guards one at a time, in order.

use crate::error::GuardResult;
use crate::evaluator::evaluate;
use crate::guard::{EvalContext, Guard, SharedGuard};
use async_trait::async_trait;
use gatehouse_core::FieldSet;
use std::sync::Arc;
use tracing::debug;

fn union_reads(guards: &[SharedGuard]) -> FieldSet {
    let mut fields = FieldSet::new();
    for guard in guards {
        fields.extend_from(&guard.reads());
    }
    fields
}

fn joined_names(guards: &[SharedGuard]) -> String {
    guards
        .iter()
        .map(|g| g.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Passes if any inner guard passes
pub struct Or {
    guards: Vec<SharedGuard>,
}

impl Or {
    /// Create an `or` over `guards`
    #[must_use]
    pub fn new(guards: Vec<SharedGuard>) -> Self {
        Self { guards }
    }
}

#[async_trait]
impl Guard for Or {
    fn name(&self) -> String {
        format!("or({})", joined_names(&self.guards))
    }

    fn reads(&self) -> FieldSet {
        union_reads(&self.guards)
    }

    async fn check(&self, ctx: &EvalContext<'_>) -> GuardResult<bool> {
        for guard in &self.guards {
            if guard.check(ctx).await? {
                debug!(guard = %guard.name(), "or satisfied");
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Passes if every inner guard passes
pub struct All {
    guards: Vec<SharedGuard>,
}

impl All {
    /// Create an `all` over `guards`
    #[must_use]
    pub fn new(guards: Vec<SharedGuard>) -> Self {
        Self { guards }
    }
}

#[async_trait]
impl Guard for All {
    fn name(&self) -> String {
        format!("all({})", joined_names(&self.guards))
    }

    fn reads(&self) -> FieldSet {
        union_reads(&self.guards)
    }

    async fn check(&self, ctx: &EvalContext<'_>) -> GuardResult<bool> {
        evaluate(&self.guards, ctx).await
    }
}

/// Inverts an inner guard; errors pass through
pub struct Not {
    guard: SharedGuard,
}

impl Not {
    /// Create a `not` over `guard`
    #[must_use]
    pub fn new(guard: SharedGuard) -> Self {
        Self { guard }
    }
}

#[async_trait]
impl Guard for Not {
    fn name(&self) -> String {
        format!("not({})", self.guard.name())
    }

    fn reads(&self) -> FieldSet {
        self.guard.reads()
    }

    async fn check(&self, ctx: &EvalContext<'_>) -> GuardResult<bool> {
        Ok(!self.guard.check(ctx).await?)
    }
}

/// Guard passing when any of `guards` passes
#[must_use]
pub fn or(guards: Vec<SharedGuard>) -> SharedGuard {
    Arc::new(Or::new(guards))
}

/// Guard passing when all of `guards` pass
#[must_use]
pub fn all(guards: Vec<SharedGuard>) -> SharedGuard {
    Arc::new(All::new(guards))
}

/// Guard passing when `guard` denies
#[must_use]
pub fn not(guard: SharedGuard) -> SharedGuard {
    Arc::new(Not::new(guard))
}
