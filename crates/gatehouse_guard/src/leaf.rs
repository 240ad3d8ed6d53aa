//! Role, permission, module, and plan guards.

use crate::error::GuardResult;
use crate::guard::{EvalContext, Guard, SharedGuard};
use async_trait::async_trait;
use gatehouse_core::{ContextField, FieldSet, Module, Permission, PlanTier, SettingsLevel};
use std::sync::Arc;

/// Passes for company administrators
#[derive(Debug, Clone, Copy, Default)]
pub struct Admin;

#[async_trait]
impl Guard for Admin {
    fn name(&self) -> String {
        "admin".to_string()
    }

    fn reads(&self) -> FieldSet {
        FieldSet::new().with(ContextField::CompanyUser)
    }

    async fn check(&self, ctx: &EvalContext<'_>) -> GuardResult<bool> {
        Ok(ctx.auth.is_admin())
    }
}

/// Passes for the account owner
#[derive(Debug, Clone, Copy, Default)]
pub struct Owner;

#[async_trait]
impl Guard for Owner {
    fn name(&self) -> String {
        "owner".to_string()
    }

    fn reads(&self) -> FieldSet {
        FieldSet::new().with(ContextField::CompanyUser)
    }

    async fn check(&self, ctx: &EvalContext<'_>) -> GuardResult<bool> {
        Ok(ctx.auth.is_owner())
    }
}

/// Passes while editing company-level settings
#[derive(Debug, Clone, Copy, Default)]
pub struct CompanySettings;

#[async_trait]
impl Guard for CompanySettings {
    fn name(&self) -> String {
        "company_settings".to_string()
    }

    fn reads(&self) -> FieldSet {
        FieldSet::new().with(ContextField::SettingsLevel)
    }

    async fn check(&self, ctx: &EvalContext<'_>) -> GuardResult<bool> {
        Ok(ctx.auth.settings_level == Some(SettingsLevel::Company))
    }
}

/// Passes when someone is signed in
#[derive(Debug, Clone, Copy, Default)]
pub struct Authenticated;

#[async_trait]
impl Guard for Authenticated {
    fn name(&self) -> String {
        "authenticated".to_string()
    }

    fn reads(&self) -> FieldSet {
        FieldSet::new().with(ContextField::CompanyUser)
    }

    async fn check(&self, ctx: &EvalContext<'_>) -> GuardResult<bool> {
        Ok(ctx.auth.is_authenticated())
    }
}

/// Passes when the subscription includes a plan tier
#[derive(Debug, Clone, Copy)]
pub struct Plan(pub PlanTier);

#[async_trait]
impl Guard for Plan {
    fn name(&self) -> String {
        format!("plan({})", self.0)
    }

    fn reads(&self) -> FieldSet {
        FieldSet::new().with(ContextField::Subscription)
    }

    async fn check(&self, ctx: &EvalContext<'_>) -> GuardResult<bool> {
        ctx.plans.includes(self.0).await
    }
}

/// Passes when the company user holds a permission
#[derive(Debug, Clone)]
pub struct HasPermission(pub Permission);

#[async_trait]
impl Guard for HasPermission {
    fn name(&self) -> String {
        format!("permission({})", self.0)
    }

    fn reads(&self) -> FieldSet {
        FieldSet::new()
            .with(ContextField::CompanyUser)
            .with(ContextField::Permissions)
    }

    async fn check(&self, ctx: &EvalContext<'_>) -> GuardResult<bool> {
        Ok(ctx.auth.has_permission(&self.0))
    }
}

/// Passes when the company has a module switched on
#[derive(Debug, Clone, Copy)]
pub struct Enabled(pub Module);

#[async_trait]
impl Guard for Enabled {
    fn name(&self) -> String {
        format!("enabled({})", self.0)
    }

    fn reads(&self) -> FieldSet {
        FieldSet::new().with(ContextField::EnabledModules)
    }

    async fn check(&self, ctx: &EvalContext<'_>) -> GuardResult<bool> {
        Ok(ctx.auth.module_enabled(self.0))
    }
}

/// Admin guard
#[must_use]
pub fn admin() -> SharedGuard {
    Arc::new(Admin)
}

/// Owner guard
#[must_use]
pub fn owner() -> SharedGuard {
    Arc::new(Owner)
}

/// Company settings guard
#[must_use]
pub fn company_settings() -> SharedGuard {
    Arc::new(CompanySettings)
}

/// Signed-in guard
#[must_use]
pub fn authenticated() -> SharedGuard {
    Arc::new(Authenticated)
}

/// Plan guard for `required`
#[must_use]
pub fn plan(required: PlanTier) -> SharedGuard {
    Arc::new(Plan(required))
}

/// Permission guard
#[must_use]
pub fn permission(required: Permission) -> SharedGuard {
    Arc::new(HasPermission(required))
}

/// Module guard
#[must_use]
pub fn enabled(module: Module) -> SharedGuard {
    Arc::new(Enabled(module))
}
