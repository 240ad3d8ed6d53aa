//! Authorization context.
//!
//! A read-only snapshot of session state taken when a route is entered.
//! Every field is optional: a guard that finds its field missing treats it
//! as falsy.

use crate::error::CoreResult;
use crate::field::{ContextField, FieldSet};
use crate::module::{Module, ModuleSet};
use crate::permission::{Permission, PermissionSet};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Scope at which settings are being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsLevel {
    /// Company-wide settings
    Company,
    /// Account settings
    Account,
    /// Group settings overriding company settings
    Group,
    /// Client settings overriding group settings
    Client,
}

/// The signed-in user's membership in the current company
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyUser {
    /// Company administrator
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_admin: bool,
    /// Account owner
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_owner: bool,
    /// Granted permissions
    #[serde(default, deserialize_with = "null_as_default")]
    pub permissions: PermissionSet,
}

/// Reads `null` the same as an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl CompanyUser {
    /// A user with no flags and no permissions
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set admin flag
    #[must_use]
    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    /// Set owner flag
    #[must_use]
    pub fn with_owner(mut self, is_owner: bool) -> Self {
        self.is_owner = is_owner;
        self
    }

    /// Set permissions
    #[must_use]
    pub fn with_permissions(mut self, permissions: PermissionSet) -> Self {
        self.permissions = permissions;
        self
    }

    /// Admins and owners bypass individual permissions
    #[must_use]
    pub fn has_permission(&self, permission: &Permission) -> bool {
        self.is_admin || self.is_owner || self.permissions.allows(permission)
    }
}

/// Snapshot of the session data guards consult
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationContext {
    /// Signed-in company user, absent when logged out
    #[serde(default)]
    pub company_user: Option<CompanyUser>,
    /// Settings scope, absent outside settings flows
    #[serde(default)]
    pub settings_level: Option<SettingsLevel>,
    /// Company module bitmask
    #[serde(default)]
    pub enabled_modules: Option<ModuleSet>,
    /// Fields not modelled here, kept in document order
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl AuthorizationContext {
    /// Create an empty context (logged out, no settings flow)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a context from JSON
    ///
    /// # Errors
    ///
    /// Returns error if the document is malformed
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set company user
    #[must_use]
    pub fn with_company_user(mut self, company_user: CompanyUser) -> Self {
        self.company_user = Some(company_user);
        self
    }

    /// Set settings level
    #[must_use]
    pub fn with_settings_level(mut self, level: SettingsLevel) -> Self {
        self.settings_level = Some(level);
        self
    }

    /// Set enabled modules
    #[must_use]
    pub fn with_modules(mut self, modules: ModuleSet) -> Self {
        self.enabled_modules = Some(modules);
        self
    }

    /// Set an extra field
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Read an extra field
    #[must_use]
    pub fn extra(&self, key: &str) -> Option<&serde_json::Value> {
        self.extra.get(key)
    }

    /// Check whether a company user is signed in
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.company_user.is_some()
    }

    /// Admin flag, false when logged out
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.company_user.as_ref().is_some_and(|u| u.is_admin)
    }

    /// Owner flag, false when logged out
    #[must_use]
    pub fn is_owner(&self) -> bool {
        self.company_user.as_ref().is_some_and(|u| u.is_owner)
    }

    /// Permission check, false when logged out
    #[must_use]
    pub fn has_permission(&self, permission: &Permission) -> bool {
        self.company_user
            .as_ref()
            .is_some_and(|u| u.has_permission(permission))
    }

    /// Module check, false when the bitmask is absent
    #[must_use]
    pub fn module_enabled(&self, module: Module) -> bool {
        self.enabled_modules.is_some_and(|m| m.contains(module))
    }

    /// Fields actually present in this snapshot
    #[must_use]
    pub fn populated(&self) -> FieldSet {
        let mut fields = FieldSet::new();
        if self.company_user.is_some() {
            fields.insert(ContextField::CompanyUser);
            fields.insert(ContextField::Permissions);
        }
        if self.settings_level.is_some() {
            fields.insert(ContextField::SettingsLevel);
        }
        if self.enabled_modules.is_some() {
            fields.insert(ContextField::EnabledModules);
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::PermissionAction;

    #[test]
    fn test_logged_out_is_falsy() {
        let ctx = AuthorizationContext::new();
        assert!(!ctx.is_authenticated());
        assert!(!ctx.is_admin());
        assert!(!ctx.is_owner());
        assert!(!ctx.has_permission(&Permission::new(PermissionAction::View, "client")));
        assert!(!ctx.module_enabled(Module::Invoices));
        assert!(ctx.populated().is_empty());
    }

    #[test]
    fn test_admin_bypasses_permissions() {
        let ctx = AuthorizationContext::new()
            .with_company_user(CompanyUser::new().with_admin(true));
        assert!(ctx.has_permission(&Permission::new(PermissionAction::Edit, "invoice")));
    }

    #[test]
    fn test_from_json_product_shape() {
        let ctx = AuthorizationContext::from_json(
            r#"{
                "company_user": {"is_admin": false, "is_owner": true, "permissions": "view_client"},
                "settings_level": "company",
                "enabled_modules": 4096,
                "locale": "en"
            }"#,
        )
        .unwrap();

        assert!(ctx.is_owner());
        assert!(!ctx.is_admin());
        assert_eq!(ctx.settings_level, Some(SettingsLevel::Company));
        assert!(ctx.module_enabled(Module::Invoices));
        assert_eq!(ctx.extra("locale"), Some(&serde_json::json!("en")));
    }

    #[test]
    fn test_from_json_missing_fields() {
        let ctx = AuthorizationContext::from_json(r#"{"company_user": {}}"#).unwrap();
        assert!(ctx.is_authenticated());
        assert!(!ctx.is_admin());
        assert!(ctx.settings_level.is_none());
    }

    #[test]
    fn test_from_json_null_flags_are_falsy() {
        let ctx = AuthorizationContext::from_json(
            r#"{"company_user": {"is_admin": null, "is_owner": true, "permissions": null}}"#,
        )
        .unwrap();
        assert!(!ctx.is_admin());
        assert!(ctx.is_owner());
        assert!(ctx.company_user.as_ref().unwrap().permissions.is_empty());

        let ctx = AuthorizationContext::from_json(
            r#"{"company_user": {"is_admin": null, "is_owner": null, "permissions": null}}"#,
        )
        .unwrap();
        assert!(ctx.is_authenticated());
        assert!(!ctx.is_admin());
        assert!(!ctx.has_permission(&Permission::new(PermissionAction::View, "client")));
    }

    #[test]
    fn test_from_json_unknown_permission_keeps_session() {
        let ctx = AuthorizationContext::from_json(
            r#"{"company_user": {"is_owner": true, "permissions": "view_client,disable_emails"}}"#,
        )
        .unwrap();
        assert!(ctx.is_owner());
        assert!(ctx.has_permission(&Permission::new(PermissionAction::Edit, "invoice")));

        let ctx = AuthorizationContext::from_json(
            r#"{"company_user": {"permissions": "view_client,disable_emails"}}"#,
        )
        .unwrap();
        assert!(ctx.has_permission(&Permission::new(PermissionAction::View, "client")));
    }

    #[test]
    fn test_from_json_rejects_bad_level() {
        assert!(AuthorizationContext::from_json(r#"{"settings_level": "galaxy"}"#).is_err());
    }

    #[test]
    fn test_populated() {
        let ctx = AuthorizationContext::new()
            .with_company_user(CompanyUser::new())
            .with_settings_level(SettingsLevel::Group);
        let fields = ctx.populated();
        assert!(fields.contains(ContextField::CompanyUser));
        assert!(fields.contains(ContextField::SettingsLevel));
        assert!(!fields.contains(ContextField::EnabledModules));
    }
}
