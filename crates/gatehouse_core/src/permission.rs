//! Company user permissions.
//!
//! Permissions travel as a comma separated string (`"view_client,edit_invoice"`)
//! and are parsed into `<action>_<entity>` pairs. The entity `all` is a wildcard
//! for its action.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use tracing::debug;

/// Wildcard entity name
pub const WILDCARD_ENTITY: &str = "all";

/// Action half of a permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionAction {
    /// Read access
    View,
    /// Modify existing records
    Edit,
    /// Create new records
    Create,
}

impl PermissionAction {
    /// Wire prefix for this action
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Create => "create",
        }
    }
}

/// A single permission, e.g. `view_invoice`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Permission {
    action: PermissionAction,
    entity: String,
}

impl Permission {
    /// Create a permission for an action on an entity
    #[must_use]
    pub fn new(action: PermissionAction, entity: impl Into<String>) -> Self {
        Self {
            action,
            entity: entity.into(),
        }
    }

    /// The wildcard permission for an action (`view_all`, `edit_all`, `create_all`)
    #[must_use]
    pub fn wildcard(action: PermissionAction) -> Self {
        Self::new(action, WILDCARD_ENTITY)
    }

    /// Permission action
    #[must_use]
    pub fn action(&self) -> PermissionAction {
        self.action
    }

    /// Permission entity
    #[must_use]
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Check if this is a wildcard permission
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.entity == WILDCARD_ENTITY
    }
}

impl FromStr for Permission {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let invalid = || CoreError::InvalidPermission {
            name: s.to_string(),
        };

        let (action, entity) = s.trim().split_once('_').ok_or_else(invalid)?;
        let action = match action {
            "view" => PermissionAction::View,
            "edit" => PermissionAction::Edit,
            "create" => PermissionAction::Create,
            _ => return Err(invalid()),
        };

        if entity.is_empty()
            || !entity
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(invalid());
        }

        Ok(Self::new(action, entity))
    }
}

impl TryFrom<String> for Permission {
    type Error = CoreError;

    fn try_from(value: String) -> CoreResult<Self> {
        value.parse()
    }
}

impl From<Permission> for String {
    fn from(permission: Permission) -> Self {
        permission.to_string()
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.action.as_str(), self.entity)
    }
}

/// Permissions held by a company user
///
/// Deserialization is lenient: grants this crate does not understand are
/// dropped so the rest of the session still loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PermissionSet {
    permissions: BTreeSet<Permission>,
}

impl PermissionSet {
    /// Create an empty permission set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma separated permission list; blank entries are skipped
    ///
    /// # Errors
    ///
    /// Returns error if any entry is not a valid permission
    pub fn parse_list(list: &str) -> CoreResult<Self> {
        let permissions = list
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::parse)
            .collect::<CoreResult<BTreeSet<Permission>>>()?;

        Ok(Self { permissions })
    }

    /// Parse a comma separated permission list, skipping unrecognised entries
    #[must_use]
    pub fn parse_lenient(list: &str) -> Self {
        list.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .filter_map(|entry| match entry.parse() {
                Ok(permission) => Some(permission),
                Err(err) => {
                    debug!(entry, error = %err, "skipping unrecognised permission");
                    None
                }
            })
            .collect()
    }

    /// Grant a permission
    pub fn grant(&mut self, permission: Permission) {
        self.permissions.insert(permission);
    }

    /// Add a permission, builder style
    #[must_use]
    pub fn with(mut self, permission: Permission) -> Self {
        self.grant(permission);
        self
    }

    /// Check the exact permission or the wildcard for its action
    #[must_use]
    pub fn allows(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
            || self
                .permissions
                .contains(&Permission::wildcard(permission.action()))
    }

    /// Get the number of permissions
    #[must_use]
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Check if empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Iterate over permissions
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self {
            permissions: iter.into_iter().collect(),
        }
    }
}

impl From<String> for PermissionSet {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

impl From<PermissionSet> for String {
    fn from(set: PermissionSet) -> Self {
        set.permissions
            .iter()
            .map(Permission::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}
