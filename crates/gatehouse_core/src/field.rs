//! Context field declarations.
//!
//! Guards declare which fields they read, routes declare which fields their
//! flow populates. The two are compared when a route table is built.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// A field of the authorization context a guard may read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextField {
    /// The signed-in company user
    CompanyUser,
    /// Scope of the settings flow
    SettingsLevel,
    /// Company user permissions
    Permissions,
    /// Company module bitmask
    EnabledModules,
    /// Account subscription
    Subscription,
}

impl ContextField {
    /// Every field
    pub const ALL: [ContextField; 5] = [
        Self::CompanyUser,
        Self::SettingsLevel,
        Self::Permissions,
        Self::EnabledModules,
        Self::Subscription,
    ];

    /// Wire name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CompanyUser => "company_user",
            Self::SettingsLevel => "settings_level",
            Self::Permissions => "permissions",
            Self::EnabledModules => "enabled_modules",
            Self::Subscription => "subscription",
        }
    }
}

impl FromStr for ContextField {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| CoreError::UnknownField {
                name: s.to_string(),
            })
    }
}

impl std::fmt::Display for ContextField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered set of context fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSet {
    fields: BTreeSet<ContextField>,
}

impl FieldSet {
    /// Create an empty field set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every field
    #[must_use]
    pub fn all() -> Self {
        ContextField::ALL.into_iter().collect()
    }

    /// Add a field
    pub fn insert(&mut self, field: ContextField) {
        self.fields.insert(field);
    }

    /// Add a field, builder style
    #[must_use]
    pub fn with(mut self, field: ContextField) -> Self {
        self.insert(field);
        self
    }

    /// Merge another set into this one
    pub fn extend_from(&mut self, other: &FieldSet) {
        self.fields.extend(other.fields.iter().copied());
    }

    /// Union of two sets
    #[must_use]
    pub fn union(&self, other: &FieldSet) -> Self {
        let mut out = self.clone();
        out.extend_from(other);
        out
    }

    /// Check membership
    #[must_use]
    pub fn contains(&self, field: ContextField) -> bool {
        self.fields.contains(&field)
    }

    /// Fields in `self` that `provided` lacks, in order
    #[must_use]
    pub fn missing_from(&self, provided: &FieldSet) -> Vec<ContextField> {
        self.fields.difference(&provided.fields).copied().collect()
    }

    /// Get the number of fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over fields
    pub fn iter(&self) -> impl Iterator<Item = ContextField> + '_ {
        self.fields.iter().copied()
    }
}

impl FromIterator<ContextField> for FieldSet {
    fn from_iter<I: IntoIterator<Item = ContextField>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_parse_roundtrip_names() {
        for field in ContextField::ALL {
            assert_eq!(field.as_str().parse::<ContextField>().unwrap(), field);
        }
        assert!("company".parse::<ContextField>().is_err());
    }

    #[test]
    fn test_missing_from() {
        let reads = FieldSet::new()
            .with(ContextField::CompanyUser)
            .with(ContextField::SettingsLevel);
        let provided = FieldSet::new().with(ContextField::CompanyUser);

        assert_eq!(reads.missing_from(&provided), vec![ContextField::SettingsLevel]);
        assert!(provided.missing_from(&reads).is_empty());
    }

    #[test]
    fn test_union() {
        let a = FieldSet::new().with(ContextField::Permissions);
        let b = FieldSet::new().with(ContextField::CompanyUser);
        let u = a.union(&b);
        assert_eq!(u.len(), 2);
        assert!(u.contains(ContextField::Permissions));
        assert!(u.contains(ContextField::CompanyUser));
    }

    #[test]
    fn test_field_set_serde() {
        let set: FieldSet = serde_json::from_str(r#"["settings_level","company_user"]"#).unwrap();
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![ContextField::CompanyUser, ContextField::SettingsLevel]
        );
    }
}
