//! Subscription plan tiers.
//!
//! No ordering between tiers is assumed. A subscription lists the tiers it
//! is entitled to, and only those count.

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Subscription plan tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    /// Free hosted plan
    Free,
    /// Pro plan
    Pro,
    /// Enterprise plan
    Enterprise,
    /// White label add-on
    WhiteLabel,
}

impl PlanTier {
    /// Wire name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Enterprise => "enterprise",
            Self::WhiteLabel => "white_label",
        }
    }
}

impl FromStr for PlanTier {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "free" => Ok(Self::Free),
            "pro" => Ok(Self::Pro),
            "enterprise" => Ok(Self::Enterprise),
            "white_label" => Ok(Self::WhiteLabel),
            _ => Err(CoreError::UnknownPlan {
                name: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for PlanTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subscription state of the active account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Active plan, if any
    #[serde(default)]
    pub plan: Option<PlanTier>,
    /// When the plan lapses
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Additional tiers the account is entitled to
    #[serde(default)]
    pub entitlements: BTreeSet<PlanTier>,
}

impl Subscription {
    /// Subscription with no active plan
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Subscription on a plan
    #[must_use]
    pub fn on(plan: PlanTier) -> Self {
        Self {
            plan: Some(plan),
            ..Self::default()
        }
    }

    /// Set expiry
    #[must_use]
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Add an entitlement
    #[must_use]
    pub fn with_entitlement(mut self, tier: PlanTier) -> Self {
        self.entitlements.insert(tier);
        self
    }

    /// Check if the subscription has lapsed at `now`
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires| expires <= now)
    }

    /// Check if `required` is included at `now`
    ///
    /// A lapsed subscription or one without a plan includes nothing.
    #[must_use]
    pub fn includes_at(&self, required: PlanTier, now: DateTime<Utc>) -> bool {
        let Some(plan) = self.plan else {
            return false;
        };
        if self.is_expired_at(now) {
            return false;
        }
        plan == required || self.entitlements.contains(&required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_plan_tier_parse() {
        assert_eq!("white_label".parse::<PlanTier>().unwrap(), PlanTier::WhiteLabel);
        assert!("platinum".parse::<PlanTier>().is_err());
    }

    #[test]
    fn test_no_plan_includes_nothing() {
        let sub = Subscription::none().with_entitlement(PlanTier::Pro);
        assert!(!sub.includes_at(PlanTier::Pro, Utc::now()));
    }

    #[test]
    fn test_plan_includes_itself_only() {
        let sub = Subscription::on(PlanTier::Enterprise);
        let now = Utc::now();
        assert!(sub.includes_at(PlanTier::Enterprise, now));
        assert!(!sub.includes_at(PlanTier::Pro, now));
    }

    #[test]
    fn test_entitlements() {
        let sub = Subscription::on(PlanTier::Enterprise).with_entitlement(PlanTier::Pro);
        assert!(sub.includes_at(PlanTier::Pro, Utc::now()));
    }

    #[test]
    fn test_expired_subscription() {
        let now = Utc::now();
        let sub = Subscription::on(PlanTier::Pro).with_expiry(now - Duration::days(1));
        assert!(sub.is_expired_at(now));
        assert!(!sub.includes_at(PlanTier::Pro, now));

        let sub = Subscription::on(PlanTier::Pro).with_expiry(now + Duration::days(30));
        assert!(sub.includes_at(PlanTier::Pro, now));
    }

    #[test]
    fn test_subscription_serde() {
        let sub: Subscription = serde_json::from_str(
            r#"{"plan":"enterprise","entitlements":["white_label"]}"#,
        )
        .unwrap();
        assert_eq!(sub.plan, Some(PlanTier::Enterprise));
        assert!(sub.includes_at(PlanTier::WhiteLabel, Utc::now()));
    }
}
