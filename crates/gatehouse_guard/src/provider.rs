//! Subscription providers.
//!
//! Plan guards never read ambient state. The provider is handed to the
//! evaluation alongside the context.

use crate::error::{GuardError, GuardResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gatehouse_core::{PlanTier, Subscription};

/// Source of truth for the active account's plan entitlements
#[async_trait]
pub trait PlanProvider: Send + Sync {
    /// Provider name used in logs and errors
    fn name(&self) -> &str;

    /// Check whether the active account's plan includes `plan`
    ///
    /// # Errors
    ///
    /// Returns `GuardError::Upstream` if the subscription state cannot be read
    async fn includes(&self, plan: PlanTier) -> GuardResult<bool>;
}

/// A subscription judged at a fixed instant
///
/// The instant is taken when the session is captured, so every guard in a
/// navigation sees the same expiry decision.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionProvider {
    subscription: Subscription,
    as_of: DateTime<Utc>,
}

impl SubscriptionProvider {
    /// Judge `subscription` as of `as_of`
    #[must_use]
    pub fn new(subscription: Subscription, as_of: DateTime<Utc>) -> Self {
        Self {
            subscription,
            as_of,
        }
    }

    /// Judge `subscription` as of the moment of this call
    #[must_use]
    pub fn current(subscription: Subscription) -> Self {
        Self::new(subscription, Utc::now())
    }

    /// Underlying subscription
    #[must_use]
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    /// Instant expiry is checked against
    #[must_use]
    pub fn as_of(&self) -> DateTime<Utc> {
        self.as_of
    }
}

#[async_trait]
impl PlanProvider for SubscriptionProvider {
    fn name(&self) -> &str {
        "subscription"
    }

    async fn includes(&self, plan: PlanTier) -> GuardResult<bool> {
        Ok(self.subscription.includes_at(plan, self.as_of))
    }
}

/// Provider for sessions whose subscription could not be loaded
#[derive(Debug, Clone)]
pub struct UnavailablePlanProvider {
    reason: String,
}

impl UnavailablePlanProvider {
    /// Create a provider that always fails with `reason`
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl PlanProvider for UnavailablePlanProvider {
    fn name(&self) -> &str {
        "unavailable"
    }

    async fn includes(&self, _plan: PlanTier) -> GuardResult<bool> {
        Err(GuardError::upstream(self.name(), self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[tokio::test]
    async fn test_subscription_provider() {
        let sub = SubscriptionProvider::current(Subscription::on(PlanTier::Pro));
        assert!(sub.includes(PlanTier::Pro).await.unwrap());
        assert!(!sub.includes(PlanTier::Enterprise).await.unwrap());
    }

    #[tokio::test]
    async fn test_no_subscription_includes_nothing() {
        let sub = SubscriptionProvider::current(Subscription::none());
        assert!(!sub.includes(PlanTier::Free).await.unwrap());
    }

    #[tokio::test]
    async fn test_expiry_judged_at_injected_instant() {
        let expires = Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap();
        let sub = Subscription::on(PlanTier::Enterprise).with_expiry(expires);

        let before = SubscriptionProvider::new(sub.clone(), expires - Duration::days(1));
        assert!(before.includes(PlanTier::Enterprise).await.unwrap());

        let after = SubscriptionProvider::new(sub, expires + Duration::seconds(1));
        assert_eq!(after.as_of(), expires + Duration::seconds(1));
        assert!(!after.includes(PlanTier::Enterprise).await.unwrap());
    }

    #[tokio::test]
    async fn test_unavailable_provider_fails() {
        let provider = UnavailablePlanProvider::new("billing api returned 503");
        let err = provider.includes(PlanTier::Pro).await.unwrap_err();
        assert_eq!(
            err,
            GuardError::upstream("unavailable", "billing api returned 503")
        );
    }
}
