//! Session snapshots.
//!
//! What the authentication layer hands over when a route is entered: the
//! authorization context plus the account subscription.

use crate::guard::EvalContext;
use crate::provider::SubscriptionProvider;
use chrono::{DateTime, Utc};
use gatehouse_core::{AuthorizationContext, CoreResult, Subscription};
use serde::Deserialize;

/// Wire form of a snapshot; `as_of` defaults to the time of parsing
#[derive(Debug, Default, Deserialize)]
struct SessionDocument {
    #[serde(default)]
    context: AuthorizationContext,
    #[serde(default)]
    subscription: Subscription,
    #[serde(default)]
    as_of: Option<DateTime<Utc>>,
}

/// Context and subscription captured together
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    /// Session fields read by guards
    pub context: AuthorizationContext,
    /// Account subscription, judged at capture time
    pub plans: SubscriptionProvider,
}

impl SessionSnapshot {
    /// Create a snapshot
    #[must_use]
    pub fn new(context: AuthorizationContext, plans: SubscriptionProvider) -> Self {
        Self { context, plans }
    }

    /// Parse a snapshot from JSON
    ///
    /// # Errors
    ///
    /// Returns error if the document is malformed
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let doc: SessionDocument = serde_json::from_str(json)?;
        let as_of = doc.as_of.unwrap_or_else(Utc::now);
        Ok(Self::new(
            doc.context,
            SubscriptionProvider::new(doc.subscription, as_of),
        ))
    }

    /// Borrow as an evaluation context backed by this snapshot's subscription
    #[must_use]
    pub fn eval_context(&self) -> EvalContext<'_> {
        EvalContext::new(&self.context, &self.plans)
    }
}
