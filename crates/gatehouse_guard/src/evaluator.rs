//! Sequential guard chain evaluation.

use crate::error::GuardResult;
use crate::guard::{EvalContext, SharedGuard};
use crate::trace::{Decision, GuardOutcome};
use tracing::{debug, warn};

/// Evaluate a chain, recording every guard consulted
///
/// Guards are awaited one at a time, in order. The first denial ends the
/// evaluation; guards after it are never called. An empty chain allows.
///
/// # Errors
///
/// Returns the first guard error unchanged; later guards are not called
pub async fn evaluate_traced(
    guards: &[SharedGuard],
    ctx: &EvalContext<'_>,
) -> GuardResult<Decision> {
    let mut decision = Decision::vacuous();

    for guard in guards {
        let name = guard.name();
        let allowed = match guard.check(ctx).await {
            Ok(allowed) => allowed,
            Err(err) => {
                warn!(guard = %name, error = %err, "guard evaluation failed");
                return Err(err);
            }
        };

        debug!(guard = %name, allowed, "guard evaluated");
        decision.record(GuardOutcome::new(name, allowed));

        if !allowed {
            break;
        }
    }

    Ok(decision)
}

/// Evaluate a chain to a yes/no answer
///
/// # Errors
///
/// Returns the first guard error unchanged
pub async fn evaluate(guards: &[SharedGuard], ctx: &EvalContext<'_>) -> GuardResult<bool> {
    Ok(evaluate_traced(guards, ctx).await?.allowed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::or;
    use crate::error::GuardError;
    use crate::guard::FnGuard;
    use crate::leaf::{admin, company_settings, owner};
    use crate::provider::SubscriptionProvider;
    use gatehouse_core::{
        AuthorizationContext, CompanyUser, FieldSet, SettingsLevel, Subscription,
    };
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(result: GuardResult<bool>, calls: &Arc<AtomicUsize>) -> SharedGuard {
        let calls = Arc::clone(calls);
        FnGuard::new("counting", FieldSet::new(), move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            result.clone()
        })
        .shared()
    }

    fn block_on<F: std::future::Future>(fut: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(fut)
    }

    #[tokio::test]
    async fn test_empty_chain_allows() {
        let auth = AuthorizationContext::new();
        let sub = SubscriptionProvider::current(Subscription::none());
        let ctx = EvalContext::new(&auth, &sub);
        assert!(evaluate(&[], &ctx).await.unwrap());
    }

    #[tokio::test]
    async fn test_admin_in_company_settings() {
        let sub = SubscriptionProvider::current(Subscription::none());
        let chain = vec![admin(), company_settings()];

        let auth = AuthorizationContext::new()
            .with_company_user(CompanyUser::new().with_admin(true))
            .with_settings_level(SettingsLevel::Company);
        assert!(evaluate(&chain, &EvalContext::new(&auth, &sub)).await.unwrap());

        let auth = auth.with_settings_level(SettingsLevel::Account);
        assert!(!evaluate(&chain, &EvalContext::new(&auth, &sub)).await.unwrap());
    }

    #[tokio::test]
    async fn test_owner_passes_admin_or_owner() {
        let sub = SubscriptionProvider::current(Subscription::none());
        let auth = AuthorizationContext::new()
            .with_company_user(CompanyUser::new().with_admin(false).with_owner(true));
        let chain = vec![or(vec![admin(), owner()])];
        assert!(evaluate(&chain, &EvalContext::new(&auth, &sub)).await.unwrap());
    }

    #[tokio::test]
    async fn test_stops_at_first_denial() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = vec![
            counting(Ok(true), &calls),
            counting(Ok(false), &calls),
            counting(Ok(true), &calls),
        ];
        let auth = AuthorizationContext::new();
        let sub = SubscriptionProvider::current(Subscription::none());

        let decision = evaluate_traced(&chain, &EvalContext::new(&auth, &sub))
            .await
            .unwrap();
        assert!(!decision.allowed);
        assert_eq!(decision.checks(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_error_propagates_unchanged() {
        let calls = Arc::new(AtomicUsize::new(0));
        let failure = GuardError::upstream("session", "token refresh failed");
        let chain = vec![
            counting(Ok(true), &calls),
            counting(Err(failure.clone()), &calls),
            counting(Ok(true), &calls),
        ];
        let auth = AuthorizationContext::new();
        let sub = SubscriptionProvider::current(Subscription::none());

        let err = evaluate(&chain, &EvalContext::new(&auth, &sub))
            .await
            .unwrap_err();
        assert_eq!(err, failure);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_evaluation_is_repeatable() {
        let auth = AuthorizationContext::new()
            .with_company_user(CompanyUser::new().with_owner(true));
        let sub = SubscriptionProvider::current(Subscription::none());
        let chain = vec![owner(), admin()];
        let ctx = EvalContext::new(&auth, &sub);

        let first = evaluate_traced(&chain, &ctx).await.unwrap();
        let second = evaluate_traced(&chain, &ctx).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.deciding_guard(), Some("admin"));
    }

    proptest! {
        #[test]
        fn prop_chain_calls_up_to_first_denial(results in proptest::collection::vec(any::<bool>(), 0..12)) {
            let calls = Arc::new(AtomicUsize::new(0));
            let chain: Vec<_> = results.iter().map(|r| counting(Ok(*r), &calls)).collect();
            let auth = AuthorizationContext::new();
            let sub = SubscriptionProvider::current(Subscription::none());

            let allowed = block_on(evaluate(&chain, &EvalContext::new(&auth, &sub))).unwrap();

            let expected_calls = results
                .iter()
                .position(|r| !r)
                .map_or(results.len(), |i| i + 1);
            prop_assert_eq!(allowed, results.iter().all(|r| *r));
            prop_assert_eq!(calls.load(Ordering::SeqCst), expected_calls);
        }
    }
}
