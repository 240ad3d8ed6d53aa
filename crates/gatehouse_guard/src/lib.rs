//! GATEHOUSE Guard Engine
//!
//! Asynchronous authorization predicates and their composition.
//! A chain of guards is evaluated in order and stops at the first denial;
//! errors are propagated, never read as a denial.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod combinator;
pub mod error;
pub mod evaluator;
pub mod guard;
pub mod leaf;
pub mod provider;
pub mod session;
pub mod spec;
pub mod trace;

pub use combinator::{all, not, or, All, Not, Or};
pub use error::{GuardError, GuardResult};
pub use evaluator::{evaluate, evaluate_traced};
pub use guard::{EvalContext, FnGuard, Guard, GuardChain, SharedGuard};
pub use leaf::{admin, authenticated, company_settings, enabled, owner, permission, plan};
pub use provider::{PlanProvider, SubscriptionProvider, UnavailablePlanProvider};
pub use session::SessionSnapshot;
pub use spec::{GuardCompiler, GuardSpec};
pub use trace::{Decision, GuardOutcome};
