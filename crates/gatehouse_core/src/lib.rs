//! GATEHOUSE Core Types
//!
//! This crate contains pure types and logic with no I/O.
//! Everything a guard may read about a session lives here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod error;
pub mod field;
pub mod module;
pub mod permission;
pub mod plan;

// Re-exports
pub use context::{AuthorizationContext, CompanyUser, SettingsLevel};
pub use error::{CoreError, CoreResult};
pub use field::{ContextField, FieldSet};
pub use module::{Module, ModuleSet};
pub use permission::{Permission, PermissionAction, PermissionSet};
pub use plan::{PlanTier, Subscription};
