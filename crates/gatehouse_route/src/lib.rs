//! GATEHOUSE Route Table
//!
//! Binds guard chains to path patterns and turns guard decisions into
//! routing outcomes: render, redirect, or error.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod matcher;
pub mod outcome;
pub mod spec;
pub mod table;

pub use config::RouterConfig;
pub use error::{RouteError, RouteResult};
pub use matcher::{PathParams, PathPattern, Specificity};
pub use outcome::RouteOutcome;
pub use spec::{RouteSpec, RouteTableSpec};
pub use table::{Route, RouteTable};
