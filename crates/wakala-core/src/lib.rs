//! Domain model and workflow engines for Wakala, a power-of-attorney
//! platform: users request agencies from lawyers, lawyers route them to
//! representatives for registration, and lawyers run court issues under the
//! agencies that end up in force.
//!
//! Persistence is reached only through [`store::WorkflowStore`]; HTTP, SQL and
//! crypto live in sibling crates.

pub mod actor;
pub mod agency;
pub mod authorization;
pub mod error;
pub mod issue;
pub mod notification;
pub mod store;
pub mod workflow;

use chrono::{DateTime, SubsecRound, Utc};

pub use error::{Error, ErrorKind, Result};
pub use workflow::{Workflow, WorkflowConfig};

/// The current time, at the microsecond precision timestamps are stored with.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }
