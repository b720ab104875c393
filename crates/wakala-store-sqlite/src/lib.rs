//! [`SqliteStore`]: the `WorkflowStore` implementation on SQLite.
//!
//! A single [`tokio_rusqlite`] connection serialises access on its own thread.
//! Multi-step writes (rate-limited inserts, guarded agency commits with their
//! notifications) each run in one `BEGIN IMMEDIATE` transaction.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
