//! SQLite backend for the Joist project store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Deletions run the core executor inside
//! a single `BEGIN IMMEDIATE` transaction.

mod encode;
mod schema;
mod session;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
