//! JSON REST API for Joist.
//!
//! Exposes an axum [`Router`] backed by any [`joist_core::store::ProjectStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", joist_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod projects;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use joist_core::store::ProjectStore;
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Server configuration, read from `config.toml` and `JOIST_*` variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:            String,
  #[serde(default = "default_port")]
  pub port:            u16,
  pub store_path:      PathBuf,
  /// How long a deletion waits on another writer before giving up.
  #[serde(default = "default_busy_timeout_ms")]
  pub busy_timeout_ms: u64,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8420 }

fn default_busy_timeout_ms() -> u64 { 5_000 }

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ProjectStore + 'static,
{
  Router::new()
    .route("/projects", get(projects::list::<S>).post(projects::create::<S>))
    .route(
      "/projects/{id}",
      get(projects::get_one::<S>).delete(projects::delete_one::<S>),
    )
    .route("/projects/{id}/deletion", get(projects::preview_deletion::<S>))
    .with_state(store)
}
