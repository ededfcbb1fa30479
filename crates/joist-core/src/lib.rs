//! Core types and deletion logic for the Joist project backend.
//!
//! This crate is deliberately free of HTTP and database dependencies. Storage
//! backends implement the traits in [`store`]; the deletion pipeline
//! ([`validator`] → [`planner`] → [`executor`] → [`report`]) is driven by the
//! static [`graph::REFERENCE_GRAPH`].

pub mod error;
pub mod executor;
pub mod graph;
pub mod outcome;
pub mod planner;
pub mod project;
pub mod report;
pub mod store;
pub mod validator;

pub use error::{DeletionError, Error, Result};

#[cfg(test)]
mod fake;
