//! Error types for `joist-core`.

use serde::Serialize;
use thiserror::Error;

use crate::{graph::Entity, project::ProjectId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("unknown project status: {0:?}")]
  UnknownStatus(String),

  #[error("{0} appears more than once in the reference graph")]
  DuplicateEntity(Entity),

  #[error("{0} is not in the reference graph")]
  MissingEntity(Entity),

  #[error("{entity} names parent {parent}, which is not in the reference graph")]
  UnknownParent { entity: Entity, parent: Entity },

  #[error("{0} is part of a parent cycle")]
  ParentCycle(Entity),

  /// Unlinking clears a project reference, so it only applies to direct
  /// edges.
  #[error("{0} is unlinked but does not reference the project directly")]
  IndirectUnlink(Entity),

  #[error("{entity} cascades but its parent {parent} survives deletion")]
  CascadeUnderSurvivingParent { entity: Entity, parent: Entity },

  #[error("{0} is retained but references the project directly")]
  DirectRetain(Entity),

  #[error("{entity} is retained but its parent {parent} is deleted")]
  RetainUnderCascadingParent { entity: Entity, parent: Entity },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why a deletion did not happen.
///
/// Every variant implies the transaction was rolled back and the store is
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeletionError {
  #[error("project not found: {project_id}")]
  NotFound { project_id: ProjectId },

  #[error("constraint violation while {step}: {detail}")]
  ConstraintViolation { step: String, detail: String },

  #[error("transaction failed{}: {detail}", while_step(.step))]
  TransactionFailure { step: Option<String>, detail: String },
}

fn while_step(step: &Option<String>) -> String {
  step.as_deref().map(|s| format!(" while {s}")).unwrap_or_default()
}

impl DeletionError {
  /// The step that failed, if the failure happened inside the plan.
  pub fn step(&self) -> Option<&str> {
    match self {
      Self::NotFound { .. } => None,
      Self::ConstraintViolation { step, .. } => Some(step),
      Self::TransactionFailure { step, .. } => step.as_deref(),
    }
  }

  pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound { .. }) }
}
