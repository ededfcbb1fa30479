//! Tagged results of the two deletion operations.
//!
//! Both are enums so a failure cannot be mistaken for success by skipping a
//! field check. The accessors give the flat view callers usually want.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{DeletionError, graph::Entity, project::ProjectId};

/// Rows affected per entity, ordered by [`Entity`]'s variant order (not by
/// the position of its edge in a graph).
pub type EntityCounts = BTreeMap<Entity, u64>;

// ─── Validation ──────────────────────────────────────────────────────────────

/// What deleting a project would do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationResult {
  Deletable {
    project_id:   ProjectId,
    project_name: String,
    warnings:     Vec<String>,
    /// Rows that would be unlinked, removed or left in place, per entity.
    affected:     EntityCounts,
  },
  NotFound {
    project_id: ProjectId,
  },
  /// The store could not be read; nothing is known about the project.
  Unavailable {
    project_id: ProjectId,
    reason:     String,
  },
}

impl ValidationResult {
  pub fn project_id(&self) -> ProjectId {
    match self {
      Self::Deletable { project_id, .. }
      | Self::NotFound { project_id }
      | Self::Unavailable { project_id, .. } => *project_id,
    }
  }

  /// Whether the project row exists; `None` when the store could not be
  /// read, so a fault is never mistaken for an absent project.
  pub fn exists(&self) -> Option<bool> {
    match self {
      Self::Deletable { .. } => Some(true),
      Self::NotFound { .. } => Some(false),
      Self::Unavailable { .. } => None,
    }
  }

  pub fn can_delete(&self) -> bool { matches!(self, Self::Deletable { .. }) }

  pub fn project_name(&self) -> Option<&str> {
    match self {
      Self::Deletable { project_name, .. } => Some(project_name),
      _ => None,
    }
  }

  pub fn warnings(&self) -> &[String] {
    match self {
      Self::Deletable { warnings, .. } => warnings,
      _ => &[],
    }
  }

  pub fn affected(&self) -> Option<&EntityCounts> {
    match self {
      Self::Deletable { affected, .. } => Some(affected),
      _ => None,
    }
  }

  /// Why deletion is not possible, if it is not.
  pub fn reason(&self) -> Option<String> {
    match self {
      Self::Deletable { .. } => None,
      Self::NotFound { project_id } => Some(format!("project not found: {project_id}")),
      Self::Unavailable { reason, .. } => Some(reason.clone()),
    }
  }
}

// ─── Deletion ────────────────────────────────────────────────────────────────

/// What a deletion attempt did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeletionResult {
  Deleted {
    project_id:   ProjectId,
    /// Captured before the row was removed.
    project_name: String,
    counts:       EntityCounts,
  },
  Failed {
    project_id: ProjectId,
    error:      DeletionError,
  },
}

impl DeletionResult {
  pub fn project_id(&self) -> ProjectId {
    match self {
      Self::Deleted { project_id, .. } | Self::Failed { project_id, .. } => *project_id,
    }
  }

  pub fn success(&self) -> bool { matches!(self, Self::Deleted { .. }) }

  pub fn project_name(&self) -> Option<&str> {
    match self {
      Self::Deleted { project_name, .. } => Some(project_name),
      Self::Failed { .. } => None,
    }
  }

  /// Per-entity counts; present only on success.
  pub fn per_entity_counts(&self) -> Option<&EntityCounts> {
    match self {
      Self::Deleted { counts, .. } => Some(counts),
      Self::Failed { .. } => None,
    }
  }

  pub fn error(&self) -> Option<&DeletionError> {
    match self {
      Self::Deleted { .. } => None,
      Self::Failed { error, .. } => Some(error),
    }
  }

  pub fn message(&self) -> String {
    match self {
      Self::Deleted { project_name, .. } => {
        format!("project {project_name:?} deleted")
      }
      Self::Failed { error, .. } => error.to_string(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn failed_deletion_exposes_no_counts() {
    let id = ProjectId::new();
    let result = DeletionResult::Failed {
      project_id: id,
      error:      DeletionError::NotFound { project_id: id },
    };
    assert!(!result.success());
    assert!(result.per_entity_counts().is_none());
    assert_eq!(result.message(), format!("project not found: {id}"));
  }

  #[test]
  fn counts_serialize_by_table_name() {
    let id = ProjectId::new();
    let result = DeletionResult::Deleted {
      project_id:   id,
      project_name: "Deck Build".into(),
      counts:       EntityCounts::from([(Entity::Plan, 1), (Entity::Purchase, 2)]),
    };

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["status"], "deleted");
    assert_eq!(json["counts"]["plans"], 1);
    assert_eq!(json["counts"]["purchases"], 2);
  }

  #[test]
  fn not_found_validation_cannot_delete() {
    let result = ValidationResult::NotFound { project_id: ProjectId::new() };
    assert_eq!(result.exists(), Some(false));
    assert!(!result.can_delete());
    assert!(result.warnings().is_empty());
    assert!(result.reason().unwrap().starts_with("project not found"));
  }

  #[test]
  fn unavailable_validation_does_not_claim_absence() {
    let result = ValidationResult::Unavailable {
      project_id: ProjectId::new(),
      reason:     "database is locked".into(),
    };
    assert_eq!(result.exists(), None);
    assert!(!result.can_delete());
    assert_eq!(result.reason().as_deref(), Some("database is locked"));
  }
}
