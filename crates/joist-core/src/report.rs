//! One report shape for both "what will happen" and "what happened".

use serde::Serialize;

use crate::{
  outcome::{DeletionResult, EntityCounts, ValidationResult},
  project::ProjectId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
  Preview,
  Executed,
}

/// Flat summary of a validation or a deletion, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionReport {
  pub project_id:   ProjectId,
  pub phase:        Phase,
  /// Preview: deletion is permitted. Executed: the project is gone.
  pub success:      bool,
  pub project_name: Option<String>,
  pub message:      String,
  pub warnings:     Vec<String>,
  pub counts:       EntityCounts,
  pub failed_step:  Option<String>,
}

impl From<&ValidationResult> for DeletionReport {
  fn from(result: &ValidationResult) -> Self {
    let message = match result {
      ValidationResult::Deletable { project_name, warnings, .. } if warnings.is_empty() => {
        format!("project {project_name:?} can be deleted; nothing else references it")
      }
      ValidationResult::Deletable { project_name, .. } => {
        format!("project {project_name:?} can be deleted; review the warnings first")
      }
      other => other.reason().unwrap_or_default(),
    };

    Self {
      project_id: result.project_id(),
      phase: Phase::Preview,
      success: result.can_delete(),
      project_name: result.project_name().map(str::to_owned),
      message,
      warnings: result.warnings().to_vec(),
      counts: result.affected().cloned().unwrap_or_default(),
      failed_step: None,
    }
  }
}

impl From<&DeletionResult> for DeletionReport {
  fn from(result: &DeletionResult) -> Self {
    Self {
      project_id:   result.project_id(),
      phase:        Phase::Executed,
      success:      result.success(),
      project_name: result.project_name().map(str::to_owned),
      message:      result.message(),
      warnings:     Vec::new(),
      counts:       result.per_entity_counts().cloned().unwrap_or_default(),
      failed_step:  result.error().and_then(|e| e.step()).map(str::to_owned),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{DeletionError, graph::Entity};

  #[test]
  fn preview_of_deletable_project() {
    let id = ProjectId::new();
    let validation = ValidationResult::Deletable {
      project_id:   id,
      project_name: "Deck Build".into(),
      warnings:     vec!["2 purchases will be unlinked".into()],
      affected:     EntityCounts::from([(Entity::Purchase, 2)]),
    };

    let report = DeletionReport::from(&validation);

    assert_eq!(report.phase, Phase::Preview);
    assert!(report.success);
    assert_eq!(report.project_name.as_deref(), Some("Deck Build"));
    assert_eq!(report.warnings, ["2 purchases will be unlinked"]);
    assert_eq!(report.counts[&Entity::Purchase], 2);
    assert_eq!(report.message, "project \"Deck Build\" can be deleted; review the warnings first");
  }

  #[test]
  fn preview_of_missing_project() {
    let id = ProjectId::new();
    let report = DeletionReport::from(&ValidationResult::NotFound { project_id: id });

    assert!(!report.success);
    assert_eq!(report.message, format!("project not found: {id}"));
    assert!(report.counts.is_empty());
  }

  #[test]
  fn executed_failure_names_the_step() {
    let id = ProjectId::new();
    let result = DeletionResult::Failed {
      project_id: id,
      error:      DeletionError::ConstraintViolation {
        step:   "deleting plans".into(),
        detail: "FOREIGN KEY constraint failed".into(),
      },
    };

    let report = DeletionReport::from(&result);

    assert_eq!(report.phase, Phase::Executed);
    assert!(!report.success);
    assert_eq!(report.failed_step.as_deref(), Some("deleting plans"));
    assert!(report.counts.is_empty());
    assert_eq!(
      report.message,
      "constraint violation while deleting plans: FOREIGN KEY constraint failed"
    );
  }

  #[test]
  fn both_phases_share_a_shape() {
    let id = ProjectId::new();
    let preview = serde_json::to_value(DeletionReport::from(&ValidationResult::NotFound {
      project_id: id,
    }))
    .unwrap();
    let executed = serde_json::to_value(DeletionReport::from(&DeletionResult::Deleted {
      project_id:   id,
      project_name: "Shed".into(),
      counts:       EntityCounts::new(),
    }))
    .unwrap();

    let keys = |v: &serde_json::Value| {
      v.as_object().unwrap().keys().cloned().collect::<Vec<_>>()
    };
    assert_eq!(keys(&preview), keys(&executed));
    assert_eq!(executed["message"], "project \"Shed\" deleted");
  }
}
