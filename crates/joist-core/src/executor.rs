//! Runs a [`DeletionPlan`] against an [`EntityWriter`].
//!
//! The executor does not own the transaction. The backend opens one, hands a
//! writer over it to [`execute`], commits on `Ok` and rolls back on `Err`, so
//! a failed step never leaves partial work behind.

use crate::{
  DeletionError,
  graph::ReferenceGraph,
  outcome::EntityCounts,
  planner::{DeletionPlan, Operation},
  project::ProjectId,
  store::EntityWriter,
};

/// A plan that ran to the end; safe to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Executed {
  pub project_name: String,
  pub counts:       EntityCounts,
}

#[derive(Debug, thiserror::Error)]
pub enum ExecutionError<E> {
  #[error("project not found: {0}")]
  NotFound(ProjectId),

  #[error("reading project failed: {0}")]
  Lookup(#[source] E),

  #[error("{operation} failed: {source}")]
  Step {
    operation: Operation,
    #[source]
    source:    E,
  },

  #[error(transparent)]
  Graph(#[from] crate::Error),
}

impl<E: std::error::Error> ExecutionError<E> {
  /// Fold into the public taxonomy. `is_contention` tells lock and busy
  /// failures apart from statement failures.
  pub fn into_deletion_error(
    self,
    project_id: ProjectId,
    is_contention: impl FnOnce(&E) -> bool,
  ) -> DeletionError {
    match self {
      Self::NotFound(_) => DeletionError::NotFound { project_id },
      Self::Lookup(e) => DeletionError::TransactionFailure {
        step:   Some("reading project".into()),
        detail: e.to_string(),
      },
      Self::Step { operation, source } if is_contention(&source) => {
        DeletionError::TransactionFailure {
          step:   Some(operation.to_string()),
          detail: source.to_string(),
        }
      }
      Self::Step { operation, source } => DeletionError::ConstraintViolation {
        step:   operation.to_string(),
        detail: source.to_string(),
      },
      Self::Graph(e) => DeletionError::ConstraintViolation {
        step:   "planning".into(),
        detail: e.to_string(),
      },
    }
  }
}

/// Apply every operation of `plan` in order.
///
/// The project name is read before anything changes. The final
/// [`Operation::DeleteProject`] must remove exactly one row; if the project
/// vanished mid-flight (a concurrent delete won) the result is
/// [`ExecutionError::NotFound`] and the caller must roll back.
pub fn execute<W: EntityWriter>(
  writer: &W,
  graph: &ReferenceGraph,
  plan: &DeletionPlan,
) -> Result<Executed, ExecutionError<W::Error>> {
  let id = plan.project_id;

  let project_name = writer
    .project_name(id)
    .map_err(ExecutionError::Lookup)?
    .ok_or(ExecutionError::NotFound(id))?;

  let mut counts = EntityCounts::new();
  for &operation in plan.iter() {
    let step = |source| ExecutionError::Step { operation, source };
    match operation {
      Operation::Unlink(entity) => {
        let n = writer.unlink(graph.edge(entity)?, id).map_err(step)?;
        counts.insert(entity, n);
      }
      Operation::Cascade(entity) => {
        let lineage = graph.lineage(entity)?;
        let n = writer.delete(&lineage, id).map_err(step)?;
        counts.insert(entity, n);
      }
      Operation::DeleteProject => {
        if writer.delete_project(id).map_err(step)? == 0 {
          return Err(ExecutionError::NotFound(id));
        }
      }
    }
    tracing::debug!(project_id = %id, step = %operation, "deletion step applied");
  }

  Ok(Executed { project_name, counts })
}
