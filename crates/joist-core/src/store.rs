//! Storage seams.
//!
//! [`ProjectStore`] is the async trait higher layers (`joist-api`) depend on.
//! [`EntityReader`] and [`EntityWriter`] are the synchronous primitives the
//! validator and executor run against; a backend implements them over an
//! open transaction, so everything one call does shares that transaction.

use std::future::Future;

use crate::{
  graph::Edge,
  outcome::{DeletionResult, ValidationResult},
  project::{NewProject, Project, ProjectId},
};

// ─── Transaction-scoped primitives ───────────────────────────────────────────

/// Read access to the project table and every referencing table.
///
/// A `lineage` is the chain returned by
/// [`ReferenceGraph::lineage`](crate::graph::ReferenceGraph::lineage): the
/// target entity's edge first, the edge that references the project last.
pub trait EntityReader {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The project's name, or `None` if the row does not exist.
  fn project_name(&self, id: ProjectId) -> Result<Option<String>, Self::Error>;

  /// Count rows of `lineage[0]` that belong to the project through the chain.
  fn count(&self, lineage: &[&Edge], id: ProjectId) -> Result<u64, Self::Error>;
}

/// Mutating primitives used only by the deletion executor.
pub trait EntityWriter: EntityReader {
  /// Set `edge.column` to NULL wherever it references the project. Returns
  /// the number of rows updated.
  fn unlink(&self, edge: &Edge, id: ProjectId) -> Result<u64, Self::Error>;

  /// Delete rows of `lineage[0]` that belong to the project through the chain.
  fn delete(&self, lineage: &[&Edge], id: ProjectId) -> Result<u64, Self::Error>;

  /// Delete the project row. Returns 0 if it was already gone.
  fn delete_project(&self, id: ProjectId) -> Result<u64, Self::Error>;
}

// ─── Async store ─────────────────────────────────────────────────────────────

/// Abstraction over a Joist project store backend.
///
/// The two deletion methods never fail at the type level: store faults are
/// folded into [`ValidationResult`] and [`DeletionResult`].
pub trait ProjectStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create and persist a new project.
  fn add_project(
    &self,
    input: NewProject,
  ) -> impl Future<Output = Result<Project, Self::Error>> + Send + '_;

  /// Retrieve a project by id. Returns `None` if not found.
  fn get_project(
    &self,
    id: ProjectId,
  ) -> impl Future<Output = Result<Option<Project>, Self::Error>> + Send + '_;

  /// List all projects, oldest first.
  fn list_projects(
    &self,
  ) -> impl Future<Output = Result<Vec<Project>, Self::Error>> + Send + '_;

  /// Report what deleting the project would do, without changing anything.
  fn validate_deletion(
    &self,
    id: ProjectId,
  ) -> impl Future<Output = ValidationResult> + Send + '_;

  /// Delete the project and resolve every reference to it, atomically.
  fn delete_project(
    &self,
    id: ProjectId,
  ) -> impl Future<Output = DeletionResult> + Send + '_;
}
