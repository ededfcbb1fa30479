//! Orders the work of deleting a project.
//!
//! Unlinks come first, then cascades deepest-first so a child is always gone
//! before its parent, and the project row is removed last. Planning is pure:
//! it reads only the [`ReferenceGraph`].

use std::fmt;

use serde::Serialize;

use crate::{
  Result,
  graph::{Entity, Policy, ReferenceGraph},
  project::ProjectId,
};

/// One step of a deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "op", content = "entity", rename_all = "snake_case")]
pub enum Operation {
  /// Clear the project reference on every row of the entity.
  Unlink(Entity),
  /// Delete every row of the entity scoped to the project through its
  /// lineage.
  Cascade(Entity),
  /// Delete the project row itself.
  DeleteProject,
}

impl Operation {
  pub fn entity(&self) -> Option<Entity> {
    match self {
      Self::Unlink(e) | Self::Cascade(e) => Some(*e),
      Self::DeleteProject => None,
    }
  }
}

impl fmt::Display for Operation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Unlink(e) => write!(f, "unlinking {e}"),
      Self::Cascade(e) => write!(f, "deleting {e}"),
      Self::DeleteProject => f.write_str("deleting project row"),
    }
  }
}

/// The ordered operations for deleting one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionPlan {
  pub project_id: ProjectId,
  pub operations: Vec<Operation>,
}

impl DeletionPlan {
  pub fn iter(&self) -> impl Iterator<Item = &Operation> { self.operations.iter() }
}

/// Build the deletion plan for `project_id`.
pub fn plan(graph: &ReferenceGraph, project_id: ProjectId) -> Result<DeletionPlan> {
  graph.check()?;

  let mut operations: Vec<Operation> = graph
    .edges()
    .iter()
    .filter(|e| e.policy == Policy::Unlink)
    .map(|e| Operation::Unlink(e.entity))
    .collect();

  let mut cascades = graph
    .edges()
    .iter()
    .enumerate()
    .filter(|(_, e)| e.policy == Policy::Cascade)
    .map(|(position, e)| Ok((graph.depth(e.entity)?, position, e.entity)))
    .collect::<Result<Vec<_>>>()?;
  // Deepest first; declaration order breaks ties.
  cascades.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
  operations.extend(cascades.into_iter().map(|(_, _, entity)| Operation::Cascade(entity)));

  operations.push(Operation::DeleteProject);

  Ok(DeletionPlan { project_id, operations })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::graph::{Edge, REFERENCE_GRAPH};

  #[test]
  fn builtin_plan_order() {
    let id = ProjectId::new();
    let plan = plan(&REFERENCE_GRAPH, id).unwrap();

    assert_eq!(plan.project_id, id);
    assert_eq!(plan.operations, [
      Operation::Unlink(Entity::ChatSession),
      Operation::Unlink(Entity::Document),
      Operation::Unlink(Entity::Purchase),
      Operation::Cascade(Entity::ExtractedItem),
      Operation::Cascade(Entity::Plan),
      Operation::DeleteProject,
    ]);
  }

  #[test]
  fn retained_entities_get_no_operation() {
    let plan = plan(&REFERENCE_GRAPH, ProjectId::new()).unwrap();
    assert!(plan.iter().all(|op| op.entity() != Some(Entity::DocChunk)));
  }

  #[test]
  fn plan_is_deterministic() {
    let id = ProjectId::new();
    assert_eq!(plan(&REFERENCE_GRAPH, id).unwrap(), plan(&REFERENCE_GRAPH, id).unwrap());
  }

  #[test]
  fn children_precede_parents_regardless_of_declaration_order() {
    // Child declared before parent, and a grandchild at depth two.
    static EDGES: [Edge; 3] = [
      Edge::via(Entity::DocChunk, "doc_chunks", "item_id", Entity::ExtractedItem, Policy::Cascade),
      Edge::via(
        Entity::ExtractedItem,
        "extracted_items",
        "plan_id",
        Entity::Plan,
        Policy::Cascade,
      ),
      Edge::direct(Entity::Plan, "plans", "project_id", Policy::Cascade),
    ];
    let graph = ReferenceGraph::new("projects", "id", &EDGES);

    let plan = plan(&graph, ProjectId::new()).unwrap();
    assert_eq!(plan.operations, [
      Operation::Cascade(Entity::DocChunk),
      Operation::Cascade(Entity::ExtractedItem),
      Operation::Cascade(Entity::Plan),
      Operation::DeleteProject,
    ]);
  }

  #[test]
  fn empty_graph_only_deletes_the_project() {
    let graph = ReferenceGraph::new("projects", "id", &[]);
    let plan = plan(&graph, ProjectId::new()).unwrap();
    assert_eq!(plan.operations, [Operation::DeleteProject]);
  }

  #[test]
  fn malformed_graph_cannot_be_planned() {
    static EDGES: [Edge; 1] =
      [Edge::direct(Entity::Purchase, "purchases", "project_id", Policy::Retain)];
    let graph = ReferenceGraph::new("projects", "id", &EDGES);
    assert!(plan(&graph, ProjectId::new()).is_err());
  }

  #[test]
  fn operations_describe_themselves() {
    assert_eq!(Operation::Unlink(Entity::Purchase).to_string(), "unlinking purchases");
    assert_eq!(Operation::Cascade(Entity::Plan).to_string(), "deleting plans");
    assert_eq!(Operation::DeleteProject.to_string(), "deleting project row");
  }
}
