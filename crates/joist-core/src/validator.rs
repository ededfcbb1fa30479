//! Read-only preflight for project deletion.

use crate::{
  graph::{Entity, Policy, ReferenceGraph},
  outcome::{EntityCounts, ValidationResult},
  project::ProjectId,
  store::EntityReader,
};

/// Work out whether `project_id` can be deleted and what the deletion would
/// touch. Issues only reads; store failures become
/// [`ValidationResult::Unavailable`].
pub fn validate<R: EntityReader>(
  reader: &R,
  graph: &ReferenceGraph,
  project_id: ProjectId,
) -> ValidationResult {
  match inspect(reader, graph, project_id) {
    Ok(result) => result,
    Err(reason) => {
      tracing::warn!(%project_id, %reason, "deletion validation failed");
      ValidationResult::Unavailable { project_id, reason }
    }
  }
}

fn inspect<R: EntityReader>(
  reader: &R,
  graph: &ReferenceGraph,
  project_id: ProjectId,
) -> Result<ValidationResult, String> {
  let Some(project_name) = reader
    .project_name(project_id)
    .map_err(|e| format!("reading project: {e}"))?
  else {
    return Ok(ValidationResult::NotFound { project_id });
  };

  let mut affected = EntityCounts::new();
  for edge in graph.edges() {
    let lineage = graph.lineage(edge.entity).map_err(|e| e.to_string())?;
    let n = reader
      .count(&lineage, project_id)
      .map_err(|e| format!("counting {}: {e}", edge.entity))?;
    affected.insert(edge.entity, n);
  }

  let warnings = warnings(graph, &affected);
  tracing::debug!(%project_id, warnings = warnings.len(), "deletion validated");

  Ok(ValidationResult::Deletable { project_id, project_name, warnings, affected })
}

/// Advisory lines for every non-zero count, in graph order.
pub fn warnings(graph: &ReferenceGraph, affected: &EntityCounts) -> Vec<String> {
  let count = |entity: Entity| affected.get(&entity).copied().unwrap_or(0);
  let mut out = Vec::new();

  for edge in graph.edges() {
    let n = count(edge.entity);
    if n == 0 {
      continue;
    }
    match edge.policy {
      Policy::Unlink => {
        out.push(format!("{n} {} will be unlinked", edge.entity.noun(n)));
      }
      // Descendant counts are folded into their root's line.
      Policy::Cascade if edge.is_direct() => {
        let mut parts = vec![format!("{n} {}", edge.entity.noun(n))];
        for child in graph.descendants(edge.entity) {
          let c = count(child.entity);
          if child.policy == Policy::Cascade && c > 0 {
            parts.push(format!("{c} {}", child.entity.noun(c)));
          }
        }
        out.push(format!("{} will be permanently removed", join_and(&parts)));
      }
      Policy::Cascade => {}
      Policy::Retain => {
        let owner = match edge.parent.and_then(|p| graph.edge(p).ok()) {
          Some(p) if p.policy == Policy::Unlink => format!("their unlinked {}", p.entity.noun(2)),
          Some(p) => format!("their {}", p.entity.noun(2)),
          None => "their owners".to_owned(),
        };
        let verb = if n == 1 { "stays" } else { "stay" };
        out.push(format!("{n} {} {verb} with {owner}", edge.entity.noun(n)));
      }
    }
  }

  out
}

fn join_and(parts: &[String]) -> String {
  match parts {
    [] => String::new(),
    [only] => only.clone(),
    [init @ .., last] => format!("{} and {last}", init.join(", ")),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    fake::{FakeStore, Owner},
    graph::REFERENCE_GRAPH,
  };

  #[test]
  fn missing_project_is_not_found() {
    let store = FakeStore::default();
    let id = ProjectId::new();

    let result = validate(&store, &REFERENCE_GRAPH, id);

    assert_eq!(result, ValidationResult::NotFound { project_id: id });
    assert!(!result.can_delete());
  }

  #[test]
  fn unreferenced_project_is_deletable_without_warnings() {
    let store = FakeStore::default();
    let id = store.project("Shed");

    let result = validate(&store, &REFERENCE_GRAPH, id);

    assert_eq!(result.exists(), Some(true));
    assert!(result.can_delete());
    assert_eq!(result.project_name(), Some("Shed"));
    assert!(result.warnings().is_empty());
    let affected = result.affected().unwrap();
    assert_eq!(affected.len(), REFERENCE_GRAPH.edges().len());
    assert!(affected.values().all(|n| *n == 0));
  }

  #[test]
  fn deck_build_warnings() {
    let store = FakeStore::default();
    let id = store.project("Deck Build");
    store.row(Entity::Purchase, Owner::Project(id));
    store.row(Entity::Purchase, Owner::Project(id));
    let doc = store.row(Entity::Document, Owner::Project(id));
    store.row(Entity::DocChunk, Owner::Row(doc));
    let plan = store.row(Entity::Plan, Owner::Project(id));
    for _ in 0..3 {
      store.row(Entity::ExtractedItem, Owner::Row(plan));
    }

    let result = validate(&store, &REFERENCE_GRAPH, id);

    assert!(result.can_delete());
    assert_eq!(result.warnings(), [
      "1 document will be unlinked",
      "2 purchases will be unlinked",
      "1 plan and 3 extracted items will be permanently removed",
      "1 document chunk stays with their unlinked documents",
    ]);
    let affected = result.affected().unwrap();
    assert_eq!(affected[&Entity::ExtractedItem], 3);
    assert_eq!(affected[&Entity::ChatSession], 0);
  }

  #[test]
  fn other_projects_rows_are_not_counted() {
    let store = FakeStore::default();
    let id = store.project("Kitchen");
    let other = store.project("Bathroom");
    let plan = store.row(Entity::Plan, Owner::Project(other));
    store.row(Entity::ExtractedItem, Owner::Row(plan));
    store.row(Entity::ChatSession, Owner::Unowned);

    let result = validate(&store, &REFERENCE_GRAPH, id);

    assert!(result.warnings().is_empty());
  }

  #[test]
  fn read_failure_is_reported_not_raised() {
    let store = FakeStore::default();
    let id = store.project("Fence");
    store.fail_on.set(Some(Entity::Plan));

    let result = validate(&store, &REFERENCE_GRAPH, id);

    assert!(matches!(result, ValidationResult::Unavailable { .. }));
    assert!(!result.can_delete());
    assert!(result.reason().unwrap().contains("counting plans"));
  }

  #[test]
  fn validation_does_not_mutate() {
    let store = FakeStore::default();
    let id = store.project("Porch");
    store.row(Entity::Purchase, Owner::Project(id));

    validate(&store, &REFERENCE_GRAPH, id);
    validate(&store, &REFERENCE_GRAPH, id);

    assert!(store.has_project(id));
    assert_eq!(store.rows_of(Entity::Purchase)[0].owner, Owner::Project(id));
  }

  #[test]
  fn join_and_forms() {
    assert_eq!(join_and(&["a".into()]), "a");
    assert_eq!(join_and(&["a".into(), "b".into()]), "a and b");
    assert_eq!(join_and(&["a".into(), "b".into(), "c".into()]), "a, b and c");
  }
}
