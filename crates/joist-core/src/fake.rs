//! In-memory entity store for exercising the validator and executor.

use std::{
  cell::{Cell, RefCell},
  collections::BTreeMap,
};

use crate::{
  graph::{Edge, Entity},
  project::ProjectId,
  store::{EntityReader, EntityWriter},
};

#[derive(Debug, thiserror::Error)]
#[error("fake store failure: {0}")]
pub struct FakeError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
  Project(ProjectId),
  Row(u64),
  Unowned,
}

#[derive(Debug, Clone)]
pub struct FakeRow {
  pub entity: Entity,
  pub id:     u64,
  pub owner:  Owner,
}

#[derive(Default)]
pub struct FakeStore {
  projects: RefCell<BTreeMap<ProjectId, String>>,
  rows:     RefCell<Vec<FakeRow>>,
  next_id:  Cell<u64>,
  /// Any read or write touching this entity fails.
  pub fail_on:        Cell<Option<Entity>>,
  pub fail_lookup:    Cell<bool>,
  /// The project row disappears just before the executor deletes it.
  pub vanish_project: Cell<bool>,
}

impl FakeStore {
  pub fn project(&self, name: &str) -> ProjectId {
    let id = ProjectId::new();
    self.projects.borrow_mut().insert(id, name.to_owned());
    id
  }

  pub fn has_project(&self, id: ProjectId) -> bool {
    self.projects.borrow().contains_key(&id)
  }

  pub fn row(&self, entity: Entity, owner: Owner) -> u64 {
    let id = self.next_id.get() + 1;
    self.next_id.set(id);
    self.rows.borrow_mut().push(FakeRow { entity, id, owner });
    id
  }

  pub fn rows_of(&self, entity: Entity) -> Vec<FakeRow> {
    self.rows.borrow().iter().filter(|r| r.entity == entity).cloned().collect()
  }

  fn guard(&self, entity: Entity) -> Result<(), FakeError> {
    if self.fail_on.get() == Some(entity) {
      return Err(FakeError(format!("{entity} unavailable")));
    }
    Ok(())
  }
}

fn in_scope(rows: &[FakeRow], row: &FakeRow, lineage: &[&Edge], id: ProjectId) -> bool {
  let Some((edge, rest)) = lineage.split_first() else {
    return false;
  };
  if row.entity != edge.entity {
    return false;
  }
  match row.owner {
    Owner::Project(p) => rest.is_empty() && p == id,
    Owner::Row(parent) => rows
      .iter()
      .any(|r| r.id == parent && in_scope(rows, r, rest, id)),
    Owner::Unowned => false,
  }
}

impl EntityReader for FakeStore {
  type Error = FakeError;

  fn project_name(&self, id: ProjectId) -> Result<Option<String>, FakeError> {
    if self.fail_lookup.get() {
      return Err(FakeError("projects unavailable".into()));
    }
    Ok(self.projects.borrow().get(&id).cloned())
  }

  fn count(&self, lineage: &[&Edge], id: ProjectId) -> Result<u64, FakeError> {
    self.guard(lineage[0].entity)?;
    let rows = self.rows.borrow();
    Ok(rows.iter().filter(|r| in_scope(&rows, r, lineage, id)).count() as u64)
  }
}

impl EntityWriter for FakeStore {
  fn unlink(&self, edge: &Edge, id: ProjectId) -> Result<u64, FakeError> {
    self.guard(edge.entity)?;
    let mut n = 0;
    for row in self.rows.borrow_mut().iter_mut() {
      if row.entity == edge.entity && row.owner == Owner::Project(id) {
        row.owner = Owner::Unowned;
        n += 1;
      }
    }
    Ok(n)
  }

  fn delete(&self, lineage: &[&Edge], id: ProjectId) -> Result<u64, FakeError> {
    self.guard(lineage[0].entity)?;
    let doomed: Vec<u64> = {
      let rows = self.rows.borrow();
      rows
        .iter()
        .filter(|r| in_scope(&rows, r, lineage, id))
        .map(|r| r.id)
        .collect()
    };
    self.rows.borrow_mut().retain(|r| !doomed.contains(&r.id));
    Ok(doomed.len() as u64)
  }

  fn delete_project(&self, id: ProjectId) -> Result<u64, FakeError> {
    let removed = self.projects.borrow_mut().remove(&id).is_some();
    if self.vanish_project.get() {
      return Ok(0);
    }
    Ok(u64::from(removed))
  }
}
