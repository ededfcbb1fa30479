//! The reference graph: every table that points at a project, directly or
//! through a parent row, and what happens to those rows when the project is
//! deleted.
//!
//! The graph is declared as data in [`REFERENCE_GRAPH`]. The validator,
//! planner and executor all read it; none of them hardcode relationships.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Entities ────────────────────────────────────────────────────────────────

/// A table that references a project. The string form is the table name and
/// is used as the key in per-entity counts.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  strum::Display,
  strum::IntoStaticStr,
)]
pub enum Entity {
  #[serde(rename = "chat_sessions")]
  #[strum(serialize = "chat_sessions")]
  ChatSession,
  #[serde(rename = "documents")]
  #[strum(serialize = "documents")]
  Document,
  #[serde(rename = "purchases")]
  #[strum(serialize = "purchases")]
  Purchase,
  #[serde(rename = "plans")]
  #[strum(serialize = "plans")]
  Plan,
  #[serde(rename = "extracted_items")]
  #[strum(serialize = "extracted_items")]
  ExtractedItem,
  #[serde(rename = "doc_chunks")]
  #[strum(serialize = "doc_chunks")]
  DocChunk,
}

impl Entity {
  pub fn name(self) -> &'static str { self.into() }

  /// Human-readable noun for warnings, pluralised by `count`.
  pub fn noun(self, count: u64) -> &'static str {
    let (one, many) = match self {
      Self::ChatSession => ("chat session", "chat sessions"),
      Self::Document => ("document", "documents"),
      Self::Purchase => ("purchase", "purchases"),
      Self::Plan => ("plan", "plans"),
      Self::ExtractedItem => ("extracted item", "extracted items"),
      Self::DocChunk => ("document chunk", "document chunks"),
    };
    if count == 1 { one } else { many }
  }
}

/// What deletion of the project does to rows of an entity.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Policy {
  /// Clear the project reference; the row survives unowned.
  Unlink,
  /// Delete the row together with the project (or its deleted parent).
  Cascade,
  /// Leave the row alone; it stays attached to a parent that survives.
  Retain,
}

// ─── Edges ───────────────────────────────────────────────────────────────────

/// One referencing table and its deletion policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
  pub entity: Entity,
  pub table:  &'static str,
  /// Primary-key column, used when a child scopes itself through this table.
  pub key:    &'static str,
  /// Foreign-key column: points at the project for direct edges, at the
  /// parent's `key` for indirect ones.
  pub column: &'static str,
  pub parent: Option<Entity>,
  pub policy: Policy,
}

impl Edge {
  pub const fn direct(
    entity: Entity,
    table: &'static str,
    column: &'static str,
    policy: Policy,
  ) -> Self {
    Self { entity, table, key: "id", column, parent: None, policy }
  }

  pub const fn via(
    entity: Entity,
    table: &'static str,
    column: &'static str,
    parent: Entity,
    policy: Policy,
  ) -> Self {
    Self { entity, table, key: "id", column, parent: Some(parent), policy }
  }

  pub fn is_direct(&self) -> bool { self.parent.is_none() }
}

// ─── Graph ───────────────────────────────────────────────────────────────────

/// The fixed set of edges hanging off the project table.
#[derive(Debug)]
pub struct ReferenceGraph {
  pub root_table: &'static str,
  pub root_key:   &'static str,
  edges:          &'static [Edge],
}

/// The graph the store schema is built against.
pub static REFERENCE_GRAPH: ReferenceGraph = ReferenceGraph::new("projects", "id", &[
  Edge::direct(Entity::ChatSession, "chat_sessions", "project_id", Policy::Unlink),
  Edge::direct(Entity::Document, "documents", "project_id", Policy::Unlink),
  Edge::direct(Entity::Purchase, "purchases", "project_id", Policy::Unlink),
  Edge::direct(Entity::Plan, "plans", "project_id", Policy::Cascade),
  Edge::via(
    Entity::ExtractedItem,
    "extracted_items",
    "plan_id",
    Entity::Plan,
    Policy::Cascade,
  ),
  Edge::via(Entity::DocChunk, "doc_chunks", "document_id", Entity::Document, Policy::Retain),
]);

impl ReferenceGraph {
  pub const fn new(
    root_table: &'static str,
    root_key: &'static str,
    edges: &'static [Edge],
  ) -> Self {
    Self { root_table, root_key, edges }
  }

  /// Edges in declaration order.
  pub fn edges(&self) -> &[Edge] { self.edges }

  pub fn edge(&self, entity: Entity) -> Result<&Edge> {
    self
      .edges
      .iter()
      .find(|e| e.entity == entity)
      .ok_or(Error::MissingEntity(entity))
  }

  /// The chain of edges from `entity` up to the edge that references the
  /// project. The first element is `entity`'s own edge.
  pub fn lineage(&self, entity: Entity) -> Result<Vec<&Edge>> {
    let mut chain = vec![self.edge(entity)?];
    while let Some(parent) = chain[chain.len() - 1].parent {
      let child = chain[chain.len() - 1].entity;
      let next = self
        .edge(parent)
        .map_err(|_| Error::UnknownParent { entity: child, parent })?;
      if chain.len() >= self.edges.len() {
        return Err(Error::ParentCycle(entity));
      }
      chain.push(next);
    }
    Ok(chain)
  }

  /// Number of hops between `entity` and a direct edge.
  pub fn depth(&self, entity: Entity) -> Result<usize> {
    Ok(self.lineage(entity)?.len() - 1)
  }

  /// Every edge whose lineage passes through `entity`, excluding `entity`
  /// itself, in declaration order.
  pub fn descendants(&self, entity: Entity) -> Vec<&Edge> {
    self
      .edges
      .iter()
      .filter(|e| e.entity != entity)
      .filter(|e| {
        self
          .lineage(e.entity)
          .is_ok_and(|chain| chain.iter().any(|hop| hop.entity == entity))
      })
      .collect()
  }

  /// Verify the graph can be executed without leaving dangling references.
  pub fn check(&self) -> Result<()> {
    for (i, edge) in self.edges.iter().enumerate() {
      if self.edges[..i].iter().any(|e| e.entity == edge.entity) {
        return Err(Error::DuplicateEntity(edge.entity));
      }
    }

    for edge in self.edges {
      self.lineage(edge.entity)?;

      match (edge.policy, edge.parent) {
        (Policy::Unlink, Some(_)) => return Err(Error::IndirectUnlink(edge.entity)),
        (Policy::Retain, None) => return Err(Error::DirectRetain(edge.entity)),
        (Policy::Cascade, Some(parent)) => {
          if self.edge(parent)?.policy != Policy::Cascade {
            return Err(Error::CascadeUnderSurvivingParent {
              entity: edge.entity,
              parent,
            });
          }
        }
        (Policy::Retain, Some(parent)) => {
          if self.edge(parent)?.policy == Policy::Cascade {
            return Err(Error::RetainUnderCascadingParent {
              entity: edge.entity,
              parent,
            });
          }
        }
        (Policy::Unlink | Policy::Cascade, None) => {}
      }
    }

    Ok(())
  }
}
