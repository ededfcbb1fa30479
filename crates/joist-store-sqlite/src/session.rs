//! [`EntityReader`] / [`EntityWriter`] over a borrowed SQLite connection.
//!
//! A session is always built on an open transaction; it never begins,
//! commits or rolls back itself.

use joist_core::{
  graph::{Edge, ReferenceGraph},
  project::ProjectId,
  store::{EntityReader, EntityWriter},
};
use rusqlite::{Connection, OptionalExtension as _};

use crate::encode::encode_id;

pub struct Session<'c> {
  conn:  &'c Connection,
  graph: &'c ReferenceGraph,
}

impl<'c> Session<'c> {
  pub fn new(conn: &'c Connection, graph: &'c ReferenceGraph) -> Self { Self { conn, graph } }
}

/// `WHERE` predicate selecting rows of `lineage[0]` that belong to the
/// project bound as `?1`, nesting one sub-select per hop.
///
/// Identifiers come from the static reference graph, never from input.
fn scope_clause(lineage: &[&Edge]) -> String {
  match lineage {
    [] => "0".to_owned(),
    [direct] => format!("{} = ?1", direct.column),
    [edge, rest @ ..] => {
      let parent = rest[0];
      format!(
        "{} IN (SELECT {} FROM {} WHERE {})",
        edge.column,
        parent.key,
        parent.table,
        scope_clause(rest)
      )
    }
  }
}

impl EntityReader for Session<'_> {
  type Error = rusqlite::Error;

  fn project_name(&self, id: ProjectId) -> rusqlite::Result<Option<String>> {
    let sql = format!(
      "SELECT name FROM {} WHERE {} = ?1",
      self.graph.root_table, self.graph.root_key
    );
    self
      .conn
      .query_row(&sql, rusqlite::params![encode_id(id)], |r| r.get(0))
      .optional()
  }

  fn count(&self, lineage: &[&Edge], id: ProjectId) -> rusqlite::Result<u64> {
    let sql = format!(
      "SELECT COUNT(*) FROM {} WHERE {}",
      lineage[0].table,
      scope_clause(lineage)
    );
    let n: i64 =
      self.conn.query_row(&sql, rusqlite::params![encode_id(id)], |r| r.get(0))?;
    Ok(n as u64)
  }
}

impl EntityWriter for Session<'_> {
  fn unlink(&self, edge: &Edge, id: ProjectId) -> rusqlite::Result<u64> {
    let sql = format!(
      "UPDATE {table} SET {col} = NULL WHERE {col} = ?1",
      table = edge.table,
      col = edge.column
    );
    let n = self.conn.execute(&sql, rusqlite::params![encode_id(id)])?;
    Ok(n as u64)
  }

  fn delete(&self, lineage: &[&Edge], id: ProjectId) -> rusqlite::Result<u64> {
    let sql = format!(
      "DELETE FROM {} WHERE {}",
      lineage[0].table,
      scope_clause(lineage)
    );
    let n = self.conn.execute(&sql, rusqlite::params![encode_id(id)])?;
    Ok(n as u64)
  }

  fn delete_project(&self, id: ProjectId) -> rusqlite::Result<u64> {
    let sql = format!(
      "DELETE FROM {} WHERE {} = ?1",
      self.graph.root_table, self.graph.root_key
    );
    let n = self.conn.execute(&sql, rusqlite::params![encode_id(id)])?;
    Ok(n as u64)
  }
}
