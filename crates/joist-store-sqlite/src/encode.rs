//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, ids are hyphenated lowercase UUIDs, and
//! project status is its snake_case name.

use chrono::{DateTime, Utc};
use joist_core::project::{Project, ProjectId, ProjectStatus};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Ids ──────────────────────────────────────────────────────────────────────

pub fn encode_id(id: ProjectId) -> String { id.to_string() }

pub fn decode_id(s: &str) -> Result<ProjectId> {
  Ok(ProjectId::from_uuid(Uuid::parse_str(s)?))
}

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawProject::from_row`].
pub const PROJECT_COLUMNS: &str =
  "id, name, client_name, status, created_at, updated_at";

/// Raw strings read directly from a `projects` row.
pub struct RawProject {
  pub id:          String,
  pub name:        String,
  pub client_name: Option<String>,
  pub status:      String,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawProject {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      name:        row.get(1)?,
      client_name: row.get(2)?,
      status:      row.get(3)?,
      created_at:  row.get(4)?,
      updated_at:  row.get(5)?,
    })
  }

  pub fn into_project(self) -> Result<Project> {
    Ok(Project {
      id:          decode_id(&self.id)?,
      name:        self.name,
      client_name: self.client_name,
      status:      ProjectStatus::parse(&self.status)?,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}
