//! [`SqliteStore`], the SQLite implementation of [`ProjectStore`].

use std::{path::Path, time::Duration};

use chrono::Utc;
use joist_core::{
  DeletionError,
  executor::{self, Executed},
  graph::{REFERENCE_GRAPH, ReferenceGraph},
  outcome::{DeletionResult, ValidationResult},
  planner,
  project::{NewProject, Project, ProjectId},
  store::ProjectStore,
  validator,
};
use rusqlite::{Connection, ErrorCode, OptionalExtension as _, TransactionBehavior};

use crate::{
  Result,
  encode::{PROJECT_COLUMNS, RawProject, encode_dt, encode_id},
  schema::SCHEMA,
  session::Session,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Joist project store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// How long a writer waits for another connection's lock before the
  /// statement fails with `SQLITE_BUSY`.
  pub async fn set_busy_timeout(&self, timeout: Duration) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.busy_timeout(timeout)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Deletion transaction ────────────────────────────────────────────────────

fn is_contention(e: &rusqlite::Error) -> bool {
  matches!(
    e.sqlite_error_code(),
    Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
  )
}

fn transaction_failure(step: &str, e: rusqlite::Error) -> DeletionError {
  DeletionError::TransactionFailure { step: Some(step.to_owned()), detail: e.to_string() }
}

/// Plan, then execute inside one immediate transaction. Commits only if every
/// step succeeded; any other exit rolls back.
fn run_deletion(
  conn: &mut Connection,
  graph: &ReferenceGraph,
  id: ProjectId,
) -> std::result::Result<Executed, DeletionError> {
  let plan = planner::plan(graph, id).map_err(|e| DeletionError::ConstraintViolation {
    step:   "planning".into(),
    detail: e.to_string(),
  })?;

  // IMMEDIATE takes the write lock up front, so a racing delete waits here
  // and then finds the project gone.
  let tx = conn
    .transaction_with_behavior(TransactionBehavior::Immediate)
    .map_err(|e| transaction_failure("beginning transaction", e))?;

  let outcome = executor::execute(&Session::new(&tx, graph), graph, &plan);

  match outcome {
    Ok(done) => {
      tx.commit().map_err(|e| transaction_failure("committing", e))?;
      Ok(done)
    }
    Err(err) => {
      let failure = err.into_deletion_error(id, is_contention);
      if let Err(e) = tx.rollback() {
        tracing::error!(project_id = %id, error = %e, "rollback failed");
      }
      Err(failure)
    }
  }
}

// ─── ProjectStore impl ───────────────────────────────────────────────────────

impl ProjectStore for SqliteStore {
  type Error = crate::Error;

  async fn add_project(&self, input: NewProject) -> Result<Project> {
    let now = Utc::now();
    let project = Project {
      id:          ProjectId::new(),
      name:        input.name,
      client_name: input.client_name,
      status:      input.status,
      created_at:  now,
      updated_at:  now,
    };

    let id_str     = encode_id(project.id);
    let name       = project.name.clone();
    let client     = project.client_name.clone();
    let status_str = project.status.as_str();
    let at_str     = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO projects (id, name, client_name, status, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
          rusqlite::params![id_str, name, client, status_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(project_id = %project.id, "project created");
    Ok(project)
  }

  async fn get_project(&self, id: ProjectId) -> Result<Option<Project>> {
    let id_str = encode_id(id);

    let raw: Option<RawProject> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"),
            rusqlite::params![id_str],
            RawProject::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawProject::into_project).transpose()
  }

  async fn list_projects(&self) -> Result<Vec<Project>> {
    let raws: Vec<RawProject> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at, id"
        ))?;
        let rows = stmt
          .query_map([], RawProject::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProject::into_project).collect()
  }

  async fn validate_deletion(&self, id: ProjectId) -> ValidationResult {
    self
      .conn
      .call(move |conn| {
        // A deferred transaction gives every count the same snapshot.
        let tx = conn.transaction()?;
        let result = validator::validate(
          &Session::new(&tx, &REFERENCE_GRAPH),
          &REFERENCE_GRAPH,
          id,
        );
        Ok(result)
      })
      .await
      .unwrap_or_else(|e| {
        tracing::warn!(project_id = %id, error = %e, "deletion validation failed");
        ValidationResult::Unavailable { project_id: id, reason: e.to_string() }
      })
  }

  async fn delete_project(&self, id: ProjectId) -> DeletionResult {
    let outcome = self
      .conn
      .call(move |conn| Ok(run_deletion(conn, &REFERENCE_GRAPH, id)))
      .await
      .unwrap_or_else(|e| {
        Err(DeletionError::TransactionFailure { step: None, detail: e.to_string() })
      });

    match outcome {
      Ok(Executed { project_name, counts }) => {
        tracing::info!(project_id = %id, %project_name, ?counts, "project deleted");
        DeletionResult::Deleted { project_id: id, project_name, counts }
      }
      Err(error) => {
        if error.is_not_found() {
          tracing::info!(project_id = %id, "project to delete was not found");
        } else {
          tracing::warn!(project_id = %id, error = %error, "project deletion rolled back");
        }
        DeletionResult::Failed { project_id: id, error }
      }
    }
  }
}
