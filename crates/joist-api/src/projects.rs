//! Handlers for `/projects` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/projects` | Oldest first |
//! | `POST`   | `/projects` | Body: [`NewProject`]; returns 201 + stored project |
//! | `GET`    | `/projects/:id` | 404 if not found |
//! | `GET`    | `/projects/:id/deletion` | Preview [`DeletionReport`]; nothing changes. 404 if not found, 503 if the store cannot be read |
//! | `DELETE` | `/projects/:id` | Executed [`DeletionReport`]; 404 / 409 / 503 on failure |
//!
//! A malformed `:id` is a 400 with the usual `{"error": ..}` body.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use joist_core::{
  DeletionError,
  outcome::{DeletionResult, ValidationResult},
  project::{NewProject, Project, ProjectId},
  report::DeletionReport,
  store::ProjectStore,
};
use uuid::Uuid;

use crate::error::ApiError;

fn parse_id(raw: &str) -> Result<ProjectId, ApiError> {
  Uuid::parse_str(raw)
    .map(ProjectId::from_uuid)
    .map_err(|e| ApiError::BadRequest(format!("invalid project id {raw:?}: {e}")))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /projects`
pub async fn list<S: ProjectStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Project>>, ApiError> {
  let projects = store.list_projects().await.map_err(ApiError::store)?;
  Ok(Json(projects))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /projects`, body: `{"name":"Deck Build"}`
pub async fn create<S: ProjectStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewProject>,
) -> Result<impl IntoResponse, ApiError> {
  if body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("project name must not be empty".into()));
  }
  let project = store.add_project(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(project)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /projects/:id`
pub async fn get_one<S: ProjectStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Project>, ApiError> {
  let id = parse_id(&id)?;
  store
    .get_project(id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("project {id} not found")))
}

// ─── Deletion ────────────────────────────────────────────────────────────────

pub(crate) fn validation_status(result: &ValidationResult) -> StatusCode {
  match result {
    ValidationResult::Deletable { .. } => StatusCode::OK,
    ValidationResult::NotFound { .. } => StatusCode::NOT_FOUND,
    ValidationResult::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
  }
}

pub(crate) fn deletion_status(result: &DeletionResult) -> StatusCode {
  match result.error() {
    None => StatusCode::OK,
    Some(DeletionError::NotFound { .. }) => StatusCode::NOT_FOUND,
    Some(DeletionError::ConstraintViolation { .. }) => StatusCode::CONFLICT,
    Some(DeletionError::TransactionFailure { .. }) => StatusCode::SERVICE_UNAVAILABLE,
  }
}

/// `GET /projects/:id/deletion`
pub async fn preview_deletion<S: ProjectStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<(StatusCode, Json<DeletionReport>), ApiError> {
  let result = store.validate_deletion(parse_id(&id)?).await;
  Ok((validation_status(&result), Json(DeletionReport::from(&result))))
}

/// `DELETE /projects/:id`
pub async fn delete_one<S: ProjectStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<(StatusCode, Json<DeletionReport>), ApiError> {
  let result = store.delete_project(parse_id(&id)?).await;
  Ok((deletion_status(&result), Json(DeletionReport::from(&result))))
}
