//! Attachment listing and single-file removal.

use crate::{
  app::AppState,
  db::attachments as queries,
  error::{AppError, internal},
  models::attachment::attachment_listing::AttachmentListing,
  storage::StorageError,
};
use axum::{
  Json,
  extract::{Path as AxumPath, State, rejection::PathRejection},
  http::StatusCode,
};
use tracing::info;
use uuid::Uuid;

const LIST_FAILED: &str = "Failed to fetch uploaded files";
const DELETE_FAILED: &str = "Failed to delete file";
pub const INVALID_APPLICATION_ID: &str = "Invalid application ID";
pub const INVALID_FILE_ID: &str = "Invalid file ID";

/// Files for an application, newest first. Unknown ids yield `[]`; a
/// non-integer id is a 400.
pub async fn list_files(
  State(state): State<AppState>,
  path: Result<AxumPath<i64>, PathRejection>,
) -> Result<Json<Vec<AttachmentListing>>, AppError> {
  let AxumPath(application_id) =
    path.map_err(|_| AppError::InvalidInput(INVALID_APPLICATION_ID.into()))?;
  let rows = queries::list_files(&state.db, application_id)
    .await
    .map_err(internal("list_files query failed", LIST_FAILED))?;
  info!(application_id, count = rows.len(), "fetched uploaded files");
  Ok(Json(rows))
}

/// Remove one attachment's blob and row.
pub async fn delete_file(
  State(state): State<AppState>,
  path: Result<AxumPath<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
  let AxumPath(file_id) = path.map_err(|_| AppError::InvalidInput(INVALID_FILE_ID.into()))?;
  let file = queries::find_file(&state.db, file_id)
    .await
    .map_err(internal("delete_file lookup failed", DELETE_FAILED))?
    .ok_or_else(|| AppError::NotFound("File not found".into()))?;

  match state.store.delete(&file.path).await {
    Ok(()) | Err(StorageError::NotFound(_)) => {}
    Err(e) => return Err(internal("delete_file blob removal failed", DELETE_FAILED)(e)),
  }
  queries::delete_file_row(&state.db, file_id)
    .await
    .map_err(internal("delete_file row removal failed", DELETE_FAILED))?;

  info!(%file_id, application_id = file.application_id, "deleted file");
  Ok(StatusCode::NO_CONTENT)
}
