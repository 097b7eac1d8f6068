//! Offer document upload: validate, replace the application's file set,
//! record content-addressed metadata.
//!
//! The replace is not transactional. Old blobs and rows are removed before
//! any new file is written, so a failure part way through leaves the
//! application with fewer files (possibly none), and two concurrent uploads
//! for one application can interleave.

use crate::{
  app::AppState,
  db::attachments::{self as queries, NewAttachment},
  error::{AppError, internal},
  models::{
    attachment::attachment_file::AttachmentFile, response::upload_response::UploadResponse,
  },
  storage::StorageError,
  util::{is_allowed_mime, normalize_mime, parse_application_id, sha256_hex},
};
use axum::{
  Json,
  extract::{
    Multipart, State,
    multipart::{Field, MultipartError, MultipartRejection},
  },
  http::StatusCode,
};
use tracing::{debug, info};
use uuid::Uuid;

pub const MAX_FILES: usize = 10;
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;
/// Room for a full batch plus multipart framing and text fields.
pub const MAX_REQUEST_BYTES: usize = MAX_FILES * MAX_FILE_SIZE + 1024 * 1024;

pub const FILE_TOO_LARGE: &str = "One or more files exceed the 10MB limit";
pub const DISALLOWED_TYPE: &str = "Only PDF, DOCX, JPG, JPEG, and PNG files are allowed";
pub const TOO_MANY_FILES: &str = "A maximum of 10 files can be uploaded at once";
pub const INVALID_ID: &str = "Invalid or missing application ID";
pub const NO_FILES: &str = "No files uploaded";
pub const NOT_ACCEPTED: &str = "Files can only be uploaded for accepted applications";
const UPLOAD_FAILED: &str = "Failed to upload files";

/// A file part held in memory until the application has been validated.
#[derive(Debug)]
pub struct IncomingFile {
  pub name: String,
  pub mime_type: String,
  pub data: Vec<u8>,
}

#[derive(Debug, Default)]
struct UploadForm {
  application_id: Option<String>,
  files: Vec<IncomingFile>,
}

pub async fn upload_files(
  State(state): State<AppState>,
  multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
  let multipart = multipart.map_err(|e| {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
      AppError::InvalidInput(FILE_TOO_LARGE.into())
    } else {
      AppError::InvalidInput(format!("Invalid multipart body: {}", e.body_text()))
    }
  })?;
  let form = read_form(multipart).await?;

  let application_id = parse_application_id(form.application_id.as_deref())
    .ok_or_else(|| AppError::InvalidInput(INVALID_ID.into()))?;
  info!(application_id, files = form.files.len(), "received upload request");

  if form.files.is_empty() {
    return Err(AppError::InvalidInput(NO_FILES.into()));
  }

  let application = queries::find_application(&state.db, application_id)
    .await
    .map_err(internal("application lookup failed", UPLOAD_FAILED))?
    .ok_or_else(|| AppError::NotFound("Application not found".into()))?;
  info!(application_id, status = %application.status, "application status");

  if !application.is_accepted() {
    return Err(AppError::Forbidden(NOT_ACCEPTED.into()));
  }

  remove_existing_files(&state, application_id).await?;

  let mut records = Vec::with_capacity(form.files.len());
  for file in form.files {
    records.push(store_file(&state, application_id, file).await?);
  }

  info!(application_id, count = records.len(), "uploaded files");
  Ok((
    StatusCode::CREATED,
    Json(UploadResponse {
      message: "Files uploaded successfully".into(),
      files: records,
    }),
  ))
}

/// Delete every stored blob and row for the application. A blob that is
/// already gone counts as deleted.
async fn remove_existing_files(state: &AppState, application_id: i64) -> Result<(), AppError> {
  let existing = queries::file_locations(&state.db, application_id)
    .await
    .map_err(internal("existing file lookup failed", UPLOAD_FAILED))?;

  for (id, path) in existing {
    match state.store.delete(&path).await {
      Ok(()) => {}
      Err(StorageError::NotFound(name)) => debug!(%name, "previous blob already missing"),
      Err(e) => return Err(internal("previous blob removal failed", UPLOAD_FAILED)(e)),
    }
    queries::delete_file_row(&state.db, id)
      .await
      .map_err(internal("previous row removal failed", UPLOAD_FAILED))?;
  }
  Ok(())
}

async fn store_file(
  state: &AppState,
  application_id: i64,
  file: IncomingFile,
) -> Result<AttachmentFile, AppError> {
  let blob = state
    .store
    .store(&file.name, &file.data)
    .await
    .map_err(internal("blob write failed", UPLOAD_FAILED))?;

  // Hash what actually landed in the store.
  let stored = state
    .store
    .read(&blob.filename)
    .await
    .map_err(internal("blob read-back failed", UPLOAD_FAILED))?;

  queries::insert_file(
    &state.db,
    NewAttachment {
      id: Uuid::new_v4(),
      application_id,
      name: file.name,
      path: blob.url,
      size: stored.len() as i64,
      mime_type: file.mime_type,
      hash: sha256_hex(&stored),
    },
  )
  .await
  .map_err(internal("file row insert failed", UPLOAD_FAILED))
}

/// Collect `applicationId` and up to `MAX_FILES` `files` parts. The body is
/// read to the end even after a part is rejected; the first rejection wins.
async fn read_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
  let mut form = UploadForm::default();
  let mut rejection: Option<AppError> = None;

  while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
    let field_name = field.name().unwrap_or_default().to_string();

    if rejection.is_some() {
      drain(field).await?;
      continue;
    }

    match field_name.as_str() {
      "applicationId" => {
        form.application_id = Some(field.text().await.map_err(multipart_error)?);
      }
      "files" => match read_file(field, form.files.len()).await? {
        Ok(file) => form.files.push(file),
        Err(e) => rejection = Some(e),
      },
      _ => drain(field).await?,
    }
  }

  match rejection {
    Some(e) => Err(e),
    None => Ok(form),
  }
}

/// Outer error: the body itself is unreadable. Inner error: this part is
/// rejected and has been drained.
async fn read_file(
  mut field: Field<'_>,
  already_read: usize,
) -> Result<Result<IncomingFile, AppError>, AppError> {
  if already_read >= MAX_FILES {
    drain(field).await?;
    return Ok(Err(AppError::InvalidInput(TOO_MANY_FILES.into())));
  }

  let name = field.file_name().unwrap_or("file").to_string();
  let mime_type = normalize_mime(field.content_type().unwrap_or("application/octet-stream"));
  if !is_allowed_mime(&mime_type) {
    drain(field).await?;
    return Ok(Err(AppError::InvalidInput(DISALLOWED_TYPE.into())));
  }

  let mut data = Vec::new();
  while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
    if data.len() + chunk.len() > MAX_FILE_SIZE {
      drain(field).await?;
      return Ok(Err(AppError::InvalidInput(FILE_TOO_LARGE.into())));
    }
    data.extend_from_slice(&chunk);
  }

  Ok(Ok(IncomingFile {
    name,
    mime_type,
    data,
  }))
}

async fn drain(mut field: Field<'_>) -> Result<(), AppError> {
  while field.chunk().await.map_err(multipart_error)?.is_some() {}
  Ok(())
}

fn multipart_error(e: MultipartError) -> AppError {
  if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
    AppError::InvalidInput(FILE_TOO_LARGE.into())
  } else {
    AppError::InvalidInput(format!("Invalid multipart body: {}", e.body_text()))
  }
}
