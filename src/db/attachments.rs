//! Queries over `applications` and `application_files`.

use crate::models::{
  application::application_row::ApplicationRow,
  attachment::{attachment_file::AttachmentFile, attachment_listing::AttachmentListing},
};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Metadata for a row about to be inserted; `uploaded_at` comes from the
/// column default.
pub struct NewAttachment {
  pub id: Uuid,
  pub application_id: i64,
  pub name: String,
  pub path: String,
  pub size: i64,
  pub mime_type: String,
  pub hash: String,
}

pub async fn find_application(
  pool: &SqlitePool,
  id: i64,
) -> Result<Option<ApplicationRow>, sqlx::Error> {
  sqlx::query_as("SELECT id, status FROM applications WHERE id = ?")
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// `(id, path)` of every stored file for an application.
pub async fn file_locations(
  pool: &SqlitePool,
  application_id: i64,
) -> Result<Vec<(Uuid, String)>, sqlx::Error> {
  sqlx::query_as("SELECT id, path FROM application_files WHERE application_id = ?")
    .bind(application_id)
    .fetch_all(pool)
    .await
}

pub async fn find_file(pool: &SqlitePool, id: Uuid) -> Result<Option<AttachmentFile>, sqlx::Error> {
  sqlx::query_as(
    "SELECT id, application_id, name, path, size, mime_type, hash, uploaded_at FROM application_files WHERE id = ?",
  )
  .bind(id)
  .fetch_optional(pool)
  .await
}

pub async fn delete_file_row(pool: &SqlitePool, id: Uuid) -> Result<(), sqlx::Error> {
  sqlx::query("DELETE FROM application_files WHERE id = ?")
    .bind(id)
    .execute(pool)
    .await?;
  Ok(())
}

pub async fn insert_file(
  pool: &SqlitePool,
  new: NewAttachment,
) -> Result<AttachmentFile, sqlx::Error> {
  sqlx::query_as(
    "INSERT INTO application_files (id, application_id, name, path, size, mime_type, hash) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id, application_id, name, path, size, mime_type, hash, uploaded_at",
  )
  .bind(new.id)
  .bind(new.application_id)
  .bind(new.name)
  .bind(new.path)
  .bind(new.size)
  .bind(new.mime_type)
  .bind(new.hash)
  .fetch_one(pool)
  .await
}

/// Newest first; rows from the same instant come back in reverse insert order.
pub async fn list_files(
  pool: &SqlitePool,
  application_id: i64,
) -> Result<Vec<AttachmentListing>, sqlx::Error> {
  sqlx::query_as(
    "SELECT id, name, path, size, mime_type, uploaded_at FROM application_files WHERE application_id = ? ORDER BY uploaded_at DESC, rowid DESC",
  )
  .bind(application_id)
  .fetch_all(pool)
  .await
}
