//! Stored attachment metadata, one row of `application_files`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AttachmentFile {
  pub id: Uuid,
  pub application_id: i64,
  /// Filename as supplied by the client.
  pub name: String,
  /// Public URL of the stored blob.
  pub path: String,
  pub size: i64,
  pub mime_type: String,
  /// Lower-case hex SHA-256 of the stored bytes.
  pub hash: String,
  pub uploaded_at: DateTime<Utc>,
}
