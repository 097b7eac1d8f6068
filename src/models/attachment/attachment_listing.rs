//! Attachment metadata as returned by the list endpoint (no hash).

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, FromRow)]
pub struct AttachmentListing {
  pub id: Uuid,
  pub name: String,
  pub path: String,
  pub size: i64,
  pub mime_type: String,
  pub uploaded_at: DateTime<Utc>,
}
