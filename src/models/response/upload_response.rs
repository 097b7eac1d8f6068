//! Body of a successful upload.

use crate::models::attachment::attachment_file::AttachmentFile;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
  pub message: String,
  pub files: Vec<AttachmentFile>,
}
