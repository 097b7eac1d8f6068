//! Blob storage for uploaded file bytes.
//!
//! The service only needs three operations: put bytes under a fresh
//! server-assigned name, read them back, and remove them by their public
//! location. `LocalBlobStore` is the filesystem backend.

use async_trait::async_trait;
use thiserror::Error;

pub mod local;

pub use local::LocalBlobStore;

/// Public path prefix under which stored blobs are served.
pub const PUBLIC_PREFIX: &str = "/uploads";

#[derive(Debug, Error)]
pub enum StorageError {
  #[error("blob not found: {0}")]
  NotFound(String),

  #[error("invalid storage location: {0}")]
  InvalidLocation(String),

  #[error("storage io error: {0}")]
  Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Result of storing one blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
  /// Server-generated filename on disk.
  pub filename: String,
  /// Public URL the blob is served from.
  pub url: String,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
  /// Write `data` under a new unique filename derived from `original_name`.
  async fn store(&self, original_name: &str, data: &[u8]) -> StorageResult<StoredBlob>;

  /// Read the bytes of a stored blob.
  async fn read(&self, filename: &str) -> StorageResult<Vec<u8>>;

  /// Remove a blob. `location` may be a public URL or a bare filename; only
  /// the last path segment is used. Returns `NotFound` if nothing was there.
  async fn delete(&self, location: &str) -> StorageResult<()>;
}
