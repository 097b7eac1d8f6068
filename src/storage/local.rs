//! Filesystem-backed blob store.

use super::{BlobStore, PUBLIC_PREFIX, StorageError, StorageResult, StoredBlob};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct LocalBlobStore {
  root: PathBuf,
  public_base_url: String,
}

impl LocalBlobStore {
  /// Create the store, making sure `root` exists.
  ///
  /// `public_base_url` is the externally visible origin of the server, e.g.
  /// `http://127.0.0.1:3811`; blob URLs become `<base>/uploads/<filename>`.
  pub async fn new(root: impl Into<PathBuf>, public_base_url: &str) -> StorageResult<Self> {
    let root = root.into();
    fs::create_dir_all(&root).await?;
    Ok(Self {
      root,
      public_base_url: public_base_url.trim_end_matches('/').to_string(),
    })
  }

  pub fn url_for(&self, filename: &str) -> String {
    format!("{}{}/{}", self.public_base_url, PUBLIC_PREFIX, filename)
  }

  fn path_for(&self, filename: &str) -> StorageResult<PathBuf> {
    if filename.is_empty()
      || filename.contains("..")
      || filename.contains('/')
      || filename.contains('\\')
    {
      return Err(StorageError::InvalidLocation(filename.to_string()));
    }
    Ok(self.root.join(filename))
  }
}

/// Fresh storage filename: a v4 UUID plus the original's lower-cased
/// extension when it is plain alphanumeric.
pub fn storage_filename(original_name: &str) -> String {
  let ext = Path::new(original_name)
    .extension()
    .and_then(|e| e.to_str())
    .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
    .map(|e| format!(".{}", e.to_ascii_lowercase()))
    .unwrap_or_default();
  format!("{}{}", Uuid::new_v4(), ext)
}

/// Last path segment of a URL or path, without any query string.
pub fn filename_from_location(location: &str) -> &str {
  let no_query = location.split(['?', '#']).next().unwrap_or(location);
  no_query.rsplit('/').next().unwrap_or(no_query)
}

#[async_trait]
impl BlobStore for LocalBlobStore {
  async fn store(&self, original_name: &str, data: &[u8]) -> StorageResult<StoredBlob> {
    let filename = storage_filename(original_name);
    let path = self.path_for(&filename)?;

    let mut file = fs::OpenOptions::new()
      .write(true)
      .create_new(true)
      .open(&path)
      .await?;
    file.write_all(data).await?;
    file.sync_all().await?;

    info!(path = %path.display(), size_bytes = data.len(), "stored blob");
    Ok(StoredBlob {
      url: self.url_for(&filename),
      filename,
    })
  }

  async fn read(&self, filename: &str) -> StorageResult<Vec<u8>> {
    let path = self.path_for(filename)?;
    match fs::read(&path).await {
      Ok(data) => Ok(data),
      Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(filename.into())),
      Err(e) => Err(e.into()),
    }
  }

  async fn delete(&self, location: &str) -> StorageResult<()> {
    let filename = filename_from_location(location);
    let path = self.path_for(filename)?;
    match fs::remove_file(&path).await {
      Ok(()) => {
        debug!(path = %path.display(), "removed blob");
        Ok(())
      }
      Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(filename.into())),
      Err(e) => Err(e.into()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn storage_filename_keeps_simple_extension() {
    let name = storage_filename("Offer Letter.PDF");
    assert!(name.ends_with(".pdf"));
    assert!(Uuid::parse_str(name.trim_end_matches(".pdf")).is_ok());
  }

  #[test]
  fn storage_filename_drops_odd_extension() {
    let name = storage_filename("weird.p d f");
    assert!(Uuid::parse_str(&name).is_ok());
    let name = storage_filename("noext");
    assert!(Uuid::parse_str(&name).is_ok());
  }

  #[test]
  fn filename_from_location_takes_last_segment() {
    assert_eq!(
      filename_from_location("http://host:3811/uploads/abc.pdf"),
      "abc.pdf"
    );
    assert_eq!(filename_from_location("/uploads/abc.pdf?x=1"), "abc.pdf");
    assert_eq!(filename_from_location("abc.png"), "abc.png");
  }

  #[tokio::test]
  async fn store_read_delete_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalBlobStore::new(dir.path(), "http://localhost:1/")
      .await
      .unwrap();

    let blob = store.store("a.png", b"PNGDATA").await.unwrap();
    assert_eq!(blob.url, format!("http://localhost:1/uploads/{}", blob.filename));
    assert_eq!(store.read(&blob.filename).await.unwrap(), b"PNGDATA");

    store.delete(&blob.url).await.unwrap();
    assert!(matches!(
      store.delete(&blob.url).await,
      Err(StorageError::NotFound(_))
    ));
    assert!(matches!(
      store.read(&blob.filename).await,
      Err(StorageError::NotFound(_))
    ));
  }

  #[tokio::test]
  async fn rejects_traversal() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalBlobStore::new(dir.path(), "http://localhost:1")
      .await
      .unwrap();
    assert!(matches!(
      store.read("../secret").await,
      Err(StorageError::InvalidLocation(_))
    ));
    assert!(matches!(
      store.delete("http://h/uploads/..").await,
      Err(StorageError::InvalidLocation(_))
    ));
  }
}
