//! Utility functions: tracing, hashing and upload input checks.

use sha2::{Digest, Sha256};
use tracing_subscriber::{EnvFilter, fmt};

/// Declared content types accepted for offer documents.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
  "application/pdf",
  "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
  "image/jpeg",
  "image/jpg",
  "image/png",
];

/// Initialize pretty CLI logging.
pub fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  fmt()
    .with_env_filter(filter)
    .with_target(false)
    .pretty()
    .init();
}

/// Lower-case hex SHA-256 of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
  hex::encode(Sha256::digest(data))
}

/// Strip parameters and lower-case, e.g. `Image/PNG; q=1` -> `image/png`.
pub fn normalize_mime(content_type: &str) -> String {
  content_type
    .split(';')
    .next()
    .unwrap_or(content_type)
    .trim()
    .to_ascii_lowercase()
}

pub fn is_allowed_mime(content_type: &str) -> bool {
  ALLOWED_MIME_TYPES.contains(&normalize_mime(content_type).as_str())
}

/// Parse a positive integer application id.
pub fn parse_application_id(raw: Option<&str>) -> Option<i64> {
  raw?.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sha256_matches_known_vector() {
    assert_eq!(
      sha256_hex(b"abc"),
      "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
  }

  #[test]
  fn mime_allow_list() {
    assert!(is_allowed_mime("application/pdf"));
    assert!(is_allowed_mime("IMAGE/PNG"));
    assert!(is_allowed_mime("image/jpeg; charset=binary"));
    assert!(is_allowed_mime(
      "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    ));
    assert!(!is_allowed_mime("text/plain"));
    assert!(!is_allowed_mime("application/msword"));
    assert!(!is_allowed_mime(""));
  }

  #[test]
  fn application_id_must_be_positive_integer() {
    assert_eq!(parse_application_id(Some("42")), Some(42));
    assert_eq!(parse_application_id(Some(" 7 ")), Some(7));
    assert_eq!(parse_application_id(Some("0")), None);
    assert_eq!(parse_application_id(Some("-3")), None);
    assert_eq!(parse_application_id(Some("abc")), None);
    assert_eq!(parse_application_id(Some("")), None);
    assert_eq!(parse_application_id(None), None);
  }
}
