//! Database helpers: migrations, path handling and attachment queries.

use sqlx::SqlitePool;
use std::path::Path;
use tracing::warn;

pub mod attachments;

/// Create the tables this service reads and writes if they are absent.
///
/// `applications` is owned elsewhere; it is only created here so the
/// service can run against an empty database.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS applications (
            id INTEGER PRIMARY KEY,
            status TEXT NOT NULL
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS application_files (
            id TEXT PRIMARY KEY,
            application_id INTEGER NOT NULL REFERENCES applications(id),
            name TEXT NOT NULL,
            path TEXT NOT NULL,
            size INTEGER NOT NULL,
            mime_type TEXT NOT NULL,
            hash TEXT NOT NULL,
            uploaded_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_application_files_application_id ON application_files (application_id)",
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Ensure SQLite file and parent folder exist for a given sqlx URL.
pub fn ensure_sqlite_path(db_url: &str) -> String {
    if !db_url.starts_with("sqlite:") {
        return db_url.to_string();
    }
    let path_part = db_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path_only = path_part.split_once('?').map_or(path_part, |(p, _)| p);
    if path_only.is_empty() || path_only == ":memory:" {
        return db_url.to_string();
    }
    let p = Path::new(path_only);
    if let Some(parent) = p.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(path = %parent.display(), "failed to create database directory: {e}");
            }
        }
    }
    if let Err(e) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(p)
    {
        warn!(path = %p.display(), "failed to create database file: {e}");
    }
    db_url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_and_non_sqlite_urls_pass_through() {
        assert_eq!(ensure_sqlite_path("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(ensure_sqlite_path("sqlite://:memory:"), "sqlite://:memory:");
        assert_eq!(
            ensure_sqlite_path("postgres://localhost/x"),
            "postgres://localhost/x"
        );
    }

    #[test]
    fn creates_file_and_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("nested").join("docs.db");
        let url = format!("sqlite://{}?mode=rwc", file.display());
        assert_eq!(ensure_sqlite_path(&url), url);
        assert!(file.exists());
    }

    #[test]
    fn unwritable_location_still_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a dir").unwrap();
        let url = format!("sqlite://{}/docs.db", blocker.display());
        assert_eq!(ensure_sqlite_path(&url), url);
        assert!(!blocker.join("docs.db").exists());
    }
}
