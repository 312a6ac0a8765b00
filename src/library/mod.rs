// Library layer — SQLite storage for tracked movies, books and series.
//
// rusqlite with the "bundled" feature, so there's no system SQLite
// dependency. The file lives wherever MEDIA_TRACKER_DB_PATH points.

pub mod export;
pub mod models;
pub mod queries;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use sqlite::SqliteLibrary;
pub use traits::LibraryStore;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

/// Open (or create) the library database and run migrations.
pub fn initialize(db_path: &str) -> Result<Connection> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for library: {}", db_path))?;
        }
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open library at {}", db_path))?;

    conn.pragma_update(None, "journal_mode", "WAL")?;
    schema::create_tables(&conn)?;

    Ok(conn)
}

/// Open an existing library (fails if it doesn't exist yet).
pub fn open(db_path: &str) -> Result<Connection> {
    if !Path::new(db_path).exists() {
        anyhow::bail!(
            "Library not found at {}. Run `media-tracker init` first.",
            db_path
        );
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open library at {}", db_path))?;

    conn.pragma_update(None, "journal_mode", "WAL")?;
    // Picks up migrations added since the file was created
    schema::create_tables(&conn)?;

    Ok(conn)
}
