// Library schema — table creation and migrations.
//
// `schema_version` records which migrations have run; each migration is a
// closure executing SQL, applied at most once.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet.
///
/// This is idempotent — safe to call on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS movies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            imdb_id TEXT UNIQUE,
            title TEXT NOT NULL,
            year TEXT,
            genre TEXT,                        -- comma-separated, e.g. 'Action, Drama'
            director TEXT,
            plot TEXT,
            imdb_rating TEXT,
            status TEXT NOT NULL,              -- watched / watching / want_to_watch
            user_rating INTEGER,               -- 1 to 10
            date_added TEXT NOT NULL,          -- RFC 3339 UTC
            date_completed TEXT,
            is_favorite INTEGER NOT NULL DEFAULT 0,
            notes TEXT
        );

        CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            olid TEXT UNIQUE,                  -- Open Library id
            title TEXT NOT NULL,
            author TEXT,
            subjects TEXT,                     -- comma-separated
            publish_year INTEGER,
            status TEXT NOT NULL,              -- read / reading / want_to_read
            user_rating INTEGER,
            date_added TEXT NOT NULL,
            date_completed TEXT,
            is_favorite INTEGER NOT NULL DEFAULT 0,
            notes TEXT
        );

        CREATE TABLE IF NOT EXISTS series (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            imdb_id TEXT UNIQUE,
            title TEXT NOT NULL,
            year TEXT,                         -- '2015' or a run like '2019-2023'
            genre TEXT,
            plot TEXT,
            imdb_rating TEXT,
            total_seasons INTEGER NOT NULL DEFAULT 1,
            status TEXT NOT NULL,
            user_rating INTEGER,
            date_added TEXT NOT NULL,
            is_favorite INTEGER NOT NULL DEFAULT 0,
            notes TEXT,
            current_season INTEGER NOT NULL DEFAULT 1,
            current_episode INTEGER NOT NULL DEFAULT 1,
            episodes_watched TEXT NOT NULL DEFAULT '[]'   -- JSON array of {season, episode}
        );

        CREATE INDEX IF NOT EXISTS idx_movies_status ON movies(status);
        CREATE INDEX IF NOT EXISTS idx_books_status ON books(status);
        CREATE INDEX IF NOT EXISTS idx_series_status ON series(status);
        ",
    )
    .context("Failed to create library tables")?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    // Migration v2: ordering by recency is the default listing order, so
    // index date_added on every table.
    run_migration(conn, 2, |c| {
        c.execute_batch(
            "CREATE INDEX IF NOT EXISTS idx_movies_added ON movies(date_added);
             CREATE INDEX IF NOT EXISTS idx_books_added ON books(date_added);
             CREATE INDEX IF NOT EXISTS idx_series_added ON series(date_added);",
        )
    })?;

    Ok(())
}

/// Run a migration if it hasn't been applied yet.
fn run_migration<F>(conn: &Connection, version: i64, migrate: F) -> Result<()>
where
    F: FnOnce(&Connection) -> rusqlite::Result<()>,
{
    let already_applied: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM schema_version WHERE version = ?1",
        [version],
        |row| row.get(0),
    )?;

    if !already_applied {
        migrate(conn).with_context(|| format!("Migration v{version} failed"))?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [version],
        )?;
    }

    Ok(())
}

/// Count user-created tables (used by `init` to report what it did).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Highest applied schema version.
pub fn schema_version(conn: &Connection) -> Result<i64> {
    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        create_tables(&conn).unwrap();
        // schema_version, movies, books, series
        let count = table_count(&conn).unwrap();
        assert!(count >= 4, "Expected at least 4 tables, got {count}");
        assert_eq!(schema_version(&conn).unwrap(), 2);
    }
}
