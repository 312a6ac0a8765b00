// Whole-library JSON export and import.
//
// Export reads through LibraryStore. Import writes straight to SQLite inside
// one transaction, so a bad record leaves the library untouched.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::models::{Book, MediaKind, Movie, Series, TrackedItem};
use super::queries;
use super::sqlite::SqliteLibrary;
use super::traits::LibraryStore;
use crate::error::{check_rating, TrackerError, TrackerResult};

/// Everything in the library, grouped by kind. Serializes as
/// `{"movies": [...], "books": [...], "series": [...]}`. A missing group
/// reads back as empty.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LibraryExport {
    #[serde(default)]
    pub movies: Vec<Movie>,
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub series: Vec<Series>,
}

impl LibraryExport {
    pub fn len(&self) -> usize {
        self.movies.len() + self.books.len() + self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Snapshot every item the store holds.
pub fn export_library<S: LibraryStore + ?Sized>(store: &S) -> Result<LibraryExport> {
    let mut export = LibraryExport::default();
    for kind in MediaKind::ALL {
        for item in store.all_items(kind)? {
            match item {
                TrackedItem::Movie(m) => export.movies.push(m),
                TrackedItem::Book(b) => export.books.push(b),
                TrackedItem::Series(s) => export.series.push(s),
            }
        }
    }
    Ok(export)
}

/// What to do with an imported item whose external id (IMDb id or Open
/// Library id) is already in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportStrategy {
    /// Keep the existing item, drop the imported one.
    #[default]
    Skip,
    /// Remove the existing item and insert the imported one.
    Replace,
    /// Keep both. The imported copy loses its external id.
    Add,
}

impl ImportStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Replace => "replace",
            Self::Add => "add",
        }
    }
}

impl fmt::Display for ImportStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportStrategy {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "replace" => Ok(Self::Replace),
            "add" => Ok(Self::Add),
            _ => Err(TrackerError::UnknownImportStrategy(s.to_string())),
        }
    }
}

/// Counts of items written by `import_library`, per kind.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub movies: usize,
    pub books: usize,
    pub series: usize,
    /// Duplicates left alone under `ImportStrategy::Skip`
    pub skipped: usize,
}

impl ImportSummary {
    pub fn imported(&self) -> usize {
        self.movies + self.books + self.series
    }
}

enum Placement {
    Insert,
    Detached,
    Skip,
}

/// Decide how an imported item lands, removing the existing one for `Replace`.
fn place(
    conn: &Connection,
    kind: MediaKind,
    external_id: Option<&str>,
    strategy: ImportStrategy,
) -> Result<Placement> {
    let Some(external_id) = external_id else {
        return Ok(Placement::Insert);
    };
    let Some(existing) = queries::get_item_by_external_id(conn, kind, external_id)? else {
        return Ok(Placement::Insert);
    };
    Ok(match strategy {
        ImportStrategy::Skip => Placement::Skip,
        ImportStrategy::Replace => {
            queries::delete_item(conn, kind, existing.id())?;
            Placement::Insert
        }
        ImportStrategy::Add => Placement::Detached,
    })
}

/// Merge an exported snapshot into the library.
///
/// Imported items get fresh ids. Status, rating, favorite flag, notes,
/// timestamps and episode history are kept as exported. Items without an
/// external id are never treated as duplicates.
pub fn import_library(
    lib: &SqliteLibrary,
    data: LibraryExport,
    strategy: ImportStrategy,
) -> TrackerResult<ImportSummary> {
    let tx = lib
        .connection()
        .unchecked_transaction()
        .context("Failed to start import transaction")?;
    let mut summary = ImportSummary::default();

    for mut movie in data.movies {
        movie.user_rating.map(check_rating).transpose()?;
        match place(&tx, MediaKind::Movie, movie.imdb_id.as_deref(), strategy)? {
            Placement::Skip => {
                summary.skipped += 1;
                continue;
            }
            Placement::Detached => movie.imdb_id = None,
            Placement::Insert => {}
        }
        queries::insert_movie(&tx, &movie)?;
        summary.movies += 1;
    }

    for mut book in data.books {
        book.user_rating.map(check_rating).transpose()?;
        match place(&tx, MediaKind::Book, book.olid.as_deref(), strategy)? {
            Placement::Skip => {
                summary.skipped += 1;
                continue;
            }
            Placement::Detached => book.olid = None,
            Placement::Insert => {}
        }
        queries::insert_book(&tx, &book)?;
        summary.books += 1;
    }

    for mut series in data.series {
        series.user_rating.map(check_rating).transpose()?;
        match place(&tx, MediaKind::Series, series.imdb_id.as_deref(), strategy)? {
            Placement::Skip => {
                summary.skipped += 1;
                continue;
            }
            Placement::Detached => series.imdb_id = None,
            Placement::Insert => {}
        }
        queries::insert_series(&tx, &series)?;
        summary.series += 1;
    }

    tx.commit().context("Failed to commit import")?;
    info!(
        strategy = strategy.as_str(),
        movies = summary.movies,
        books = summary.books,
        series = summary.series,
        skipped = summary.skipped,
        "Imported library"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::models::{BookStatus, MovieStatus, SeriesStatus};

    fn heat(status: MovieStatus) -> Movie {
        let mut movie = Movie::new("Heat", status);
        movie.imdb_id = Some("tt0113277".to_string());
        movie
    }

    #[test]
    fn test_export_groups_by_kind() {
        let lib = SqliteLibrary::in_memory().unwrap();
        lib.add_movie(&Movie::new("Heat", MovieStatus::Watched)).unwrap();
        lib.add_book(&Book::new("Dune", BookStatus::Read)).unwrap();

        let export = export_library(&lib).unwrap();
        assert_eq!(export.len(), 2);
        assert_eq!(export.movies[0].title, "Heat");

        let json: serde_json::Value = serde_json::to_value(&export).unwrap();
        assert_eq!(json["books"][0]["title"], "Dune");
        assert_eq!(json["movies"][0]["status"], "watched");
        assert!(json["series"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("skip".parse::<ImportStrategy>().unwrap(), ImportStrategy::Skip);
        assert_eq!(" Replace ".parse::<ImportStrategy>().unwrap(), ImportStrategy::Replace);
        assert_eq!("ADD".parse::<ImportStrategy>().unwrap(), ImportStrategy::Add);
        assert!(matches!(
            "merge".parse::<ImportStrategy>(),
            Err(TrackerError::UnknownImportStrategy(ref s)) if s == "merge"
        ));
    }

    #[test]
    fn test_skip_keeps_existing() {
        let lib = SqliteLibrary::in_memory().unwrap();
        let existing = lib.add_movie(&heat(MovieStatus::WantToWatch)).unwrap();
        let data = LibraryExport {
            movies: vec![heat(MovieStatus::Watched)],
            ..Default::default()
        };

        let summary = import_library(&lib, data, ImportStrategy::Skip).unwrap();
        assert_eq!(summary.imported(), 0);
        assert_eq!(summary.skipped, 1);

        let movies = lib.all_items(MediaKind::Movie).unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].id(), existing);
        assert_eq!(movies[0].status().as_str(), "want_to_watch");
    }

    #[test]
    fn test_replace_swaps_existing() {
        let lib = SqliteLibrary::in_memory().unwrap();
        let existing = lib.add_movie(&heat(MovieStatus::WantToWatch)).unwrap();
        let data = LibraryExport {
            movies: vec![heat(MovieStatus::Watched)],
            ..Default::default()
        };

        let summary = import_library(&lib, data, ImportStrategy::Replace).unwrap();
        assert_eq!(summary.movies, 1);

        let movies = lib.all_items(MediaKind::Movie).unwrap();
        assert_eq!(movies.len(), 1);
        assert_ne!(movies[0].id(), existing);
        assert_eq!(movies[0].status().as_str(), "watched");
    }

    #[test]
    fn test_add_keeps_both_copies() {
        let lib = SqliteLibrary::in_memory().unwrap();
        lib.add_movie(&heat(MovieStatus::WantToWatch)).unwrap();
        let data = LibraryExport {
            movies: vec![heat(MovieStatus::Watched)],
            ..Default::default()
        };

        let summary = import_library(&lib, data, ImportStrategy::Add).unwrap();
        assert_eq!(summary.movies, 1);

        let movies = lib.all_items(MediaKind::Movie).unwrap();
        assert_eq!(movies.len(), 2);
        let with_id = movies
            .iter()
            .filter(|m| matches!(m, TrackedItem::Movie(m) if m.imdb_id.is_some()))
            .count();
        assert_eq!(with_id, 1);
    }

    #[test]
    fn test_bad_rating_rolls_back_whole_import() {
        let lib = SqliteLibrary::in_memory().unwrap();
        let mut bad = Series::new("Lost", SeriesStatus::Dropped);
        bad.user_rating = Some(12);
        let data = LibraryExport {
            movies: vec![heat(MovieStatus::Watched)],
            series: vec![bad],
            ..Default::default()
        };

        assert!(matches!(
            import_library(&lib, data, ImportStrategy::Skip),
            Err(TrackerError::RatingOutOfRange(12))
        ));
        assert!(lib.all_items(MediaKind::Movie).unwrap().is_empty());
    }

    #[test]
    fn test_missing_groups_read_as_empty() {
        let data: LibraryExport =
            serde_json::from_str(r#"{"books": []}"#).unwrap();
        assert!(data.is_empty());
    }
}
