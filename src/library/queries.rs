// Library queries — CRUD operations for the movies, books and series tables.
//
// Every SQL statement lives in this module. Callers get TrackedItem values
// back and never see rows or status strings.

use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::TrackerError;

use super::models::{
    Book, BookStatus, Episode, MediaKind, Movie, MovieStatus, Series, SeriesStatus, Status,
    TrackedItem,
};

const MOVIE_COLUMNS: &str = "id, imdb_id, title, year, genre, director, plot, imdb_rating, \
     status, user_rating, date_added, date_completed, is_favorite, notes";

const BOOK_COLUMNS: &str = "id, olid, title, author, subjects, publish_year, status, \
     user_rating, date_added, date_completed, is_favorite, notes";

const SERIES_COLUMNS: &str = "id, imdb_id, title, year, genre, plot, imdb_rating, \
     total_seasons, status, user_rating, date_added, is_favorite, notes, current_season, \
     current_episode, episodes_watched";

/// Most recently added first; id breaks ties so the order is total.
const RECENCY_ORDER: &str = "ORDER BY date_added DESC, id DESC";

fn table(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Movie => "movies",
        MediaKind::Book => "books",
        MediaKind::Series => "series",
    }
}

fn columns(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Movie => MOVIE_COLUMNS,
        MediaKind::Book => BOOK_COLUMNS,
        MediaKind::Series => SERIES_COLUMNS,
    }
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

/// Keep an imported timestamp; stamp fresh items with the current time.
fn added_at(date_added: Option<DateTime<Utc>>) -> String {
    date_added.map(|d| d.to_rfc3339()).unwrap_or_else(now)
}

// --- Row mapping ---

fn parse_timestamp(value: Option<String>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Map a stored status string back to its enum, failing the row if the
/// value is not one we wrote.
fn status_from_row<S>(row: &Row, idx: usize) -> rusqlite::Result<S>
where
    S: FromStr<Err = TrackerError>,
{
    let raw: String = row.get(idx)?;
    raw.parse::<S>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn movie_from_row(row: &Row) -> rusqlite::Result<Movie> {
    let status: MovieStatus = status_from_row(row, 8)?;
    Ok(Movie {
        id: row.get(0)?,
        imdb_id: row.get(1)?,
        title: row.get(2)?,
        year: row.get(3)?,
        genre: row.get(4)?,
        director: row.get(5)?,
        plot: row.get(6)?,
        imdb_rating: row.get(7)?,
        status,
        user_rating: row.get(9)?,
        date_added: parse_timestamp(row.get(10)?),
        date_completed: parse_timestamp(row.get(11)?),
        is_favorite: row.get(12)?,
        notes: row.get(13)?,
    })
}

fn book_from_row(row: &Row) -> rusqlite::Result<Book> {
    let status: BookStatus = status_from_row(row, 6)?;
    Ok(Book {
        id: row.get(0)?,
        olid: row.get(1)?,
        title: row.get(2)?,
        author: row.get(3)?,
        subjects: row.get(4)?,
        publish_year: row.get(5)?,
        status,
        user_rating: row.get(7)?,
        date_added: parse_timestamp(row.get(8)?),
        date_completed: parse_timestamp(row.get(9)?),
        is_favorite: row.get(10)?,
        notes: row.get(11)?,
    })
}

fn series_from_row(row: &Row) -> rusqlite::Result<Series> {
    let status: SeriesStatus = status_from_row(row, 8)?;
    let episodes_json: String = row.get(15)?;
    let episodes_watched: Vec<Episode> = serde_json::from_str(&episodes_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(15, Type::Text, Box::new(e)))?;
    Ok(Series {
        id: row.get(0)?,
        imdb_id: row.get(1)?,
        title: row.get(2)?,
        year: row.get(3)?,
        genre: row.get(4)?,
        plot: row.get(5)?,
        imdb_rating: row.get(6)?,
        total_seasons: row.get(7)?,
        status,
        user_rating: row.get(9)?,
        date_added: parse_timestamp(row.get(10)?),
        is_favorite: row.get(11)?,
        notes: row.get(12)?,
        current_season: row.get(13)?,
        current_episode: row.get(14)?,
        episodes_watched,
    })
}

fn item_from_row(row: &Row, kind: MediaKind) -> rusqlite::Result<TrackedItem> {
    match kind {
        MediaKind::Movie => movie_from_row(row).map(TrackedItem::Movie),
        MediaKind::Book => book_from_row(row).map(TrackedItem::Book),
        MediaKind::Series => series_from_row(row).map(TrackedItem::Series),
    }
}

/// Run a SELECT over one kind's table and collect the mapped items.
fn select_items(
    conn: &Connection,
    kind: MediaKind,
    where_clause: &str,
    args: &[&dyn rusqlite::ToSql],
) -> Result<Vec<TrackedItem>> {
    let sql = format!(
        "SELECT {} FROM {} {} {}",
        columns(kind),
        table(kind),
        where_clause,
        RECENCY_ORDER
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(args, |row| item_from_row(row, kind))?;

    let mut items = Vec::new();
    for row in rows {
        items.push(row.with_context(|| format!("Failed to read a row from {}", table(kind)))?);
    }
    Ok(items)
}

// --- Inserts ---

/// Add a movie and return its new id. `id` on the input is ignored; a
/// missing `date_added` is stamped with the current time.
pub fn insert_movie(conn: &Connection, movie: &Movie) -> Result<i64> {
    conn.execute(
        "INSERT INTO movies (imdb_id, title, year, genre, director, plot, imdb_rating,
                             status, user_rating, date_added, date_completed, is_favorite, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            movie.imdb_id,
            movie.title,
            movie.year,
            movie.genre,
            movie.director,
            movie.plot,
            movie.imdb_rating,
            movie.status.as_str(),
            movie.user_rating,
            added_at(movie.date_added),
            movie.date_completed.map(|d| d.to_rfc3339()),
            movie.is_favorite,
            movie.notes,
        ],
    )
    .with_context(|| format!("Failed to add movie '{}'", movie.title))?;
    Ok(conn.last_insert_rowid())
}

/// Add a book and return its new id.
pub fn insert_book(conn: &Connection, book: &Book) -> Result<i64> {
    conn.execute(
        "INSERT INTO books (olid, title, author, subjects, publish_year, status, user_rating,
                            date_added, date_completed, is_favorite, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            book.olid,
            book.title,
            book.author,
            book.subjects,
            book.publish_year,
            book.status.as_str(),
            book.user_rating,
            added_at(book.date_added),
            book.date_completed.map(|d| d.to_rfc3339()),
            book.is_favorite,
            book.notes,
        ],
    )
    .with_context(|| format!("Failed to add book '{}'", book.title))?;
    Ok(conn.last_insert_rowid())
}

/// Add a series and return its new id.
pub fn insert_series(conn: &Connection, series: &Series) -> Result<i64> {
    let episodes_json = serde_json::to_string(&series.episodes_watched)?;
    conn.execute(
        "INSERT INTO series (imdb_id, title, year, genre, plot, imdb_rating, total_seasons,
                             status, user_rating, date_added, is_favorite, notes,
                             current_season, current_episode, episodes_watched)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            series.imdb_id,
            series.title,
            series.year,
            series.genre,
            series.plot,
            series.imdb_rating,
            series.total_seasons,
            series.status.as_str(),
            series.user_rating,
            added_at(series.date_added),
            series.is_favorite,
            series.notes,
            series.current_season,
            series.current_episode,
            episodes_json,
        ],
    )
    .with_context(|| format!("Failed to add series '{}'", series.title))?;
    Ok(conn.last_insert_rowid())
}

// --- Reads ---

/// All items of one kind with the given status, most recently added first.
pub fn get_items_by_status(conn: &Connection, status: Status) -> Result<Vec<TrackedItem>> {
    select_items(conn, status.kind(), "WHERE status = ?1", &[&status.as_str()])
}

/// Every item of one kind, most recently added first.
pub fn get_all_items(conn: &Connection, kind: MediaKind) -> Result<Vec<TrackedItem>> {
    select_items(conn, kind, "", &[])
}

/// Favorited items of one kind.
pub fn get_favorites(conn: &Connection, kind: MediaKind) -> Result<Vec<TrackedItem>> {
    select_items(conn, kind, "WHERE is_favorite = 1", &[])
}

pub fn get_item_by_id(conn: &Connection, kind: MediaKind, id: i64) -> Result<Option<TrackedItem>> {
    let sql = format!("SELECT {} FROM {} WHERE id = ?1", columns(kind), table(kind));
    let mut stmt = conn.prepare(&sql)?;
    let item = stmt
        .query_row(params![id], |row| item_from_row(row, kind))
        .optional()?;
    Ok(item)
}

/// Look up an item by its external id (IMDb id for movies and series,
/// Open Library id for books).
pub fn get_item_by_external_id(
    conn: &Connection,
    kind: MediaKind,
    external_id: &str,
) -> Result<Option<TrackedItem>> {
    let column = match kind {
        MediaKind::Book => "olid",
        MediaKind::Movie | MediaKind::Series => "imdb_id",
    };
    let sql = format!(
        "SELECT {} FROM {} WHERE {} = ?1",
        columns(kind),
        table(kind),
        column
    );
    let mut stmt = conn.prepare(&sql)?;
    let item = stmt
        .query_row(params![external_id], |row| item_from_row(row, kind))
        .optional()?;
    Ok(item)
}

// --- Updates ---

/// Change an item's status, optionally recording a rating.
///
/// Movies moving to `watched` and books moving to `read` get a completion
/// timestamp; any other status clears it. Returns false if the id is unknown.
pub fn update_status(
    conn: &Connection,
    id: i64,
    status: Status,
    user_rating: Option<u8>,
) -> Result<bool> {
    let kind = status.kind();
    let changed = match kind {
        MediaKind::Movie | MediaKind::Book => {
            let completed = if status == kind.completed_status() {
                Some(now())
            } else {
                None
            };
            conn.execute(
                &format!(
                    "UPDATE {} SET status = ?1, date_completed = ?2,
                        user_rating = COALESCE(?3, user_rating)
                     WHERE id = ?4",
                    table(kind)
                ),
                params![status.as_str(), completed, user_rating, id],
            )?
        }
        MediaKind::Series => conn.execute(
            "UPDATE series SET status = ?1, user_rating = COALESCE(?2, user_rating)
             WHERE id = ?3",
            params![status.as_str(), user_rating, id],
        )?,
    };
    Ok(changed > 0)
}

pub fn set_favorite(conn: &Connection, kind: MediaKind, id: i64, is_favorite: bool) -> Result<bool> {
    let changed = conn.execute(
        &format!("UPDATE {} SET is_favorite = ?1 WHERE id = ?2", table(kind)),
        params![is_favorite, id],
    )?;
    Ok(changed > 0)
}

/// Replace an item's notes. `None` (or blank text) clears them.
pub fn set_notes(conn: &Connection, kind: MediaKind, id: i64, notes: Option<&str>) -> Result<bool> {
    let notes = notes.map(str::trim).filter(|n| !n.is_empty());
    let changed = conn.execute(
        &format!("UPDATE {} SET notes = ?1 WHERE id = ?2", table(kind)),
        params![notes, id],
    )?;
    Ok(changed > 0)
}

/// Mark an episode watched (or unwatched) for a series.
///
/// Watching an episode records it once and moves the current position to it.
/// Unwatching removes it but leaves the current position alone.
pub fn update_series_progress(
    conn: &Connection,
    id: i64,
    season: u32,
    episode: u32,
    watched: bool,
) -> Result<bool> {
    let Some(TrackedItem::Series(mut series)) = get_item_by_id(conn, MediaKind::Series, id)? else {
        return Ok(false);
    };

    let target = Episode { season, episode };
    if watched {
        if !series.episodes_watched.contains(&target) {
            series.episodes_watched.push(target);
        }
        series.current_season = season;
        series.current_episode = episode;
    } else {
        series.episodes_watched.retain(|e| *e != target);
    }

    let episodes_json = serde_json::to_string(&series.episodes_watched)?;
    let changed = conn.execute(
        "UPDATE series SET episodes_watched = ?1, current_season = ?2, current_episode = ?3
         WHERE id = ?4",
        params![
            episodes_json,
            series.current_season,
            series.current_episode,
            id
        ],
    )?;
    Ok(changed > 0)
}

pub fn delete_item(conn: &Connection, kind: MediaKind, id: i64) -> Result<bool> {
    let changed = conn.execute(
        &format!("DELETE FROM {} WHERE id = ?1", table(kind)),
        params![id],
    )?;
    Ok(changed > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::schema::create_tables;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    #[test]
    fn test_insert_and_get_movie() {
        let conn = test_conn();
        let mut movie = Movie::new("Heat", MovieStatus::Watched);
        movie.genre = Some("Crime, Drama".to_string());
        movie.director = Some("Michael Mann".to_string());
        movie.user_rating = Some(9);

        let id = insert_movie(&conn, &movie).unwrap();
        let Some(TrackedItem::Movie(loaded)) = get_item_by_id(&conn, MediaKind::Movie, id).unwrap()
        else {
            panic!("expected a movie");
        };
        assert_eq!(loaded.id, id);
        assert_eq!(loaded.title, "Heat");
        assert_eq!(loaded.genre.as_deref(), Some("Crime, Drama"));
        assert_eq!(loaded.user_rating, Some(9));
        assert!(loaded.date_added.is_some());
    }

    #[test]
    fn test_items_by_status_filters_on_enum() {
        let conn = test_conn();
        insert_book(&conn, &Book::new("Dune", BookStatus::Read)).unwrap();
        insert_book(&conn, &Book::new("Hyperion", BookStatus::WantToRead)).unwrap();
        insert_book(&conn, &Book::new("Emma", BookStatus::WantToRead)).unwrap();

        let backlog = get_items_by_status(&conn, Status::Book(BookStatus::WantToRead)).unwrap();
        assert_eq!(backlog.len(), 2);
        assert!(backlog.iter().all(|b| b.status() == Status::Book(BookStatus::WantToRead)));
    }

    #[test]
    fn test_all_items_most_recent_first() {
        let conn = test_conn();
        let first = insert_movie(&conn, &Movie::new("A", MovieStatus::Watched)).unwrap();
        let second = insert_movie(&conn, &Movie::new("B", MovieStatus::Watched)).unwrap();
        // Same-second inserts fall back to id ordering
        conn.execute("UPDATE movies SET date_added = '2024-01-01T00:00:00+00:00'", [])
            .unwrap();

        let ids: Vec<i64> = get_all_items(&conn, MediaKind::Movie)
            .unwrap()
            .iter()
            .map(|m| m.id())
            .collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[test]
    fn test_update_status_sets_and_clears_completion() {
        let conn = test_conn();
        let id = insert_movie(&conn, &Movie::new("Alien", MovieStatus::WantToWatch)).unwrap();

        assert!(update_status(&conn, id, Status::Movie(MovieStatus::Watched), Some(8)).unwrap());
        let Some(TrackedItem::Movie(m)) = get_item_by_id(&conn, MediaKind::Movie, id).unwrap() else {
            panic!("expected a movie");
        };
        assert_eq!(m.status, MovieStatus::Watched);
        assert_eq!(m.user_rating, Some(8));
        assert!(m.date_completed.is_some());

        // No rating given: the old one is kept, completion is cleared
        assert!(update_status(&conn, id, Status::Movie(MovieStatus::Watching), None).unwrap());
        let Some(TrackedItem::Movie(m)) = get_item_by_id(&conn, MediaKind::Movie, id).unwrap() else {
            panic!("expected a movie");
        };
        assert_eq!(m.user_rating, Some(8));
        assert!(m.date_completed.is_none());
    }

    #[test]
    fn test_update_status_unknown_id() {
        let conn = test_conn();
        assert!(!update_status(&conn, 42, Status::Book(BookStatus::Read), None).unwrap());
    }

    #[test]
    fn test_series_progress() {
        let conn = test_conn();
        let id = insert_series(&conn, &Series::new("Dark", SeriesStatus::Watching)).unwrap();

        assert!(update_series_progress(&conn, id, 1, 3, true).unwrap());
        assert!(update_series_progress(&conn, id, 1, 3, true).unwrap());
        assert!(update_series_progress(&conn, id, 2, 1, true).unwrap());
        assert!(update_series_progress(&conn, id, 1, 3, false).unwrap());

        let Some(TrackedItem::Series(s)) = get_item_by_id(&conn, MediaKind::Series, id).unwrap()
        else {
            panic!("expected a series");
        };
        assert_eq!(s.episodes_watched, vec![Episode { season: 2, episode: 1 }]);
        assert_eq!((s.current_season, s.current_episode), (2, 1));
    }

    #[test]
    fn test_series_progress_unknown_id() {
        let conn = test_conn();
        assert!(!update_series_progress(&conn, 7, 1, 1, true).unwrap());
    }

    #[test]
    fn test_corrupt_episode_history_is_an_error() {
        let conn = test_conn();
        let id = insert_series(&conn, &Series::new("Dark", SeriesStatus::Watching)).unwrap();
        conn.execute(
            "UPDATE series SET episodes_watched = 'not json' WHERE id = ?1",
            params![id],
        )
        .unwrap();

        assert!(get_item_by_id(&conn, MediaKind::Series, id).is_err());
        assert!(get_all_items(&conn, MediaKind::Series).is_err());
        // Progress must not overwrite the stored history with an empty list
        assert!(update_series_progress(&conn, id, 1, 1, true).is_err());
        let raw: String = conn
            .query_row(
                "SELECT episodes_watched FROM series WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(raw, "not json");
    }

    #[test]
    fn test_notes_blank_clears() {
        let conn = test_conn();
        let id = insert_book(&conn, &Book::new("Emma", BookStatus::Reading)).unwrap();
        assert!(set_notes(&conn, MediaKind::Book, id, Some("  slow start ")).unwrap());
        let item = get_item_by_id(&conn, MediaKind::Book, id).unwrap().unwrap();
        assert_eq!(item.notes(), Some("slow start"));

        assert!(set_notes(&conn, MediaKind::Book, id, Some("   ")).unwrap());
        let item = get_item_by_id(&conn, MediaKind::Book, id).unwrap().unwrap();
        assert_eq!(item.notes(), None);
    }

    #[test]
    fn test_favorites_and_delete() {
        let conn = test_conn();
        let a = insert_series(&conn, &Series::new("Dark", SeriesStatus::Completed)).unwrap();
        let b = insert_series(&conn, &Series::new("Lost", SeriesStatus::Dropped)).unwrap();
        set_favorite(&conn, MediaKind::Series, a, true).unwrap();

        let favs = get_favorites(&conn, MediaKind::Series).unwrap();
        assert_eq!(favs.len(), 1);
        assert_eq!(favs[0].id(), a);

        assert!(delete_item(&conn, MediaKind::Series, b).unwrap());
        assert!(!delete_item(&conn, MediaKind::Series, b).unwrap());
        assert_eq!(get_all_items(&conn, MediaKind::Series).unwrap().len(), 1);
    }

    #[test]
    fn test_external_id_lookup() {
        let conn = test_conn();
        let mut movie = Movie::new("Inception", MovieStatus::WantToWatch);
        movie.imdb_id = Some("tt1375666".to_string());
        insert_movie(&conn, &movie).unwrap();

        let found = get_item_by_external_id(&conn, MediaKind::Movie, "tt1375666").unwrap();
        assert_eq!(found.map(|m| m.title().to_string()), Some("Inception".to_string()));
        assert!(get_item_by_external_id(&conn, MediaKind::Movie, "tt0000000")
            .unwrap()
            .is_none());
    }
}
