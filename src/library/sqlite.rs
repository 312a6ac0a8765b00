// SqliteLibrary — rusqlite-backed library implementing LibraryStore.
//
// Reads go through the LibraryStore trait so the recommender can run over
// any snapshot source. Writes are inherent methods: they validate input
// (ratings, duplicate external ids, unknown ids) and turn "no row changed"
// into TrackerError::NotFound.

use anyhow::Result;
use rusqlite::Connection;
use tracing::{debug, info};

use super::models::{Book, MediaKind, Movie, Series, Status, TrackedItem};
use super::queries;
use super::traits::LibraryStore;
use crate::error::{check_rating, TrackerError, TrackerResult};

pub struct SqliteLibrary {
    conn: Connection,
}

impl SqliteLibrary {
    /// Wrap an already-opened connection (see `library::initialize` / `library::open`).
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// A fresh library held entirely in memory.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        super::schema::create_tables(&conn)?;
        Ok(Self { conn })
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn table_count(&self) -> Result<i64> {
        super::schema::table_count(&self.conn)
    }

    pub fn schema_version(&self) -> Result<i64> {
        super::schema::schema_version(&self.conn)
    }

    /// Fetch one item or fail with NotFound.
    pub fn get(&self, kind: MediaKind, id: i64) -> TrackerResult<TrackedItem> {
        self.item_by_id(kind, id)?
            .ok_or(TrackerError::NotFound { kind, id })
    }

    pub fn favorites(&self, kind: MediaKind) -> Result<Vec<TrackedItem>> {
        queries::get_favorites(&self.conn, kind)
    }

    // --- Adding ---

    pub fn add_movie(&self, movie: &Movie) -> TrackerResult<i64> {
        movie.user_rating.map(check_rating).transpose()?;
        self.reject_duplicate(MediaKind::Movie, movie.imdb_id.as_deref())?;
        let id = queries::insert_movie(&self.conn, movie)?;
        info!(id, title = %movie.title, status = movie.status.as_str(), "Added movie");
        Ok(id)
    }

    pub fn add_book(&self, book: &Book) -> TrackerResult<i64> {
        book.user_rating.map(check_rating).transpose()?;
        self.reject_duplicate(MediaKind::Book, book.olid.as_deref())?;
        let id = queries::insert_book(&self.conn, book)?;
        info!(id, title = %book.title, status = book.status.as_str(), "Added book");
        Ok(id)
    }

    pub fn add_series(&self, series: &Series) -> TrackerResult<i64> {
        series.user_rating.map(check_rating).transpose()?;
        self.reject_duplicate(MediaKind::Series, series.imdb_id.as_deref())?;
        let id = queries::insert_series(&self.conn, series)?;
        info!(id, title = %series.title, status = series.status.as_str(), "Added series");
        Ok(id)
    }

    fn reject_duplicate(&self, kind: MediaKind, external_id: Option<&str>) -> TrackerResult<()> {
        let Some(external_id) = external_id else {
            return Ok(());
        };
        if let Some(existing) = queries::get_item_by_external_id(&self.conn, kind, external_id)? {
            return Err(anyhow::anyhow!(
                "'{}' is already in your library with status: {}",
                existing.title(),
                existing.status()
            )
            .into());
        }
        Ok(())
    }

    // --- Updating ---

    pub fn update_status(&self, id: i64, status: Status, rating: Option<u8>) -> TrackerResult<()> {
        rating.map(check_rating).transpose()?;
        let kind = status.kind();
        if !queries::update_status(&self.conn, id, status, rating)? {
            return Err(TrackerError::NotFound { kind, id });
        }
        debug!(id, kind = kind.as_str(), status = status.as_str(), "Updated status");
        Ok(())
    }

    pub fn set_favorite(&self, kind: MediaKind, id: i64, is_favorite: bool) -> TrackerResult<()> {
        if !queries::set_favorite(&self.conn, kind, id, is_favorite)? {
            return Err(TrackerError::NotFound { kind, id });
        }
        Ok(())
    }

    /// Flip an item's favorite flag and return the new value.
    pub fn toggle_favorite(&self, kind: MediaKind, id: i64) -> TrackerResult<bool> {
        let now_favorite = !self.get(kind, id)?.is_favorite();
        self.set_favorite(kind, id, now_favorite)?;
        Ok(now_favorite)
    }

    pub fn set_notes(&self, kind: MediaKind, id: i64, notes: Option<&str>) -> TrackerResult<()> {
        if !queries::set_notes(&self.conn, kind, id, notes)? {
            return Err(TrackerError::NotFound { kind, id });
        }
        Ok(())
    }

    pub fn update_progress(
        &self,
        series_id: i64,
        season: u32,
        episode: u32,
        watched: bool,
    ) -> TrackerResult<()> {
        if !queries::update_series_progress(&self.conn, series_id, season, episode, watched)? {
            return Err(TrackerError::NotFound {
                kind: MediaKind::Series,
                id: series_id,
            });
        }
        debug!(series_id, season, episode, watched, "Updated series progress");
        Ok(())
    }

    pub fn delete(&self, kind: MediaKind, id: i64) -> TrackerResult<()> {
        if !queries::delete_item(&self.conn, kind, id)? {
            return Err(TrackerError::NotFound { kind, id });
        }
        info!(id, kind = kind.as_str(), "Removed item");
        Ok(())
    }
}

impl LibraryStore for SqliteLibrary {
    fn items_by_status(&self, status: Status) -> Result<Vec<TrackedItem>> {
        let items = queries::get_items_by_status(&self.conn, status)?;
        debug!(
            kind = status.kind().as_str(),
            status = status.as_str(),
            count = items.len(),
            "Loaded items by status"
        );
        Ok(items)
    }

    fn all_items(&self, kind: MediaKind) -> Result<Vec<TrackedItem>> {
        queries::get_all_items(&self.conn, kind)
    }

    fn item_by_id(&self, kind: MediaKind, id: i64) -> Result<Option<TrackedItem>> {
        queries::get_item_by_id(&self.conn, kind, id)
    }
}
