// LibraryStore — the read-side contract the recommendation engine needs.
//
// The engine never touches SQL. It asks a store for the items of one kind,
// optionally filtered by status, and scores the snapshot it gets back.
// Implementors: SqliteLibrary. Tests can implement it over a Vec.

use anyhow::Result;

use super::models::{MediaKind, Status, TrackedItem};

pub trait LibraryStore {
    /// Every item of `status.kind()` currently in `status`.
    fn items_by_status(&self, status: Status) -> Result<Vec<TrackedItem>>;

    /// Every item of one kind.
    fn all_items(&self, kind: MediaKind) -> Result<Vec<TrackedItem>>;

    /// A single item, if the id exists for that kind.
    fn item_by_id(&self, kind: MediaKind, id: i64) -> Result<Option<TrackedItem>>;
}
