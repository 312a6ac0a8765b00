// Recommendation engine — preference-weighted picks and similar-item lists.
//
// Data flow for a smart pick:
//   completed items -> analyze_preferences -> PreferenceMap
//   backlog pool    -> score_facet per item -> select (tie-break via Picker)
//
// Similarity ranking is independent: find_similar compares one reference
// item to every other item of its kind with a per-kind Rubric.
//
// Everything below `Recommender` is pure and works on slices. `Recommender`
// only adds the store lookups the CLI needs.

pub mod facet;
pub mod preferences;
pub mod scorer;
pub mod selector;
pub mod similarity;
pub mod tags;

pub use preferences::{analyze_preferences, PreferenceMap};
pub use scorer::score_item;
pub use selector::{select, Basis, Picker, RandomPicker, Recommendation};
pub use similarity::{find_similar, Rubric, SimilarItem, DEFAULT_LIMIT};

use anyhow::Result;
use tracing::debug;

use crate::error::TrackerResult;
use crate::library::models::{MediaKind, TrackedItem};
use crate::library::traits::LibraryStore;

/// Runs the engine against whatever a LibraryStore currently holds.
pub struct Recommender<'a, S: LibraryStore + ?Sized> {
    store: &'a S,
    picker: Box<dyn Picker + 'a>,
}

impl<'a, S: LibraryStore + ?Sized> Recommender<'a, S> {
    /// Recommender with an OS-seeded random picker.
    pub fn new(store: &'a S) -> Self {
        Self::with_picker(store, RandomPicker::from_entropy())
    }

    pub fn with_picker(store: &'a S, picker: impl Picker + 'a) -> Self {
        Self {
            store,
            picker: Box::new(picker),
        }
    }

    /// Preference map built from the kind's completed items.
    pub fn preferences(&self, kind: MediaKind) -> Result<PreferenceMap> {
        let completed = self.store.items_by_status(kind.completed_status())?;
        Ok(analyze_preferences(&completed))
    }

    /// Recommend something by media type name ("movie", "book", "series").
    ///
    /// An unknown name is an error; an empty backlog is not.
    pub fn recommend(&mut self, media_type: &str, smart: bool) -> TrackerResult<Recommendation> {
        let kind: MediaKind = media_type.parse()?;
        self.recommend_kind(kind, smart)
    }

    pub fn recommend_kind(&mut self, kind: MediaKind, smart: bool) -> TrackerResult<Recommendation> {
        let pool = self.store.items_by_status(kind.backlog_status())?;

        // Preferences only matter for a smart pick from a non-empty pool
        let prefs = if smart && !pool.is_empty() {
            self.preferences(kind)?
        } else {
            PreferenceMap::new()
        };

        debug!(
            kind = kind.as_str(),
            pool = pool.len(),
            tags = prefs.len(),
            smart,
            "Selecting recommendation"
        );

        let recommendation = select(kind, pool, &prefs, smart, self.picker.as_mut());

        if let Basis::Preferred { score, .. } = &recommendation.basis {
            debug!(kind = kind.as_str(), score = *score, "Preference match");
        }

        Ok(recommendation)
    }

    /// Items of the same kind most similar to `item`.
    pub fn find_similar(&self, item: &TrackedItem, limit: usize) -> TrackerResult<Vec<SimilarItem>> {
        let library = self.store.all_items(item.kind())?;
        let similar = find_similar(item, &library, limit);
        debug!(
            kind = item.kind().as_str(),
            id = item.id(),
            library = library.len(),
            matches = similar.len(),
            "Ranked similar items"
        );
        Ok(similar)
    }
}
