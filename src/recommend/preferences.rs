// Preference analysis — turn finished, rated items into tag weights.
//
// Every tag on a completed item earns that item's rating (or a neutral 5
// when unrated). Weights add up across items, so a genre the user keeps
// finishing and rating highly dominates the map.

use std::collections::HashMap;

use super::facet::Facet;
use crate::library::models::TrackedItem;

/// Weight an unrated completed item contributes to each of its tags.
pub const UNRATED_WEIGHT: f64 = 5.0;

/// Tag -> accumulated weight, remembering the order tags were first seen.
///
/// Insertion order is what breaks ties in `top_tags`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferenceMap {
    weights: HashMap<String, f64>,
    order: Vec<String>,
}

impl PreferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `weight` to a tag's running total.
    pub fn add(&mut self, tag: &str, weight: f64) {
        match self.weights.get_mut(tag) {
            Some(total) => *total += weight,
            None => {
                self.weights.insert(tag.to_string(), weight);
                self.order.push(tag.to_string());
            }
        }
    }

    /// Weight for a tag, 0.0 when the tag was never seen.
    pub fn get(&self, tag: &str) -> f64 {
        self.weights.get(tag).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.weights.contains_key(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// (tag, weight) pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.order.iter().map(|tag| (tag.as_str(), self.get(tag)))
    }

    /// The `n` heaviest tags, heaviest first. Equal weights keep first-seen order.
    pub fn top_tags(&self, n: usize) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(n);
        ranked
    }
}

impl<S: AsRef<str>> FromIterator<(S, f64)> for PreferenceMap {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut prefs = PreferenceMap::new();
        for (tag, weight) in iter {
            prefs.add(tag.as_ref(), weight);
        }
        prefs
    }
}

/// Build a preference map from the completed items of one media kind.
///
/// Filtering to "completed" is the caller's job; every item passed in
/// contributes. Items without tags contribute nothing. An empty input (or
/// one where nothing has tags) gives an empty map, which is a normal result.
pub fn analyze_preferences(completed: &[TrackedItem]) -> PreferenceMap {
    let mut prefs = PreferenceMap::new();

    for item in completed {
        let facet = Facet::of(item);
        if facet.tags.is_empty() {
            continue;
        }
        let weight = facet.rating.map(f64::from).unwrap_or(UNRATED_WEIGHT);
        for tag in facet.tags.iter() {
            prefs.add(tag, weight);
        }
    }

    prefs
}
