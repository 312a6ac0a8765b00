// Configuration — environment-driven settings for the CLI.
//
// Reads MEDIA_TRACKER_DB_PATH, MEDIA_TRACKER_SIMILAR_LIMIT and
// MEDIA_TRACKER_SEED, with defaults for each.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::recommend::DEFAULT_LIMIT;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded at startup via dotenvy, so everything here can
/// also live there.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    /// Length of `similar` lists when --limit isn't given
    pub similar_limit: usize,
    /// Fixed seed for random picks (MEDIA_TRACKER_SEED). Unset means OS entropy.
    pub seed: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every value has a default; only malformed values are errors.
    pub fn load() -> Result<Self> {
        let db_path = env::var("MEDIA_TRACKER_DB_PATH").unwrap_or_else(|_| default_db_path());

        let similar_limit = match env::var("MEDIA_TRACKER_SIMILAR_LIMIT") {
            Ok(raw) => parse_limit(&raw)?,
            Err(_) => DEFAULT_LIMIT,
        };

        let seed = match env::var("MEDIA_TRACKER_SEED") {
            Ok(raw) => Some(raw.trim().parse::<u64>().with_context(|| {
                format!("MEDIA_TRACKER_SEED must be an unsigned integer, got '{raw}'")
            })?),
            Err(_) => None,
        };

        Ok(Self {
            db_path,
            similar_limit,
            seed,
        })
    }
}

/// `<data dir>/media-tracker/library.db`, or `./media-tracker.db` on
/// platforms without a data directory.
pub fn default_db_path() -> String {
    dirs::data_dir()
        .map(|dir| dir.join("media-tracker").join("library.db"))
        .unwrap_or_else(|| PathBuf::from("./media-tracker.db"))
        .to_string_lossy()
        .into_owned()
}

/// Parse a similar-list length. Zero is rejected: an empty list is never
/// what the user asked for.
pub fn parse_limit(raw: &str) -> Result<usize> {
    let limit: usize = raw
        .trim()
        .parse()
        .with_context(|| format!("MEDIA_TRACKER_SIMILAR_LIMIT must be a positive integer, got '{raw}'"))?;
    if limit == 0 {
        anyhow::bail!("MEDIA_TRACKER_SIMILAR_LIMIT must be a positive integer, got '{raw}'");
    }
    Ok(limit)
}
