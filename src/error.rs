// Domain errors — failures a caller has to tell apart.
//
// Everything else (SQL failures, I/O) travels as anyhow::Error and is
// wrapped transparently in `TrackerError::Store`. An empty recommendation
// pool is NOT an error; it comes back as a Recommendation with no item.

use crate::library::models::MediaKind;

#[derive(thiserror::Error, Debug)]
pub enum TrackerError {
    /// The caller named a media kind we don't track.
    #[error("Unknown media type: {0}")]
    UnknownMediaType(String),

    #[error("Unknown {kind} status: {value}")]
    UnknownStatus { kind: MediaKind, value: String },

    #[error("Rating must be between 1 and 10, got {0}")]
    RatingOutOfRange(u8),

    #[error("Unknown import strategy: {0} (expected skip, replace or add)")]
    UnknownImportStrategy(String),

    #[error("No {kind} with id {id} in the library")]
    NotFound { kind: MediaKind, id: i64 },

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Validate a user rating (1-10 inclusive).
pub fn check_rating(rating: u8) -> TrackerResult<u8> {
    if (1..=10).contains(&rating) {
        Ok(rating)
    } else {
        Err(TrackerError::RatingOutOfRange(rating))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert_eq!(check_rating(1).unwrap(), 1);
        assert_eq!(check_rating(10).unwrap(), 10);
        assert!(matches!(
            check_rating(0),
            Err(TrackerError::RatingOutOfRange(0))
        ));
        assert!(matches!(
            check_rating(11),
            Err(TrackerError::RatingOutOfRange(11))
        ));
    }

    #[test]
    fn test_unknown_media_type_message() {
        let err = TrackerError::UnknownMediaType("podcast".to_string());
        assert_eq!(err.to_string(), "Unknown media type: podcast");
    }
}
