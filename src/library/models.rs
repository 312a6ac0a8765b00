// Data models — the records the library stores and the engine reads.
//
// Status values are closed enums per media kind. The snake_case strings
// ("want_to_watch", ...) only exist at the storage and CLI boundary, via
// `as_str` / `Status::parse`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TrackerError, TrackerResult};

/// The three kinds of media the tracker knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Book,
    Series,
}

impl MediaKind {
    pub const ALL: [MediaKind; 3] = [MediaKind::Movie, MediaKind::Book, MediaKind::Series];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Book => "book",
            MediaKind::Series => "series",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movies",
            MediaKind::Book => "books",
            MediaKind::Series => "series",
        }
    }

    /// What a single tag is called for this kind ("genre" or "subject").
    pub fn tag_noun(&self) -> &'static str {
        match self {
            MediaKind::Book => "subject",
            MediaKind::Movie | MediaKind::Series => "genre",
        }
    }

    /// The "still to consume" status that recommendation pools are drawn from.
    pub fn backlog_status(&self) -> Status {
        match self {
            MediaKind::Movie => Status::Movie(MovieStatus::WantToWatch),
            MediaKind::Book => Status::Book(BookStatus::WantToRead),
            MediaKind::Series => Status::Series(SeriesStatus::WantToWatch),
        }
    }

    /// The "finished" status whose items feed the preference map.
    pub fn completed_status(&self) -> Status {
        match self {
            MediaKind::Movie => Status::Movie(MovieStatus::Watched),
            MediaKind::Book => Status::Book(BookStatus::Read),
            MediaKind::Series => Status::Series(SeriesStatus::Completed),
        }
    }

    /// Every status value for this kind, in display order.
    pub fn statuses(&self) -> Vec<Status> {
        match self {
            MediaKind::Movie => MovieStatus::ALL.iter().copied().map(Status::Movie).collect(),
            MediaKind::Book => BookStatus::ALL.iter().copied().map(Status::Book).collect(),
            MediaKind::Series => SeriesStatus::ALL.iter().copied().map(Status::Series).collect(),
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Ok(MediaKind::Movie),
            "book" => Ok(MediaKind::Book),
            "series" => Ok(MediaKind::Series),
            _ => Err(TrackerError::UnknownMediaType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovieStatus {
    Watched,
    Watching,
    WantToWatch,
}

impl MovieStatus {
    pub const ALL: [MovieStatus; 3] = [
        MovieStatus::Watched,
        MovieStatus::Watching,
        MovieStatus::WantToWatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MovieStatus::Watched => "watched",
            MovieStatus::Watching => "watching",
            MovieStatus::WantToWatch => "want_to_watch",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    Read,
    Reading,
    WantToRead,
}

impl BookStatus {
    pub const ALL: [BookStatus; 3] = [BookStatus::Read, BookStatus::Reading, BookStatus::WantToRead];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Read => "read",
            BookStatus::Reading => "reading",
            BookStatus::WantToRead => "want_to_read",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesStatus {
    Watching,
    Completed,
    OnHold,
    Dropped,
    WantToWatch,
}

impl SeriesStatus {
    pub const ALL: [SeriesStatus; 5] = [
        SeriesStatus::Watching,
        SeriesStatus::Completed,
        SeriesStatus::OnHold,
        SeriesStatus::Dropped,
        SeriesStatus::WantToWatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesStatus::Watching => "watching",
            SeriesStatus::Completed => "completed",
            SeriesStatus::OnHold => "on_hold",
            SeriesStatus::Dropped => "dropped",
            SeriesStatus::WantToWatch => "want_to_watch",
        }
    }
}

macro_rules! impl_status_from_str {
    ($status:ident, $kind:expr) => {
        impl FromStr for $status {
            type Err = TrackerError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $status::ALL
                    .iter()
                    .copied()
                    .find(|status| status.as_str() == s.trim())
                    .ok_or_else(|| TrackerError::UnknownStatus {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

impl_status_from_str!(MovieStatus, MediaKind::Movie);
impl_status_from_str!(BookStatus, MediaKind::Book);
impl_status_from_str!(SeriesStatus, MediaKind::Series);

/// A status tagged with the media kind it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Movie(MovieStatus),
    Book(BookStatus),
    Series(SeriesStatus),
}

impl Status {
    pub fn kind(&self) -> MediaKind {
        match self {
            Status::Movie(_) => MediaKind::Movie,
            Status::Book(_) => MediaKind::Book,
            Status::Series(_) => MediaKind::Series,
        }
    }

    /// The persisted (snake_case) form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Movie(s) => s.as_str(),
            Status::Book(s) => s.as_str(),
            Status::Series(s) => s.as_str(),
        }
    }

    /// Human-readable label, e.g. "Want To Watch".
    pub fn label(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" ")
    }

    /// Parse a persisted status string for the given kind.
    pub fn parse(kind: MediaKind, value: &str) -> TrackerResult<Status> {
        kind.statuses()
            .into_iter()
            .find(|s| s.as_str() == value.trim())
            .ok_or_else(|| TrackerError::UnknownStatus {
                kind,
                value: value.to_string(),
            })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single watched episode of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub season: u32,
    pub episode: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub imdb_id: Option<String>,
    pub title: String,
    pub year: Option<String>,
    /// Comma-separated genres, e.g. "Action, Drama"
    pub genre: Option<String>,
    pub director: Option<String>,
    pub plot: Option<String>,
    pub imdb_rating: Option<String>,
    pub status: MovieStatus,
    pub user_rating: Option<u8>,
    pub date_added: Option<DateTime<Utc>>,
    pub date_completed: Option<DateTime<Utc>>,
    pub is_favorite: bool,
    pub notes: Option<String>,
}

impl Movie {
    pub fn new(title: &str, status: MovieStatus) -> Self {
        Self {
            id: 0,
            imdb_id: None,
            title: title.to_string(),
            year: None,
            genre: None,
            director: None,
            plot: None,
            imdb_rating: None,
            status,
            user_rating: None,
            date_added: None,
            date_completed: None,
            is_favorite: false,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    /// Open Library work id
    pub olid: Option<String>,
    pub title: String,
    pub author: Option<String>,
    /// Comma-separated subjects
    pub subjects: Option<String>,
    pub publish_year: Option<i32>,
    pub status: BookStatus,
    pub user_rating: Option<u8>,
    pub date_added: Option<DateTime<Utc>>,
    pub date_completed: Option<DateTime<Utc>>,
    pub is_favorite: bool,
    pub notes: Option<String>,
}

impl Book {
    pub fn new(title: &str, status: BookStatus) -> Self {
        Self {
            id: 0,
            olid: None,
            title: title.to_string(),
            author: None,
            subjects: None,
            publish_year: None,
            status,
            user_rating: None,
            date_added: None,
            date_completed: None,
            is_favorite: false,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: i64,
    pub imdb_id: Option<String>,
    pub title: String,
    /// Either a single year or a run like "2019-2023"
    pub year: Option<String>,
    pub genre: Option<String>,
    pub plot: Option<String>,
    pub imdb_rating: Option<String>,
    pub total_seasons: u32,
    pub status: SeriesStatus,
    pub user_rating: Option<u8>,
    pub date_added: Option<DateTime<Utc>>,
    pub is_favorite: bool,
    pub notes: Option<String>,
    pub current_season: u32,
    pub current_episode: u32,
    pub episodes_watched: Vec<Episode>,
}

impl Series {
    pub fn new(title: &str, status: SeriesStatus) -> Self {
        Self {
            id: 0,
            imdb_id: None,
            title: title.to_string(),
            year: None,
            genre: None,
            plot: None,
            imdb_rating: None,
            total_seasons: 1,
            status,
            user_rating: None,
            date_added: None,
            is_favorite: false,
            notes: None,
            current_season: 1,
            current_episode: 1,
            episodes_watched: Vec::new(),
        }
    }
}

/// Any item in the library.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackedItem {
    Movie(Movie),
    Book(Book),
    Series(Series),
}

impl TrackedItem {
    pub fn kind(&self) -> MediaKind {
        match self {
            TrackedItem::Movie(_) => MediaKind::Movie,
            TrackedItem::Book(_) => MediaKind::Book,
            TrackedItem::Series(_) => MediaKind::Series,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            TrackedItem::Movie(m) => m.id,
            TrackedItem::Book(b) => b.id,
            TrackedItem::Series(s) => s.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            TrackedItem::Movie(m) => &m.title,
            TrackedItem::Book(b) => &b.title,
            TrackedItem::Series(s) => &s.title,
        }
    }

    pub fn status(&self) -> Status {
        match self {
            TrackedItem::Movie(m) => Status::Movie(m.status),
            TrackedItem::Book(b) => Status::Book(b.status),
            TrackedItem::Series(s) => Status::Series(s.status),
        }
    }

    pub fn user_rating(&self) -> Option<u8> {
        match self {
            TrackedItem::Movie(m) => m.user_rating,
            TrackedItem::Book(b) => b.user_rating,
            TrackedItem::Series(s) => s.user_rating,
        }
    }

    pub fn is_favorite(&self) -> bool {
        match self {
            TrackedItem::Movie(m) => m.is_favorite,
            TrackedItem::Book(b) => b.is_favorite,
            TrackedItem::Series(s) => s.is_favorite,
        }
    }

    pub fn notes(&self) -> Option<&str> {
        match self {
            TrackedItem::Movie(m) => m.notes.as_deref(),
            TrackedItem::Book(b) => b.notes.as_deref(),
            TrackedItem::Series(s) => s.notes.as_deref(),
        }
    }

    /// The raw comma-separated genre (movies, series) or subject (books) string.
    pub fn tag_field(&self) -> Option<&str> {
        match self {
            TrackedItem::Movie(m) => m.genre.as_deref(),
            TrackedItem::Book(b) => b.subjects.as_deref(),
            TrackedItem::Series(s) => s.genre.as_deref(),
        }
    }

    /// Year string for display. Books carry a numeric publish year instead.
    pub fn year_label(&self) -> Option<String> {
        match self {
            TrackedItem::Movie(m) => m.year.clone(),
            TrackedItem::Book(b) => b.publish_year.map(|y| y.to_string()),
            TrackedItem::Series(s) => s.year.clone(),
        }
    }

    /// Director for movies, author for books. Series have neither.
    pub fn creator(&self) -> Option<&str> {
        match self {
            TrackedItem::Movie(m) => m.director.as_deref(),
            TrackedItem::Book(b) => b.author.as_deref(),
            TrackedItem::Series(_) => None,
        }
    }
}

impl From<Movie> for TrackedItem {
    fn from(movie: Movie) -> Self {
        TrackedItem::Movie(movie)
    }
}

impl From<Book> for TrackedItem {
    fn from(book: Book) -> Self {
        TrackedItem::Book(book)
    }
}

impl From<Series> for TrackedItem {
    fn from(series: Series) -> Self {
        TrackedItem::Series(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_parse() {
        assert_eq!("movie".parse::<MediaKind>().unwrap(), MediaKind::Movie);
        assert_eq!(" Book ".parse::<MediaKind>().unwrap(), MediaKind::Book);
        assert_eq!("series".parse::<MediaKind>().unwrap(), MediaKind::Series);
    }

    #[test]
    fn test_media_kind_unknown() {
        let err = "podcast".parse::<MediaKind>().unwrap_err();
        assert!(matches!(err, TrackerError::UnknownMediaType(ref s) if s == "podcast"));
    }

    #[test]
    fn test_status_round_trip_through_persisted_form() {
        for kind in MediaKind::ALL {
            for status in kind.statuses() {
                assert_eq!(Status::parse(kind, status.as_str()).unwrap(), status);
            }
        }
    }

    #[test]
    fn test_status_is_scoped_to_kind() {
        // "read" is a book status, not a movie one
        assert!(Status::parse(MediaKind::Book, "read").is_ok());
        assert!(matches!(
            Status::parse(MediaKind::Movie, "read"),
            Err(TrackerError::UnknownStatus { kind: MediaKind::Movie, .. })
        ));
    }

    #[test]
    fn test_kind_status_from_str() {
        assert_eq!("on_hold".parse::<SeriesStatus>().unwrap(), SeriesStatus::OnHold);
        assert_eq!(" want_to_read".parse::<BookStatus>().unwrap(), BookStatus::WantToRead);
        assert!(matches!(
            "read".parse::<MovieStatus>(),
            Err(TrackerError::UnknownStatus { kind: MediaKind::Movie, .. })
        ));
    }

    #[test]
    fn test_status_label() {
        assert_eq!(Status::Movie(MovieStatus::WantToWatch).label(), "Want To Watch");
        assert_eq!(Status::Series(SeriesStatus::OnHold).label(), "On Hold");
    }

    #[test]
    fn test_backlog_and_completed_statuses() {
        assert_eq!(MediaKind::Book.backlog_status().as_str(), "want_to_read");
        assert_eq!(MediaKind::Book.completed_status().as_str(), "read");
        assert_eq!(MediaKind::Series.completed_status().as_str(), "completed");
        assert_eq!(MediaKind::Movie.completed_status().as_str(), "watched");
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&SeriesStatus::WantToWatch).unwrap();
        assert_eq!(json, "\"want_to_watch\"");
    }

    #[test]
    fn test_creator_per_kind() {
        let mut movie = Movie::new("Heat", MovieStatus::Watched);
        movie.director = Some("Michael Mann".to_string());
        let mut book = Book::new("Dune", BookStatus::Read);
        book.author = Some("Frank Herbert".to_string());

        assert_eq!(TrackedItem::from(movie).creator(), Some("Michael Mann"));
        assert_eq!(TrackedItem::from(book).creator(), Some("Frank Herbert"));
        assert_eq!(
            TrackedItem::from(Series::new("Dark", SeriesStatus::Completed)).creator(),
            None
        );
    }
}
