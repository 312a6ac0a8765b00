use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use media_tracker::config::Config;
use media_tracker::library::models::{
    Book, BookStatus, MediaKind, Movie, MovieStatus, Series, SeriesStatus, Status,
};
use media_tracker::library::export::{ImportStrategy, LibraryExport};
use media_tracker::library::{self, LibraryStore, SqliteLibrary};
use media_tracker::output::terminal;
use media_tracker::recommend::{RandomPicker, Recommender};
use media_tracker::stats::LibraryStats;

/// Media Tracker: keep track of movies, books and TV series.
///
/// Recommends what to watch or read next based on what you've finished and
/// how you rated it.
#[derive(Parser)]
#[command(name = "media-tracker", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the library database
    Init,

    /// Add a movie, book or series
    Add {
        #[command(subcommand)]
        item: AddCommand,
    },

    /// List items of one kind (movie, book, series)
    List {
        kind: String,

        /// Only items with this status (e.g. want_to_watch)
        #[arg(long)]
        status: Option<String>,

        /// Only favorites
        #[arg(long)]
        favorites: bool,
    },

    /// Show everything stored for one item
    Show { kind: String, id: i64 },

    /// Change an item's status, optionally rating it (1-10)
    Status {
        kind: String,
        id: i64,
        status: String,

        #[arg(long)]
        rating: Option<u8>,
    },

    /// Toggle an item's favorite flag, or set it with --on / --off
    Favorite {
        kind: String,
        id: i64,

        #[arg(long, conflicts_with = "off")]
        on: bool,

        #[arg(long)]
        off: bool,
    },

    /// Show an item's notes, or replace them (empty text clears)
    Notes {
        kind: String,
        id: i64,
        text: Option<String>,
    },

    /// Mark an episode of a series as watched (or not, with --unwatch)
    Progress {
        series_id: i64,
        season: u32,
        episode: u32,

        #[arg(long)]
        unwatch: bool,
    },

    /// Remove an item from the library
    Remove { kind: String, id: i64 },

    /// Recommend something to watch or read next
    Recommend {
        kind: String,

        /// Ignore your preferences and pick uniformly at random
        #[arg(long)]
        random: bool,
    },

    /// List items similar to one you already have
    Similar {
        kind: String,
        id: i64,

        /// How many to show (default: MEDIA_TRACKER_SIMILAR_LIMIT or 5)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Library statistics for one kind, or all of them
    Stats { kind: Option<String> },

    /// Export the whole library as JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<String>,
    },

    /// Import a JSON file written by `export`
    Import {
        path: String,

        /// What to do when an item's IMDb / Open Library id is already
        /// tracked: skip, replace or add
        #[arg(long, default_value = "skip")]
        strategy: ImportStrategy,
    },
}

#[derive(Subcommand)]
enum AddCommand {
    /// Add a movie
    Movie {
        title: String,
        #[arg(long)]
        year: Option<String>,
        /// Comma-separated genres, e.g. "Action, Drama"
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        director: Option<String>,
        #[arg(long)]
        plot: Option<String>,
        #[arg(long)]
        imdb_id: Option<String>,
        /// watched, watching or want_to_watch (default)
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        rating: Option<u8>,
    },

    /// Add a book
    Book {
        title: String,
        #[arg(long)]
        author: Option<String>,
        /// Comma-separated subjects
        #[arg(long)]
        subjects: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        /// Open Library work id
        #[arg(long)]
        olid: Option<String>,
        /// read, reading or want_to_read (default)
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        rating: Option<u8>,
    },

    /// Add a TV series
    Series {
        title: String,
        /// A year or a run like "2019-2023"
        #[arg(long)]
        year: Option<String>,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long, default_value = "1")]
        seasons: u32,
        #[arg(long)]
        imdb_id: Option<String>,
        /// watching, completed, on_hold, dropped or want_to_watch (default)
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        rating: Option<u8>,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("media_tracker=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Init => {
            info!("Initializing media library...");
            let lib = SqliteLibrary::new(library::initialize(&config.db_path)?);
            let table_count = lib.table_count()?;
            let schema_version = lib.schema_version()?;
            println!("Library initialized at: {}", config.db_path);
            println!("Tables created: {table_count} (schema version {schema_version})");
            println!("\nNext step: add something, e.g.");
            println!("  media-tracker add movie \"Heat\" --genre \"Crime, Drama\" --status watched --rating 9");
        }

        Commands::Add { item } => {
            let lib = open_library(&config)?;
            let (kind, id, title) = add_item(&lib, item)?;
            println!("{} Added {} #{}: {}", "+".green(), kind, id, title.bold());
        }

        Commands::List {
            kind,
            status,
            favorites,
        } => {
            let kind: MediaKind = kind.parse()?;
            let lib = open_library(&config)?;

            let status = status.map(|s| Status::parse(kind, &s)).transpose()?;
            let mut items = match status {
                Some(status) => lib.items_by_status(status)?,
                None => lib.all_items(kind)?,
            };
            if favorites {
                items.retain(|item| item.is_favorite());
            }

            let filter = match (status, favorites) {
                (Some(s), true) => Some(format!("status {} among favorites", s.label())),
                (Some(s), false) => Some(format!("status {}", s.label())),
                (None, true) => Some("favorites".to_string()),
                (None, false) => None,
            };
            terminal::display_item_list(kind, &items, filter.as_deref());
        }

        Commands::Show { kind, id } => {
            let kind: MediaKind = kind.parse()?;
            let lib = open_library(&config)?;
            terminal::display_item_detail(&lib.get(kind, id)?);
        }

        Commands::Status {
            kind,
            id,
            status,
            rating,
        } => {
            let kind: MediaKind = kind.parse()?;
            let status = Status::parse(kind, &status)?;
            let lib = open_library(&config)?;
            lib.update_status(id, status, rating)?;

            let item = lib.get(kind, id)?;
            match item.user_rating() {
                Some(r) => println!("'{}' is now {} ({}/10)", item.title(), status.label(), r),
                None => println!("'{}' is now {}", item.title(), status.label()),
            }
        }

        Commands::Favorite { kind, id, on, off } => {
            let kind: MediaKind = kind.parse()?;
            let lib = open_library(&config)?;
            let is_favorite = if on || off {
                lib.set_favorite(kind, id, on)?;
                on
            } else {
                lib.toggle_favorite(kind, id)?
            };
            let item = lib.get(kind, id)?;
            if is_favorite {
                println!("{} '{}' is a favorite", "*".yellow(), item.title());
            } else {
                println!("Removed '{}' from favorites", item.title());
            }
        }

        Commands::Notes { kind, id, text } => {
            let kind: MediaKind = kind.parse()?;
            let lib = open_library(&config)?;
            match text {
                Some(text) => {
                    lib.set_notes(kind, id, Some(&text))?;
                    if text.trim().is_empty() {
                        println!("Notes cleared");
                    } else {
                        println!("Notes saved");
                    }
                }
                None => {
                    let item = lib.get(kind, id)?;
                    println!("{}", item.notes().unwrap_or("(no notes)"));
                }
            }
        }

        Commands::Progress {
            series_id,
            season,
            episode,
            unwatch,
        } => {
            let lib = open_library(&config)?;
            lib.update_progress(series_id, season, episode, !unwatch)?;
            let verb = if unwatch { "unwatched" } else { "watched" };
            let title = lib.get(MediaKind::Series, series_id)?.title().to_string();
            println!("{title}: S{season:02}E{episode:02} marked {verb}");
        }

        Commands::Remove { kind, id } => {
            let kind: MediaKind = kind.parse()?;
            let lib = open_library(&config)?;
            let title = lib.get(kind, id)?.title().to_string();
            lib.delete(kind, id)?;
            println!("Removed '{title}'");
        }

        Commands::Recommend { kind, random } => {
            let lib = open_library(&config)?;
            let mut recommender = match config.seed {
                Some(seed) => Recommender::with_picker(&lib, RandomPicker::seeded(seed)),
                None => Recommender::new(&lib),
            };
            let rec = recommender.recommend(&kind, !random)?;
            terminal::display_recommendation(&rec);
        }

        Commands::Similar { kind, id, limit } => {
            let kind: MediaKind = kind.parse()?;
            let limit = limit.unwrap_or(config.similar_limit);
            if limit == 0 {
                anyhow::bail!("--limit must be at least 1");
            }
            let lib = open_library(&config)?;
            let reference = lib.get(kind, id)?;
            let similar = Recommender::new(&lib).find_similar(&reference, limit)?;
            terminal::display_similar(&reference, &similar);
        }

        Commands::Stats { kind } => {
            let kinds = match kind {
                Some(kind) => vec![kind.parse::<MediaKind>()?],
                None => MediaKind::ALL.to_vec(),
            };
            let lib = open_library(&config)?;
            for kind in kinds {
                let items = lib.all_items(kind)?;
                terminal::display_stats(&LibraryStats::compute(kind, &items));
            }
        }

        Commands::Export { output } => {
            let lib = open_library(&config)?;
            let export = library::export::export_library(&lib)?;
            let json = serde_json::to_string_pretty(&export)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    info!(path = %path, items = export.len(), "Exported library");
                    println!("Exported {} items to {}", export.len(), path);
                }
                None => println!("{json}"),
            }
        }

        Commands::Import { path, strategy } => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {path}"))?;
            let data: LibraryExport =
                serde_json::from_str(&raw).with_context(|| format!("Invalid JSON format in {path}"))?;
            let lib = open_library(&config)?;
            let summary = library::export::import_library(&lib, data, strategy)?;
            println!(
                "{} Imported {} movies, {} books, {} series from {}",
                "+".green(),
                summary.movies,
                summary.books,
                summary.series,
                path
            );
            if summary.skipped > 0 {
                println!(
                    "{}",
                    format!("Skipped {} already in your library", summary.skipped).dimmed()
                );
            }
        }
    }

    Ok(())
}

fn open_library(config: &Config) -> Result<SqliteLibrary> {
    Ok(SqliteLibrary::new(library::open(&config.db_path)?))
}

/// Build the new item from CLI arguments and store it.
fn add_item(lib: &SqliteLibrary, cmd: AddCommand) -> Result<(MediaKind, i64, String)> {
    match cmd {
        AddCommand::Movie {
            title,
            year,
            genre,
            director,
            plot,
            imdb_id,
            status,
            rating,
        } => {
            let status = status
                .as_deref()
                .map(str::parse::<MovieStatus>)
                .transpose()?
                .unwrap_or(MovieStatus::WantToWatch);
            let mut movie = Movie::new(&title, status);
            movie.year = year;
            movie.genre = genre;
            movie.director = director;
            movie.plot = plot;
            movie.imdb_id = imdb_id;
            movie.user_rating = rating;
            let id = lib.add_movie(&movie)?;
            Ok((MediaKind::Movie, id, title))
        }

        AddCommand::Book {
            title,
            author,
            subjects,
            year,
            olid,
            status,
            rating,
        } => {
            let status = status
                .as_deref()
                .map(str::parse::<BookStatus>)
                .transpose()?
                .unwrap_or(BookStatus::WantToRead);
            let mut book = Book::new(&title, status);
            book.author = author;
            book.subjects = subjects;
            book.publish_year = year;
            book.olid = olid;
            book.user_rating = rating;
            let id = lib.add_book(&book)?;
            Ok((MediaKind::Book, id, title))
        }

        AddCommand::Series {
            title,
            year,
            genre,
            seasons,
            imdb_id,
            status,
            rating,
        } => {
            let status = status
                .as_deref()
                .map(str::parse::<SeriesStatus>)
                .transpose()?
                .unwrap_or(SeriesStatus::WantToWatch);
            let mut series = Series::new(&title, status);
            series.year = year;
            series.genre = genre;
            series.total_seasons = seasons.max(1);
            series.imdb_id = imdb_id;
            series.user_rating = rating;
            let id = lib.add_series(&series)?;
            Ok((MediaKind::Series, id, title))
        }
    }
}
