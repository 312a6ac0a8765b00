// Colored terminal output for library lists, picks and stats.
//
// This module handles all terminal-specific formatting. The main.rs command
// handlers delegate here.

use colored::Colorize;

use crate::library::models::{MediaKind, Status, TrackedItem};
use crate::recommend::{Recommendation, SimilarItem};
use crate::stats::LibraryStats;

/// Display a list of items of one kind.
pub fn display_item_list(kind: MediaKind, items: &[TrackedItem], filter: Option<&str>) {
    if items.is_empty() {
        match filter {
            Some(f) => println!("No {} matching {}.", kind.plural(), f),
            None => println!(
                "No {} in your library yet. Add one with `media-tracker add {}`.",
                kind.plural(),
                kind.as_str()
            ),
        }
        return;
    }

    let title = format!("=== {} ({}) ===", capitalize(kind.plural()), items.len());
    println!("\n{}", title.bold());
    println!();

    println!(
        "  {:>4}  {:<40} {:<11} {:<15} {:>6}",
        "ID".dimmed(),
        "Title".dimmed(),
        "Year".dimmed(),
        "Status".dimmed(),
        "Rating".dimmed(),
    );
    println!("  {}", "-".repeat(82).dimmed());

    for item in items {
        let star = if item.is_favorite() { "*" } else { " " };
        println!(
            "  {:>4}{} {:<40} {:<11} {:<15} {:>6}",
            item.id(),
            star.yellow(),
            super::truncate_chars(item.title(), 37),
            item.year_label().unwrap_or_default(),
            colorize_status(item.status()),
            format_rating(item.user_rating()),
        );
    }
    println!();
}

/// Display everything stored for a single item.
pub fn display_item_detail(item: &TrackedItem) {
    let heading = match item.year_label() {
        Some(year) => format!("=== {} ({}) ===", item.title(), year),
        None => format!("=== {} ===", item.title()),
    };
    println!("\n{}", heading.bold());

    println!("  {} #{}", capitalize(item.kind().as_str()), item.id());
    println!("  Status: {}", colorize_status(item.status()));
    println!("  Your rating: {}", format_rating(item.user_rating()));
    if item.is_favorite() {
        println!("  {}", "Favorite".yellow());
    }

    match item {
        TrackedItem::Movie(m) => {
            print_field("Genre", m.genre.as_deref());
            print_field("Director", m.director.as_deref());
            print_field("IMDb rating", m.imdb_rating.as_deref());
            print_field("IMDb id", m.imdb_id.as_deref());
            if let Some(done) = m.date_completed {
                println!("  Watched: {}", done.format("%Y-%m-%d"));
            }
            print_wrapped("Plot", m.plot.as_deref());
        }
        TrackedItem::Book(b) => {
            print_field("Author", b.author.as_deref());
            print_field("Subjects", b.subjects.as_deref());
            print_field("Open Library id", b.olid.as_deref());
            if let Some(done) = b.date_completed {
                println!("  Finished: {}", done.format("%Y-%m-%d"));
            }
        }
        TrackedItem::Series(s) => {
            print_field("Genre", s.genre.as_deref());
            print_field("IMDb rating", s.imdb_rating.as_deref());
            print_field("IMDb id", s.imdb_id.as_deref());
            println!(
                "  Progress: S{:02}E{:02} of {} season(s), {} episode(s) watched",
                s.current_season,
                s.current_episode,
                s.total_seasons,
                s.episodes_watched.len()
            );
            print_wrapped("Plot", s.plot.as_deref());
        }
    }

    print_wrapped("Notes", item.notes());
}

/// Display a recommendation and the reason it was picked.
pub fn display_recommendation(rec: &Recommendation) {
    let Some(item) = &rec.item else {
        println!("{}", rec.reason().dimmed());
        return;
    };

    println!("\n{}", "=== Recommendation ===".bold());
    let year = item
        .year_label()
        .map(|y| format!(" ({y})"))
        .unwrap_or_default();
    println!("  {}{}  {}", item.title().green().bold(), year, format!("#{}", item.id()).dimmed());
    if let Some(tags) = item.tag_field() {
        println!("  {}", tags.dimmed());
    }
    if let Some(creator) = item.creator() {
        println!("  by {creator}");
    }
    println!("\n  {}", rec.reason());
}

/// Display a similar-items list for `reference`.
pub fn display_similar(reference: &TrackedItem, similar: &[SimilarItem]) {
    if similar.is_empty() {
        println!(
            "No {} in your library are similar to '{}'.",
            reference.kind().plural(),
            reference.title()
        );
        return;
    }

    println!(
        "\n{}",
        format!("=== More like '{}' ===", reference.title()).bold()
    );
    println!();
    for (i, entry) in similar.iter().enumerate() {
        println!(
            "  {:>2}. {:<40} {:>5.1}  {}",
            i + 1,
            super::truncate_chars(entry.item.title(), 37),
            entry.score,
            colorize_status(entry.item.status()),
        );
    }
    println!();
}

/// Display library statistics for one kind.
pub fn display_stats(stats: &LibraryStats) {
    println!(
        "\n{}",
        format!("=== {} ({} total) ===", capitalize(stats.kind.plural()), stats.total).bold()
    );

    for (status, count) in &stats.by_status {
        let label = Status::parse(stats.kind, status)
            .map(|s| s.label())
            .unwrap_or_else(|_| status.clone());
        println!("  {:<16} {:>4}", label, count);
    }
    println!("  {:<16} {:>4}", "Favorites", stats.favorites);

    match stats.average_rating {
        Some(avg) => println!("  {:<16} {:>6.1}/10", "Average rating", avg),
        None => println!("  {:<16} {:>6}", "Average rating", "-".dimmed()),
    }

    if stats.kind == MediaKind::Series {
        println!("  {:<16} {:>4}", "Episodes watched", stats.episodes_watched);
    }

    if !stats.top_tags.is_empty() {
        println!("\n  Top {}s:", stats.kind.tag_noun());
        for (tag, count) in &stats.top_tags {
            println!("    {:<24} {:>4}", tag, count);
        }
    }

    let rated: usize = stats.rating_distribution.iter().sum();
    if rated > 0 {
        println!("\n  Ratings:");
        for (i, count) in stats.rating_distribution.iter().enumerate().rev() {
            if *count > 0 {
                println!("    {:>2}  {} {}", i + 1, "#".repeat(*count).cyan(), count);
            }
        }
        if stats.unrated > 0 {
            println!("    {}", format!("{} unrated", stats.unrated).dimmed());
        }
    }
}

fn print_field(label: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        println!("  {label}: {value}");
    }
}

fn print_wrapped(label: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        println!("\n  {label}:");
        println!("    {}", super::truncate_chars(value, 400).dimmed());
    }
}

fn format_rating(rating: Option<u8>) -> String {
    match rating {
        Some(r) => format!("{r}/10"),
        None => "-".to_string(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Colorize a status label.
fn colorize_status(status: Status) -> colored::ColoredString {
    let label = status.label();
    match status.as_str() {
        "watched" | "read" | "completed" => label.green(),
        "watching" | "reading" => label.cyan(),
        "want_to_watch" | "want_to_read" => label.yellow(),
        "dropped" => label.red(),
        _ => label.dimmed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::models::{MovieStatus, SeriesStatus};

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("movies"), "Movies");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_format_rating() {
        assert_eq!(format_rating(Some(8)), "8/10");
        assert_eq!(format_rating(None), "-");
    }

    #[test]
    fn test_colorize_status_keeps_label_text() {
        colored::control::set_override(false);
        assert_eq!(
            colorize_status(Status::Movie(MovieStatus::WantToWatch)).to_string(),
            "Want To Watch"
        );
        assert_eq!(
            colorize_status(Status::Series(SeriesStatus::OnHold)).to_string(),
            "On Hold"
        );
    }
}
