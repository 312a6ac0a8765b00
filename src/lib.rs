// Media Tracker: personal library of movies, books and TV series with
// preference-weighted recommendations and "more like this" lists.
//
// This is the library root. Each module corresponds to a major subsystem;
// the CLI in main.rs is a thin layer over them.

pub mod config;
pub mod error;
pub mod library;
pub mod output;
pub mod recommend;
pub mod stats;
