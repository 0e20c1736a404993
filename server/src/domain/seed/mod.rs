//! Seed loader for the MovieLens flat files
//!
//! - `parse` - delimited record parsing
//! - `loader` - per-table replacement and the full seed run

pub mod loader;
pub mod parse;

pub use loader::{SeedPaths, SeedSummary, load_movies, load_ratings, load_users, run};
