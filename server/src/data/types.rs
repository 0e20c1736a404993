//! Shared row types for all database backends

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// User row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRow {
    pub user_id: i64,
    pub email: Option<String>,
    /// Argon2id PHC string; `None` for seeded accounts that cannot log in
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub age: Option<i32>,
    pub zipcode: Option<String>,
}

/// Movie row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRow {
    pub movie_id: i64,
    pub title: String,
    pub released_at: Option<NaiveDate>,
    pub imdb_url: String,
}

/// Rating row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingRow {
    pub rating_id: i64,
    pub movie_id: i64,
    pub user_id: i64,
    pub score: i32,
}

/// Rating joined with the rated movie's title (user detail page)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRatingRow {
    pub rating_id: i64,
    pub movie_id: i64,
    pub title: String,
    pub score: i32,
}

/// Rating joined with the rater's email (movie detail page)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieRatingRow {
    pub rating_id: i64,
    pub user_id: i64,
    pub email: Option<String>,
    pub score: i32,
}

/// Insert parameters for a registered user
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub age: Option<i32>,
    pub zipcode: Option<&'a str>,
}

/// User record parsed from the seed file (ids supplied explicitly)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedUser {
    pub user_id: i64,
    pub age: Option<i32>,
    pub zipcode: Option<String>,
}

/// Movie record parsed from the seed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedMovie {
    pub movie_id: i64,
    pub title: String,
    pub released_at: Option<NaiveDate>,
    pub imdb_url: String,
}

/// Rating record parsed from the seed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRating {
    pub user_id: i64,
    pub movie_id: i64,
    pub score: i32,
}

/// Parsed contents of all three seed files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedData {
    pub users: Vec<SeedUser>,
    pub movies: Vec<SeedMovie>,
    pub ratings: Vec<SeedRating>,
}

/// Rows written by a full seed replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedCounts {
    pub users: u64,
    pub movies: u64,
    pub ratings: u64,
    /// ID the next registered user will receive
    pub next_user_id: i64,
}

/// Outcome of a rating upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    Created,
    Updated,
}
