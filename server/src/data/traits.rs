//! Repository trait for database backends
//!
//! Both backends (SQLite, PostgreSQL) implement [`TransactionalRepository`] with
//! their own SQL dialect. Handlers and domain operations only see the trait.

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::types::{
    MovieRatingRow, MovieRow, NewUser, RatingRow, SeedCounts, SeedData, SeedMovie, SeedRating,
    SeedUser, UpsertOutcome, UserRatingRow, UserRow,
};

/// Repository trait for the users/movies/ratings schema
#[async_trait]
pub trait TransactionalRepository: Send + Sync {
    // ==================== User Operations ====================

    /// Insert a registered user, returning the new row.
    /// Fails with [`DataError::Conflict`] when the email is already taken.
    async fn create_user(&self, user: &NewUser<'_>) -> Result<UserRow, DataError>;

    /// Get a user by ID
    async fn get_user(&self, user_id: i64) -> Result<Option<UserRow>, DataError>;

    /// Get a user by exact (case-sensitive) email
    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>, DataError>;

    /// List all users ordered by ID
    async fn list_users(&self) -> Result<Vec<UserRow>, DataError>;

    /// List a user's ratings with movie titles, ordered by rating ID
    async fn list_ratings_for_user(&self, user_id: i64) -> Result<Vec<UserRatingRow>, DataError>;

    // ==================== Movie Operations ====================

    /// Get a movie by ID
    async fn get_movie(&self, movie_id: i64) -> Result<Option<MovieRow>, DataError>;

    /// List all movies ordered by title, then ID
    async fn list_movies(&self) -> Result<Vec<MovieRow>, DataError>;

    /// List a movie's ratings with rater emails, ordered by rating ID
    async fn list_ratings_for_movie(&self, movie_id: i64)
    -> Result<Vec<MovieRatingRow>, DataError>;

    // ==================== Rating Operations ====================

    /// Get the rating a user gave a movie
    async fn get_rating(&self, user_id: i64, movie_id: i64)
    -> Result<Option<RatingRow>, DataError>;

    /// Insert or overwrite the rating for (user, movie) in one transaction
    async fn upsert_rating(
        &self,
        user_id: i64,
        movie_id: i64,
        score: i32,
    ) -> Result<(RatingRow, UpsertOutcome), DataError>;

    // ==================== Seed Operations ====================

    /// Delete all users (cascading to their ratings) and insert the given rows
    async fn replace_users(&self, users: &[SeedUser]) -> Result<u64, DataError>;

    /// Delete all movies (cascading to their ratings) and insert the given rows
    async fn replace_movies(&self, movies: &[SeedMovie]) -> Result<u64, DataError>;

    /// Delete all ratings and insert the given rows
    async fn replace_ratings(&self, ratings: &[SeedRating]) -> Result<u64, DataError>;

    /// Make the next generated user ID `max(user_id) + 1`; returns that ID
    async fn sync_user_id_sequence(&self) -> Result<i64, DataError>;

    /// Replace all three tables and resync the user ID counter atomically
    async fn replace_seed(&self, data: &SeedData) -> Result<SeedCounts, DataError>;
}
