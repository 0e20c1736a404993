//! TransactionalRepository trait implementation for SQLite
//!
//! Implements the trait for `Arc<SqliteService>` by delegating to the
//! free functions in `repositories`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::traits::TransactionalRepository;
use crate::data::types::{
    MovieRatingRow, MovieRow, NewUser, RatingRow, SeedCounts, SeedData, SeedMovie, SeedRating,
    SeedUser, UpsertOutcome, UserRatingRow, UserRow,
};

use super::SqliteService;
use super::repositories::{movie, rating, seed, user};

#[async_trait]
impl TransactionalRepository for Arc<SqliteService> {
    // ==================== User Operations ====================

    async fn create_user(&self, new_user: &NewUser<'_>) -> Result<UserRow, DataError> {
        user::create_user(self.pool(), new_user)
            .await
            .map_err(Into::into)
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<UserRow>, DataError> {
        user::get_user(self.pool(), user_id)
            .await
            .map_err(Into::into)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>, DataError> {
        user::get_by_email(self.pool(), email)
            .await
            .map_err(Into::into)
    }

    async fn list_users(&self) -> Result<Vec<UserRow>, DataError> {
        user::list_users(self.pool()).await.map_err(Into::into)
    }

    async fn list_ratings_for_user(&self, user_id: i64) -> Result<Vec<UserRatingRow>, DataError> {
        user::list_ratings(self.pool(), user_id)
            .await
            .map_err(Into::into)
    }

    // ==================== Movie Operations ====================

    async fn get_movie(&self, movie_id: i64) -> Result<Option<MovieRow>, DataError> {
        movie::get_movie(self.pool(), movie_id)
            .await
            .map_err(Into::into)
    }

    async fn list_movies(&self) -> Result<Vec<MovieRow>, DataError> {
        movie::list_movies(self.pool()).await.map_err(Into::into)
    }

    async fn list_ratings_for_movie(
        &self,
        movie_id: i64,
    ) -> Result<Vec<MovieRatingRow>, DataError> {
        movie::list_ratings(self.pool(), movie_id)
            .await
            .map_err(Into::into)
    }

    // ==================== Rating Operations ====================

    async fn get_rating(
        &self,
        user_id: i64,
        movie_id: i64,
    ) -> Result<Option<RatingRow>, DataError> {
        rating::get_rating(self.pool(), user_id, movie_id)
            .await
            .map_err(Into::into)
    }

    async fn upsert_rating(
        &self,
        user_id: i64,
        movie_id: i64,
        score: i32,
    ) -> Result<(RatingRow, UpsertOutcome), DataError> {
        rating::upsert_rating(self.pool(), user_id, movie_id, score)
            .await
            .map_err(Into::into)
    }

    // ==================== Seed Operations ====================

    async fn replace_users(&self, users: &[SeedUser]) -> Result<u64, DataError> {
        user::replace_users(self.pool(), users)
            .await
            .map_err(Into::into)
    }

    async fn replace_movies(&self, movies: &[SeedMovie]) -> Result<u64, DataError> {
        movie::replace_movies(self.pool(), movies)
            .await
            .map_err(Into::into)
    }

    async fn replace_ratings(&self, ratings: &[SeedRating]) -> Result<u64, DataError> {
        rating::replace_ratings(self.pool(), ratings)
            .await
            .map_err(Into::into)
    }

    async fn sync_user_id_sequence(&self) -> Result<i64, DataError> {
        user::sync_user_id_sequence(self.pool())
            .await
            .map_err(Into::into)
    }

    async fn replace_seed(&self, data: &SeedData) -> Result<SeedCounts, DataError> {
        seed::replace_seed(self.pool(), data)
            .await
            .map_err(Into::into)
    }
}
