//! Whole-schema seed replacement for PostgreSQL

use sqlx::PgPool;

use super::{movie, rating, user};
use crate::data::postgres::PostgresError;
use crate::data::types::{SeedCounts, SeedData};

/// Replace users, movies and ratings and resync the user ID counter in one
/// transaction; any failure leaves all three tables untouched
pub async fn replace_seed(pool: &PgPool, data: &SeedData) -> Result<SeedCounts, PostgresError> {
    let mut tx = pool.begin().await?;

    let users = user::reload_users(&mut tx, &data.users).await?;
    let movies = movie::reload_movies(&mut tx, &data.movies).await?;
    let ratings = rating::reload_ratings(&mut tx, &data.ratings).await?;
    let next_user_id = user::resync_user_ids(&mut tx).await?;

    tx.commit().await?;

    tracing::debug!(users, movies, ratings, next_user_id, "Seed data replaced");
    Ok(SeedCounts {
        users,
        movies,
        ratings,
        next_user_id,
    })
}
