//! Whole-schema seed replacement for SQLite

use sqlx::SqlitePool;

use super::{movie, rating, user};
use crate::data::sqlite::SqliteError;
use crate::data::types::{SeedCounts, SeedData};

/// Replace users, movies and ratings and resync the user ID counter in one
/// transaction; any failure leaves all three tables untouched
pub async fn replace_seed(pool: &SqlitePool, data: &SeedData) -> Result<SeedCounts, SqliteError> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::SqliteService;
    use crate::data::types::{SeedMovie, SeedRating, SeedUser};

    fn seed_data(rating_movie_id: i64) -> SeedData {
        SeedData {
            users: vec![SeedUser {
                user_id: 7,
                age: Some(30),
                zipcode: None,
            }],
            movies: vec![SeedMovie {
                movie_id: 1,
                title: "Toy Story".to_string(),
                released_at: None,
                imdb_url: String::new(),
            }],
            ratings: vec![SeedRating {
                user_id: 7,
                movie_id: rating_movie_id,
                score: 5,
            }],
        }
    }

    #[tokio::test]
    async fn test_replace_seed_counts_and_rollback() {
        let db = SqliteService::connect_in_memory().await;

        let counts = replace_seed(db.pool(), &seed_data(1)).await.unwrap();
        assert_eq!(
            counts,
            SeedCounts {
                users: 1,
                movies: 1,
                ratings: 1,
                next_user_id: 8,
            }
        );

        let mut broken = seed_data(404);
        broken.users[0].user_id = 9;
        broken.movies[0].title = "Replaced".to_string();
        assert!(replace_seed(db.pool(), &broken).await.is_err());

        assert!(user::get_user(db.pool(), 7).await.unwrap().is_some());
        assert!(user::get_user(db.pool(), 9).await.unwrap().is_none());
        let movie = movie::get_movie(db.pool(), 1).await.unwrap().unwrap();
        assert_eq!(movie.title, "Toy Story");
        assert!(rating::get_rating(db.pool(), 7, 1).await.unwrap().is_some());
    }
}
