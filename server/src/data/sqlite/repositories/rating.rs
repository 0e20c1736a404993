//! Rating repository for SQLite operations

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::core::constants::SEED_INSERT_CHUNK;
use crate::data::sqlite::SqliteError;
use crate::data::types::{RatingRow, SeedRating, UpsertOutcome};

type RatingTuple = (i64, i64, i64, i32);

fn rating_from_tuple((rating_id, movie_id, user_id, score): RatingTuple) -> RatingRow {
    RatingRow {
        rating_id,
        movie_id,
        user_id,
        score,
    }
}

/// Get the rating a user gave a movie, if any
pub async fn get_rating(
    pool: &SqlitePool,
    user_id: i64,
    movie_id: i64,
) -> Result<Option<RatingRow>, SqliteError> {
    let row = sqlx::query_as::<_, RatingTuple>(
        "SELECT rating_id, movie_id, user_id, score FROM ratings WHERE user_id = ? AND movie_id = ?",
    )
    .bind(user_id)
    .bind(movie_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(rating_from_tuple))
}

/// Create the (user, movie) rating or overwrite its score
///
/// The unique (user_id, movie_id) constraint decides the outcome, so two
/// concurrent first submissions still leave exactly one row.
pub async fn upsert_rating(
    pool: &SqlitePool,
    user_id: i64,
    movie_id: i64,
    score: i32,
) -> Result<(RatingRow, UpsertOutcome), SqliteError> {
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(
        "INSERT INTO ratings (movie_id, user_id, score) VALUES (?, ?, ?) ON CONFLICT (user_id, movie_id) DO NOTHING",
    )
    .bind(movie_id)
    .bind(user_id)
    .bind(score)
    .execute(&mut *tx)
    .await
    .map_err(SqliteError::from_write)?;

    let outcome = if inserted.rows_affected() > 0 {
        UpsertOutcome::Created
    } else {
        sqlx::query("UPDATE ratings SET score = ? WHERE user_id = ? AND movie_id = ?")
            .bind(score)
            .bind(user_id)
            .bind(movie_id)
            .execute(&mut *tx)
            .await?;
        UpsertOutcome::Updated
    };

    let row = sqlx::query_as::<_, RatingTuple>(
        "SELECT rating_id, movie_id, user_id, score FROM ratings WHERE user_id = ? AND movie_id = ?",
    )
    .bind(user_id)
    .bind(movie_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!(user_id, movie_id, score, ?outcome, "Rating saved");
    Ok((rating_from_tuple(row), outcome))
}

/// Delete all ratings and insert the seed rows in one transaction
pub async fn replace_ratings(pool: &SqlitePool, ratings: &[SeedRating]) -> Result<u64, SqliteError> {
    let mut tx = pool.begin().await?;
    let inserted = reload_ratings(&mut tx, ratings).await?;
    tx.commit().await?;
    Ok(inserted)
}

/// Delete all ratings and insert `ratings` on an open transaction
pub(crate) async fn reload_ratings(
    conn: &mut SqliteConnection,
    ratings: &[SeedRating],
) -> Result<u64, SqliteError> {
    sqlx::query("DELETE FROM ratings").execute(&mut *conn).await?;

    let mut inserted = 0;
    for chunk in ratings.chunks(SEED_INSERT_CHUNK) {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("INSERT INTO ratings (user_id, movie_id, score) ");
        builder.push_values(chunk, |mut b, rating| {
            b.push_bind(rating.user_id)
                .push_bind(rating.movie_id)
                .push_bind(rating.score);
        });
        inserted += builder
            .build()
            .execute(&mut *conn)
            .await
            .map_err(SqliteError::from_write)?
            .rows_affected();
    }

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{DatabaseBackend, DatabaseConfig};
    use crate::data::sqlite::SqliteService;
    use crate::data::sqlite::repositories::{movie, user};
    use crate::data::types::{SeedMovie, SeedUser};

    async fn seeded() -> SqliteService {
        seed(SqliteService::connect_in_memory().await).await
    }

    async fn seed(db: SqliteService) -> SqliteService {
        user::replace_users(
            db.pool(),
            &[
                SeedUser {
                    user_id: 1,
                    age: Some(24),
                    zipcode: Some("85711".to_string()),
                },
                SeedUser {
                    user_id: 2,
                    age: Some(53),
                    zipcode: Some("94043".to_string()),
                },
            ],
        )
        .await
        .unwrap();
        movie::replace_movies(
            db.pool(),
            &[SeedMovie {
                movie_id: 10,
                title: "Kolya".to_string(),
                released_at: None,
                imdb_url: String::new(),
            }],
        )
        .await
        .unwrap();
        db
    }

    #[tokio::test]
    async fn test_upsert_creates_then_updates() {
        let db = seeded().await;

        let (first, outcome) = upsert_rating(db.pool(), 1, 10, 3).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Created);
        assert_eq!(first.score, 3);

        let (second, outcome) = upsert_rating(db.pool(), 1, 10, 5).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated);
        assert_eq!(second.rating_id, first.rating_id);
        assert_eq!(second.score, 5);

        let stored = get_rating(db.pool(), 1, 10).await.unwrap().unwrap();
        assert_eq!(stored, second);
    }

    #[tokio::test]
    async fn test_concurrent_first_submissions_leave_one_row() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            backend: DatabaseBackend::Sqlite,
            url: format!("sqlite://{}", dir.path().join("ratings.db").display()),
            max_connections: 5,
            min_connections: 2,
            acquire_timeout_secs: 5,
            statement_timeout_secs: 5,
        };
        let db = seed(SqliteService::init(&config).await.unwrap()).await;

        let (a, b) = tokio::join!(
            upsert_rating(db.pool(), 1, 10, 2),
            upsert_rating(db.pool(), 1, 10, 4)
        );
        let (a, a_outcome) = a.unwrap();
        let (b, b_outcome) = b.unwrap();
        assert_eq!(a.rating_id, b.rating_id);

        let mut outcomes = [a_outcome, b_outcome];
        outcomes.sort_by_key(|o| *o == UpsertOutcome::Updated);
        assert_eq!(outcomes, [UpsertOutcome::Created, UpsertOutcome::Updated]);

        let raters = movie::list_ratings(db.pool(), 10).await.unwrap();
        assert_eq!(raters.len(), 1);
        let stored = get_rating(db.pool(), 1, 10).await.unwrap().unwrap();
        assert!(stored.score == 2 || stored.score == 4);
        db.close().await;
    }

    #[tokio::test]
    async fn test_ratings_are_per_user() {
        let db = seeded().await;
        upsert_rating(db.pool(), 1, 10, 4).await.unwrap();
        let (_, outcome) = upsert_rating(db.pool(), 2, 10, 2).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Created);

        let raters = movie::list_ratings(db.pool(), 10).await.unwrap();
        assert_eq!(raters.len(), 2);
        assert!(get_rating(db.pool(), 2, 99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replace_ratings_and_cascade() {
        let db = seeded().await;
        let inserted = replace_ratings(
            db.pool(),
            &[
                SeedRating {
                    user_id: 1,
                    movie_id: 10,
                    score: 3,
                },
                SeedRating {
                    user_id: 2,
                    movie_id: 10,
                    score: 1,
                },
            ],
        )
        .await
        .unwrap();
        assert_eq!(inserted, 2);

        let titles = user::list_ratings(db.pool(), 1).await.unwrap();
        assert_eq!(titles.len(), 1);
        assert_eq!(titles[0].title, "Kolya");

        // Replacing movies removes the ratings that pointed at them
        movie::replace_movies(db.pool(), &[]).await.unwrap();
        assert!(get_rating(db.pool(), 1, 10).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rating_for_unknown_movie_fails() {
        let db = seeded().await;
        let err = replace_ratings(
            db.pool(),
            &[SeedRating {
                user_id: 1,
                movie_id: 404,
                score: 3,
            }],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SqliteError::Database(_)));
        assert!(get_rating(db.pool(), 1, 10).await.unwrap().is_none());
    }
}
