//! Rating repository for PostgreSQL operations

use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use crate::core::constants::SEED_INSERT_CHUNK;
use crate::data::postgres::PostgresError;
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
    pool: &PgPool,
    user_id: i64,
    movie_id: i64,
) -> Result<Option<RatingRow>, PostgresError> {
    let row = sqlx::query_as::<_, RatingTuple>(
        "SELECT rating_id, movie_id, user_id, score FROM ratings WHERE user_id = $1 AND movie_id = $2",
    )
    .bind(user_id)
    .bind(movie_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(rating_from_tuple))
}

/// Create the (user, movie) rating or overwrite its score
pub async fn upsert_rating(
    pool: &PgPool,
    user_id: i64,
    movie_id: i64,
    score: i32,
) -> Result<(RatingRow, UpsertOutcome), PostgresError> {
    let mut tx = pool.begin().await?;

    let created = sqlx::query_as::<_, RatingTuple>(
        r#"
        INSERT INTO ratings (movie_id, user_id, score)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, movie_id) DO NOTHING
        RETURNING rating_id, movie_id, user_id, score
        "#,
    )
    .bind(movie_id)
    .bind(user_id)
    .bind(score)
    .fetch_optional(&mut *tx)
    .await
    .map_err(PostgresError::from_write)?;

    let (row, outcome) = match created {
        Some(row) => (row, UpsertOutcome::Created),
        None => {
            let row = sqlx::query_as::<_, RatingTuple>(
                r#"
                UPDATE ratings SET score = $1
                WHERE user_id = $2 AND movie_id = $3
                RETURNING rating_id, movie_id, user_id, score
                "#,
            )
            .bind(score)
            .bind(user_id)
            .bind(movie_id)
            .fetch_one(&mut *tx)
            .await?;
            (row, UpsertOutcome::Updated)
        }
    };

    tx.commit().await?;

    tracing::debug!(user_id, movie_id, score, ?outcome, "Rating saved");
    Ok((rating_from_tuple(row), outcome))
}

/// Delete all ratings and insert the seed rows in one transaction
pub async fn replace_ratings(pool: &PgPool, ratings: &[SeedRating]) -> Result<u64, PostgresError> {
    let mut tx = pool.begin().await?;
    let inserted = reload_ratings(&mut tx, ratings).await?;
    tx.commit().await?;
    Ok(inserted)
}

/// Delete all ratings and insert `ratings` on an open transaction
pub(crate) async fn reload_ratings(
    conn: &mut PgConnection,
    ratings: &[SeedRating],
) -> Result<u64, PostgresError> {
    sqlx::query("DELETE FROM ratings").execute(&mut *conn).await?;

    let mut inserted = 0;
    for chunk in ratings.chunks(SEED_INSERT_CHUNK) {
        let mut builder: QueryBuilder<Postgres> =
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
            .map_err(PostgresError::from_write)?
            .rows_affected();
    }

    Ok(inserted)
}
