//! Movie repository for PostgreSQL operations

use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use crate::core::constants::SEED_INSERT_CHUNK;
use crate::data::postgres::PostgresError;
use crate::data::types::{MovieRatingRow, MovieRow, SeedMovie};

type MovieTuple = (i64, String, Option<NaiveDate>, String);

fn movie_from_tuple((movie_id, title, released_at, imdb_url): MovieTuple) -> MovieRow {
    MovieRow {
        movie_id,
        title,
        released_at,
        imdb_url,
    }
}

/// Get a movie by ID
pub async fn get_movie(pool: &PgPool, movie_id: i64) -> Result<Option<MovieRow>, PostgresError> {
    let row = sqlx::query_as::<_, MovieTuple>(
        "SELECT movie_id, title, released_at, imdb_url FROM movies WHERE movie_id = $1",
    )
    .bind(movie_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(movie_from_tuple))
}

/// List all movies ordered by title, ties broken by ID
pub async fn list_movies(pool: &PgPool) -> Result<Vec<MovieRow>, PostgresError> {
    let rows = sqlx::query_as::<_, MovieTuple>(
        "SELECT movie_id, title, released_at, imdb_url FROM movies ORDER BY title, movie_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(movie_from_tuple).collect())
}

/// List a movie's ratings joined with rater emails
pub async fn list_ratings(
    pool: &PgPool,
    movie_id: i64,
) -> Result<Vec<MovieRatingRow>, PostgresError> {
    let rows = sqlx::query_as::<_, (i64, i64, Option<String>, i32)>(
        r#"
        SELECT r.rating_id, r.user_id, u.email, r.score
        FROM ratings r
        JOIN users u ON u.user_id = r.user_id
        WHERE r.movie_id = $1
        ORDER BY r.rating_id
        "#,
    )
    .bind(movie_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(rating_id, user_id, email, score)| MovieRatingRow {
            rating_id,
            user_id,
            email,
            score,
        })
        .collect())
}

/// Delete all movies and insert the seed rows in one transaction
pub async fn replace_movies(pool: &PgPool, movies: &[SeedMovie]) -> Result<u64, PostgresError> {
    let mut tx = pool.begin().await?;
    let inserted = reload_movies(&mut tx, movies).await?;
    tx.commit().await?;
    Ok(inserted)
}

/// Delete all movies and insert `movies` on an open transaction
pub(crate) async fn reload_movies(
    conn: &mut PgConnection,
    movies: &[SeedMovie],
) -> Result<u64, PostgresError> {
    sqlx::query("DELETE FROM movies").execute(&mut *conn).await?;

    let mut inserted = 0;
    for chunk in movies.chunks(SEED_INSERT_CHUNK) {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO movies (movie_id, title, released_at, imdb_url) ");
        builder.push_values(chunk, |mut b, movie| {
            b.push_bind(movie.movie_id)
                .push_bind(movie.title.clone())
                .push_bind(movie.released_at)
                .push_bind(movie.imdb_url.clone());
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
