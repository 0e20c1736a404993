//! Movie repository for SQLite operations

use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::core::constants::SEED_INSERT_CHUNK;
use crate::data::sqlite::SqliteError;
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
pub async fn get_movie(pool: &SqlitePool, movie_id: i64) -> Result<Option<MovieRow>, SqliteError> {
    let row = sqlx::query_as::<_, MovieTuple>(
        "SELECT movie_id, title, released_at, imdb_url FROM movies WHERE movie_id = ?",
    )
    .bind(movie_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(movie_from_tuple))
}

/// List all movies ordered by title, ties broken by ID
pub async fn list_movies(pool: &SqlitePool) -> Result<Vec<MovieRow>, SqliteError> {
    let rows = sqlx::query_as::<_, MovieTuple>(
        "SELECT movie_id, title, released_at, imdb_url FROM movies ORDER BY title, movie_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(movie_from_tuple).collect())
}

/// List a movie's ratings joined with rater emails
pub async fn list_ratings(
    pool: &SqlitePool,
    movie_id: i64,
) -> Result<Vec<MovieRatingRow>, SqliteError> {
    let rows = sqlx::query_as::<_, (i64, i64, Option<String>, i32)>(
        r#"
        SELECT r.rating_id, r.user_id, u.email, r.score
        FROM ratings r
        JOIN users u ON u.user_id = r.user_id
        WHERE r.movie_id = ?
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
pub async fn replace_movies(pool: &SqlitePool, movies: &[SeedMovie]) -> Result<u64, SqliteError> {
    let mut tx = pool.begin().await?;
    let inserted = reload_movies(&mut tx, movies).await?;
    tx.commit().await?;
    Ok(inserted)
}

/// Delete all movies and insert `movies` on an open transaction
pub(crate) async fn reload_movies(
    conn: &mut SqliteConnection,
    movies: &[SeedMovie],
) -> Result<u64, SqliteError> {
    sqlx::query("DELETE FROM movies").execute(&mut *conn).await?;

    let mut inserted = 0;
    for chunk in movies.chunks(SEED_INSERT_CHUNK) {
        let mut builder: QueryBuilder<Sqlite> =
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
            .map_err(SqliteError::from_write)?
            .rows_affected();
    }

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::SqliteService;

    fn seed_movie(movie_id: i64, title: &str, released_at: Option<NaiveDate>) -> SeedMovie {
        SeedMovie {
            movie_id,
            title: title.to_string(),
            released_at,
            imdb_url: format!("http://imdb.example/{}", movie_id),
        }
    }

    #[tokio::test]
    async fn test_replace_and_get_movie() {
        let db = SqliteService::connect_in_memory().await;
        let date = NaiveDate::from_ymd_opt(1995, 1, 1);
        let inserted = replace_movies(
            db.pool(),
            &[seed_movie(1, "Toy Story", date), seed_movie(2, "GoldenEye", None)],
        )
        .await
        .unwrap();
        assert_eq!(inserted, 2);

        let movie = get_movie(db.pool(), 1).await.unwrap().unwrap();
        assert_eq!(movie.title, "Toy Story");
        assert_eq!(movie.released_at, date);

        let undated = get_movie(db.pool(), 2).await.unwrap().unwrap();
        assert!(undated.released_at.is_none());

        assert!(get_movie(db.pool(), 99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_movies_orders_by_title_then_id() {
        let db = SqliteService::connect_in_memory().await;
        replace_movies(
            db.pool(),
            &[
                seed_movie(3, "Heat", None),
                seed_movie(1, "Casino", None),
                seed_movie(2, "Heat", None),
            ],
        )
        .await
        .unwrap();

        let ids: Vec<i64> = list_movies(db.pool())
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.movie_id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_replace_movies_discards_previous_rows() {
        let db = SqliteService::connect_in_memory().await;
        replace_movies(db.pool(), &[seed_movie(1, "Old", None)])
            .await
            .unwrap();
        replace_movies(db.pool(), &[seed_movie(2, "New", None)])
            .await
            .unwrap();

        let movies = list_movies(db.pool()).await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "New");
    }

    #[tokio::test]
    async fn test_replace_movies_in_multiple_chunks() {
        let db = SqliteService::connect_in_memory().await;
        let movies: Vec<SeedMovie> = (1..=(SEED_INSERT_CHUNK as i64 * 2 + 7))
            .map(|id| seed_movie(id, &format!("Movie {}", id), None))
            .collect();

        let inserted = replace_movies(db.pool(), &movies).await.unwrap();
        assert_eq!(inserted, movies.len() as u64);
    }
}
