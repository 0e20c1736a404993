//! User repository for PostgreSQL operations

use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use crate::core::constants::SEED_INSERT_CHUNK;
use crate::data::postgres::PostgresError;
use crate::data::types::{NewUser, SeedUser, UserRatingRow, UserRow};

type UserTuple = (i64, Option<String>, Option<String>, Option<i32>, Option<String>);

fn user_from_tuple((user_id, email, password, age, zipcode): UserTuple) -> UserRow {
    UserRow {
        user_id,
        email,
        password,
        age,
        zipcode,
    }
}

/// Insert a registered user; duplicate emails surface as `Conflict`
pub async fn create_user(pool: &PgPool, user: &NewUser<'_>) -> Result<UserRow, PostgresError> {
    let row = sqlx::query_as::<_, UserTuple>(
        r#"
        INSERT INTO users (email, password, age, zipcode)
        VALUES ($1, $2, $3, $4)
        RETURNING user_id, email, password, age, zipcode
        "#,
    )
    .bind(user.email)
    .bind(user.password_hash)
    .bind(user.age)
    .bind(user.zipcode)
    .fetch_one(pool)
    .await
    .map_err(PostgresError::from_write)?;

    let user = user_from_tuple(row);
    tracing::debug!(user_id = user.user_id, "User created");
    Ok(user)
}

/// Get a user by ID
pub async fn get_user(pool: &PgPool, user_id: i64) -> Result<Option<UserRow>, PostgresError> {
    let row = sqlx::query_as::<_, UserTuple>(
        "SELECT user_id, email, password, age, zipcode FROM users WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(user_from_tuple))
}

/// Get a user by exact email
pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>, PostgresError> {
    let row = sqlx::query_as::<_, UserTuple>(
        "SELECT user_id, email, password, age, zipcode FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(user_from_tuple))
}

/// List all users ordered by ID
pub async fn list_users(pool: &PgPool) -> Result<Vec<UserRow>, PostgresError> {
    let rows = sqlx::query_as::<_, UserTuple>(
        "SELECT user_id, email, password, age, zipcode FROM users ORDER BY user_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(user_from_tuple).collect())
}

/// List a user's ratings joined with movie titles
pub async fn list_ratings(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<UserRatingRow>, PostgresError> {
    let rows = sqlx::query_as::<_, (i64, i64, String, i32)>(
        r#"
        SELECT r.rating_id, r.movie_id, m.title, r.score
        FROM ratings r
        JOIN movies m ON m.movie_id = r.movie_id
        WHERE r.user_id = $1
        ORDER BY r.rating_id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(rating_id, movie_id, title, score)| UserRatingRow {
            rating_id,
            movie_id,
            title,
            score,
        })
        .collect())
}

/// Delete all users and insert the seed rows in one transaction
pub async fn replace_users(pool: &PgPool, users: &[SeedUser]) -> Result<u64, PostgresError> {
    let mut tx = pool.begin().await?;
    let inserted = reload_users(&mut tx, users).await?;
    tx.commit().await?;
    Ok(inserted)
}

/// Delete all users and insert `users` on an open transaction
pub(crate) async fn reload_users(
    conn: &mut PgConnection,
    users: &[SeedUser],
) -> Result<u64, PostgresError> {
    let deleted = sqlx::query("DELETE FROM users").execute(&mut *conn).await?;
    tracing::debug!(deleted = deleted.rows_affected(), "Existing users deleted");

    let mut inserted = 0;
    for chunk in users.chunks(SEED_INSERT_CHUNK) {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO users (user_id, age, zipcode) ");
        builder.push_values(chunk, |mut b, user| {
            b.push_bind(user.user_id)
                .push_bind(user.age)
                .push_bind(user.zipcode.clone());
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

/// Move the `users.user_id` sequence past the current maximum; returns the next ID
pub async fn sync_user_id_sequence(pool: &PgPool) -> Result<i64, PostgresError> {
    let mut conn = pool.acquire().await?;
    resync_user_ids(&mut conn).await
}

/// Sequence resync on an existing connection or transaction
pub(crate) async fn resync_user_ids(conn: &mut PgConnection) -> Result<i64, PostgresError> {
    let next: i64 = sqlx::query_scalar(
        r#"
        SELECT setval(
            pg_get_serial_sequence('users', 'user_id'),
            COALESCE(MAX(user_id), 0) + 1,
            false
        )
        FROM users
        "#,
    )
    .fetch_one(&mut *conn)
    .await?;

    Ok(next)
}
