//! User repository for SQLite operations

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::core::constants::SEED_INSERT_CHUNK;
use crate::data::sqlite::SqliteError;
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
pub async fn create_user(pool: &SqlitePool, user: &NewUser<'_>) -> Result<UserRow, SqliteError> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("INSERT INTO users (email, password, age, zipcode) VALUES (?, ?, ?, ?)")
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.age)
        .bind(user.zipcode)
        .execute(&mut *tx)
        .await
        .map_err(SqliteError::from_write)?;

    let user_id = result.last_insert_rowid();
    tx.commit().await?;

    tracing::debug!(user_id, "User created");
    Ok(UserRow {
        user_id,
        email: Some(user.email.to_string()),
        password: Some(user.password_hash.to_string()),
        age: user.age,
        zipcode: user.zipcode.map(String::from),
    })
}

/// Get a user by ID
pub async fn get_user(pool: &SqlitePool, user_id: i64) -> Result<Option<UserRow>, SqliteError> {
    let row = sqlx::query_as::<_, UserTuple>(
        "SELECT user_id, email, password, age, zipcode FROM users WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(user_from_tuple))
}

/// Get a user by exact email
pub async fn get_by_email(pool: &SqlitePool, email: &str) -> Result<Option<UserRow>, SqliteError> {
    let row = sqlx::query_as::<_, UserTuple>(
        "SELECT user_id, email, password, age, zipcode FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(user_from_tuple))
}

/// List all users ordered by ID
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<UserRow>, SqliteError> {
    let rows = sqlx::query_as::<_, UserTuple>(
        "SELECT user_id, email, password, age, zipcode FROM users ORDER BY user_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(user_from_tuple).collect())
}

/// List a user's ratings joined with movie titles
pub async fn list_ratings(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<UserRatingRow>, SqliteError> {
    let rows = sqlx::query_as::<_, (i64, i64, String, i32)>(
        r#"
        SELECT r.rating_id, r.movie_id, m.title, r.score
        FROM ratings r
        JOIN movies m ON m.movie_id = r.movie_id
        WHERE r.user_id = ?
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
pub async fn replace_users(pool: &SqlitePool, users: &[SeedUser]) -> Result<u64, SqliteError> {
    let mut tx = pool.begin().await?;
    let inserted = reload_users(&mut tx, users).await?;
    tx.commit().await?;
    Ok(inserted)
}

/// Delete all users and insert `users` on an open transaction
pub(crate) async fn reload_users(
    conn: &mut SqliteConnection,
    users: &[SeedUser],
) -> Result<u64, SqliteError> {
    let deleted = sqlx::query("DELETE FROM users").execute(&mut *conn).await?;
    tracing::debug!(deleted = deleted.rows_affected(), "Existing users deleted");

    let mut inserted = 0;
    for chunk in users.chunks(SEED_INSERT_CHUNK) {
        let mut builder: QueryBuilder<Sqlite> =
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
            .map_err(SqliteError::from_write)?
            .rows_affected();
    }

    Ok(inserted)
}

/// Point the AUTOINCREMENT counter at the current maximum user ID
pub async fn sync_user_id_sequence(pool: &SqlitePool) -> Result<i64, SqliteError> {
    let mut tx = pool.begin().await?;
    let next = resync_user_ids(&mut tx).await?;
    tx.commit().await?;
    Ok(next)
}

/// Reset the `users` row of `sqlite_sequence`; returns the next ID
pub(crate) async fn resync_user_ids(conn: &mut SqliteConnection) -> Result<i64, SqliteError> {
    let max_id: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(user_id), 0) FROM users")
        .fetch_one(&mut *conn)
        .await?;

    sqlx::query("DELETE FROM sqlite_sequence WHERE name = 'users'")
        .execute(&mut *conn)
        .await?;
    sqlx::query("INSERT INTO sqlite_sequence (name, seq) VALUES ('users', ?)")
        .bind(max_id)
        .execute(&mut *conn)
        .await?;

    Ok(max_id + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::SqliteService;

    fn new_user<'a>(email: &'a str) -> NewUser<'a> {
        NewUser {
            email,
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA",
            age: Some(31),
            zipcode: Some("94110"),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let db = SqliteService::connect_in_memory().await;
        let created = create_user(db.pool(), &new_user("ada@example.com"))
            .await
            .unwrap();

        let fetched = get_user(db.pool(), created.user_id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.zipcode.as_deref(), Some("94110"));

        let by_email = get_by_email(db.pool(), "ada@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.user_id, created.user_id);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let db = SqliteService::connect_in_memory().await;
        create_user(db.pool(), &new_user("dup@example.com"))
            .await
            .unwrap();

        let err = create_user(db.pool(), &new_user("dup@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, SqliteError::Conflict(_)));

        let users = list_users(db.pool()).await.unwrap();
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_sensitive() {
        let db = SqliteService::connect_in_memory().await;
        create_user(db.pool(), &new_user("Case@example.com"))
            .await
            .unwrap();

        assert!(
            get_by_email(db.pool(), "case@example.com")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_missing_user_is_none() {
        let db = SqliteService::connect_in_memory().await;
        assert!(get_user(db.pool(), 42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replace_users_and_sync_sequence() {
        let db = SqliteService::connect_in_memory().await;
        create_user(db.pool(), &new_user("gone@example.com"))
            .await
            .unwrap();

        let seed: Vec<SeedUser> = (1..=3)
            .map(|user_id| SeedUser {
                user_id,
                age: Some(20 + user_id as i32),
                zipcode: Some(format!("0000{}", user_id)),
            })
            .collect();

        let inserted = replace_users(db.pool(), &seed).await.unwrap();
        assert_eq!(inserted, 3);
        assert!(
            get_by_email(db.pool(), "gone@example.com")
                .await
                .unwrap()
                .is_none()
        );

        let next = sync_user_id_sequence(db.pool()).await.unwrap();
        assert_eq!(next, 4);

        let created = create_user(db.pool(), &new_user("new@example.com"))
            .await
            .unwrap();
        assert_eq!(created.user_id, 4);
    }

    #[tokio::test]
    async fn test_sync_sequence_on_empty_table() {
        let db = SqliteService::connect_in_memory().await;
        assert_eq!(sync_user_id_sequence(db.pool()).await.unwrap(), 1);
    }
}
