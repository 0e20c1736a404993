//! Registration and credential checks

use serde::Deserialize;
use validator::Validate;

use super::error::RatingsError;
use crate::data::types::{NewUser, UserRow};
use crate::data::{DataError, TransactionalRepository};
use crate::utils::crypto;

/// Registration input
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Registration {
    #[validate(
        length(min = 3, max = 64, message = "Email must be 3-64 characters"),
        contains(pattern = "@", message = "Email must contain '@'")
    )]
    pub email: String,

    #[validate(length(min = 1, max = 64, message = "Password must be 1-64 characters"))]
    pub password: String,

    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    pub age: Option<i32>,

    #[validate(length(max = 15, message = "Zipcode must be at most 15 characters"))]
    pub zipcode: Option<String>,
}

/// Create a user with a hashed password
///
/// Email uniqueness is decided by the store, so concurrent registrations of
/// the same address yield exactly one user.
pub async fn register(
    repo: &dyn TransactionalRepository,
    registration: &Registration,
) -> Result<UserRow, RatingsError> {
    registration.validate()?;

    let password = registration.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || crypto::hash_password(&password))
        .await
        .map_err(|e| RatingsError::Internal(e.to_string()))?
        .map_err(|e| RatingsError::Internal(e.to_string()))?;

    let new_user = NewUser {
        email: &registration.email,
        password_hash: &password_hash,
        age: registration.age,
        zipcode: registration.zipcode.as_deref().filter(|z| !z.is_empty()),
    };

    let user = repo.create_user(&new_user).await.map_err(|e| match e {
        DataError::Conflict(_) => RatingsError::DuplicateEmail,
        other => other.into(),
    })?;

    tracing::info!(user_id = user.user_id, "User registered");
    Ok(user)
}

/// Check credentials and return the matching user
///
/// Email match is exact. Users without a stored password never match.
pub async fn login(
    repo: &dyn TransactionalRepository,
    email: &str,
    password: &str,
) -> Result<UserRow, RatingsError> {
    let Some(user) = repo.get_user_by_email(email).await? else {
        tracing::debug!("Login rejected: unknown email");
        return Err(RatingsError::InvalidCredentials);
    };

    let Some(stored) = user.password.clone() else {
        tracing::debug!(user_id = user.user_id, "Login rejected: no password set");
        return Err(RatingsError::InvalidCredentials);
    };

    let candidate = password.to_string();
    let verified =
        tokio::task::spawn_blocking(move || crypto::verify_password(&candidate, &stored))
            .await
            .map_err(|e| RatingsError::Internal(e.to_string()))?;

    if !verified {
        tracing::debug!(user_id = user.user_id, "Login rejected: wrong password");
        return Err(RatingsError::InvalidCredentials);
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TransactionalService;

    fn registration(email: &str, password: &str) -> Registration {
        Registration {
            email: email.to_string(),
            password: password.to_string(),
            age: Some(30),
            zipcode: Some("10001".to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let db = TransactionalService::sqlite_in_memory().await;
        let repo = db.repository();

        let user = register(repo.as_ref(), &registration("kim@example.com", "pw"))
            .await
            .unwrap();
        assert_ne!(user.password.as_deref(), Some("pw"));

        let logged_in = login(repo.as_ref(), "kim@example.com", "pw").await.unwrap();
        assert_eq!(logged_in.user_id, user.user_id);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let db = TransactionalService::sqlite_in_memory().await;
        let repo = db.repository();

        register(repo.as_ref(), &registration("dup@example.com", "a"))
            .await
            .unwrap();
        let err = register(repo.as_ref(), &registration("dup@example.com", "b"))
            .await
            .unwrap_err();
        assert!(matches!(err, RatingsError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_input() {
        let db = TransactionalService::sqlite_in_memory().await;
        let repo = db.repository();

        let err = register(repo.as_ref(), &registration("no-at-sign", "pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, RatingsError::Validation(ref m) if m.contains('@')));

        let mut long_zip = registration("zip@example.com", "pw");
        long_zip.zipcode = Some("1234567890123456".to_string());
        let err = register(repo.as_ref(), &long_zip).await.unwrap_err();
        assert!(matches!(err, RatingsError::Validation(_)));

        let err = register(repo.as_ref(), &registration("empty@example.com", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, RatingsError::Validation(_)));

        assert!(repo.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let db = TransactionalService::sqlite_in_memory().await;
        let repo = db.repository();
        register(repo.as_ref(), &registration("lee@example.com", "right"))
            .await
            .unwrap();

        let wrong_password = login(repo.as_ref(), "lee@example.com", "wrong")
            .await
            .unwrap_err();
        let unknown_email = login(repo.as_ref(), "nobody@example.com", "right")
            .await
            .unwrap_err();
        let wrong_case = login(repo.as_ref(), "LEE@example.com", "right")
            .await
            .unwrap_err();

        for err in [wrong_password, unknown_email, wrong_case] {
            assert!(matches!(err, RatingsError::InvalidCredentials));
        }
    }

    #[tokio::test]
    async fn test_user_without_password_cannot_login() {
        let db = TransactionalService::sqlite_in_memory().await;
        let TransactionalService::Sqlite(sqlite) = &db else {
            unreachable!("in-memory service is SQLite");
        };
        sqlx::query("INSERT INTO users (email) VALUES ('nopw@example.com')")
            .execute(sqlite.pool())
            .await
            .unwrap();

        let repo = db.repository();
        for password in ["", "anything"] {
            let err = login(repo.as_ref(), "nopw@example.com", password)
                .await
                .unwrap_err();
            assert!(matches!(err, RatingsError::InvalidCredentials));
        }
    }
}
