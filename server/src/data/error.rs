//! Unified error type for data layer
//!
//! Wraps backend-specific errors (SQLite, PostgreSQL) while preserving which
//! backend generated them.

use thiserror::Error;

/// Unified error type for data layer operations
#[derive(Error, Debug)]
pub enum DataError {
    /// SQLite database error
    #[error("SQLite error: {0}")]
    Sqlite(sqlx::Error),

    /// PostgreSQL database error
    #[error("PostgreSQL error: {0}")]
    Postgres(sqlx::Error),

    /// Migration failed
    #[error("Migration {version} ({name}) failed on {backend}: {error}")]
    MigrationFailed {
        backend: &'static str,
        version: i32,
        name: String,
        error: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unique constraint violation
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl DataError {
    /// Create a migration failed error
    pub fn migration_failed(backend: &'static str, version: i32, name: &str, error: &str) -> Self {
        Self::MigrationFailed {
            backend,
            version,
            name: name.to_string(),
            error: error.to_string(),
        }
    }

    /// Check if the backing store could not be reached
    pub fn is_connection(&self) -> bool {
        match self {
            Self::Sqlite(e) | Self::Postgres(e) => matches!(
                e,
                sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::Io(_)
                    | sqlx::Error::Tls(_)
                    | sqlx::Error::WorkerCrashed
            ),
            _ => false,
        }
    }

    /// Get the backend name that generated this error
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite",
            Self::Postgres(_) => "postgres",
            Self::MigrationFailed { backend, .. } => backend,
            Self::Config(_) | Self::Conflict(_) => "unknown",
        }
    }
}

/// Convert from the SQLite backend error
impl From<crate::data::sqlite::SqliteError> for DataError {
    fn from(e: crate::data::sqlite::SqliteError) -> Self {
        match e {
            crate::data::sqlite::SqliteError::Database(e) => Self::Sqlite(e),
            crate::data::sqlite::SqliteError::MigrationFailed {
                version,
                name,
                error,
            } => Self::MigrationFailed {
                backend: "sqlite",
                version,
                name,
                error,
            },
            crate::data::sqlite::SqliteError::Conflict(msg) => Self::Conflict(msg),
        }
    }
}

/// Convert from the PostgreSQL backend error
impl From<crate::data::postgres::PostgresError> for DataError {
    fn from(e: crate::data::postgres::PostgresError) -> Self {
        match e {
            crate::data::postgres::PostgresError::Database(e) => Self::Postgres(e),
            crate::data::postgres::PostgresError::MigrationFailed {
                version,
                name,
                error,
            } => Self::MigrationFailed {
                backend: "postgres",
                version,
                name,
                error,
            },
            crate::data::postgres::PostgresError::Config(msg) => Self::Config(msg),
            crate::data::postgres::PostgresError::Conflict(msg) => Self::Conflict(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_failed_error_display() {
        let err = DataError::migration_failed("postgres", 2, "add_ratings_index", "syntax error");
        assert_eq!(
            err.to_string(),
            "Migration 2 (add_ratings_index) failed on postgres: syntax error"
        );
    }

    #[test]
    fn test_backend_method() {
        assert_eq!(DataError::Sqlite(sqlx::Error::PoolClosed).backend(), "sqlite");
        assert_eq!(
            DataError::Postgres(sqlx::Error::PoolTimedOut).backend(),
            "postgres"
        );
        assert_eq!(
            DataError::migration_failed("sqlite", 1, "test", "error").backend(),
            "sqlite"
        );
    }

    #[test]
    fn test_is_connection() {
        assert!(DataError::Postgres(sqlx::Error::PoolTimedOut).is_connection());
        assert!(DataError::Sqlite(sqlx::Error::PoolClosed).is_connection());
        assert!(!DataError::Sqlite(sqlx::Error::RowNotFound).is_connection());
        assert!(!DataError::Conflict("email".into()).is_connection());
        assert!(!DataError::Config("bad config".into()).is_connection());
    }

    #[test]
    fn test_conflict_from_sqlite() {
        let err: DataError =
            crate::data::sqlite::SqliteError::Conflict("users.email".to_string()).into();
        assert!(matches!(err, DataError::Conflict(ref m) if m == "users.email"));
    }
}
