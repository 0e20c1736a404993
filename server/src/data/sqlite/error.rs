//! SQLite error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqliteError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration {version} ({name}) failed: {error}")]
    MigrationFailed {
        version: i32,
        name: String,
        error: String,
    },

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl SqliteError {
    /// Map a write error, turning unique constraint violations into `Conflict`
    pub fn from_write(e: sqlx::Error) -> Self {
        match e.as_database_error() {
            Some(db) if db.is_unique_violation() => Self::Conflict(db.message().to_string()),
            _ => Self::Database(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_failed_error_display() {
        let err = SqliteError::MigrationFailed {
            version: 2,
            name: "add_ratings_index".to_string(),
            error: "syntax error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Migration 2 (add_ratings_index) failed: syntax error"
        );
    }

    #[test]
    fn test_from_write_keeps_non_constraint_errors() {
        let err = SqliteError::from_write(sqlx::Error::RowNotFound);
        assert!(matches!(err, SqliteError::Database(sqlx::Error::RowNotFound)));
    }
}
