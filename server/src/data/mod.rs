//! Data storage layer
//!
//! - `sqlite` - Embedded transactional database (default)
//! - `postgres` - Transactional database for shared deployments
//! - `types` - Shared row types across both backends
//! - `traits` - Repository trait for multi-database support
//! - `error` - Unified error type for both backends
//!
//! Handlers and domain operations only see [`TransactionalRepository`]; the
//! backend is chosen once at startup from the connection string.

pub mod error;
pub mod postgres;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use error::DataError;
pub use postgres::PostgresService;
pub use sqlite::SqliteService;
pub use traits::TransactionalRepository;

use std::sync::Arc;

use crate::core::config::{DatabaseBackend, DatabaseConfig};

/// Transactional database service enum
///
/// Wraps the underlying backend-specific service (SQLite or PostgreSQL).
/// Services are stored as Arc so repositories can be handed out cheaply.
pub enum TransactionalService {
    /// SQLite backend (default, embedded)
    Sqlite(Arc<SqliteService>),
    /// PostgreSQL backend
    Postgres(Arc<PostgresService>),
}

impl TransactionalService {
    /// Initialize the backend named by the configuration and run migrations
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DataError> {
        match config.backend {
            DatabaseBackend::Sqlite => {
                let service = SqliteService::init(config).await?;
                Ok(Self::Sqlite(Arc::new(service)))
            }
            DatabaseBackend::Postgres => {
                let service = PostgresService::init(config).await?;
                Ok(Self::Postgres(Arc::new(service)))
            }
        }
    }

    /// Migrated in-memory SQLite service (tests only)
    #[cfg(test)]
    pub async fn sqlite_in_memory() -> Self {
        Self::Sqlite(Arc::new(SqliteService::connect_in_memory().await))
    }

    /// Close the database connection gracefully
    pub async fn close(&self) {
        match self {
            Self::Sqlite(s) => s.close().await,
            Self::Postgres(p) => p.close().await,
        }
    }

    /// Get the backend type
    pub fn backend(&self) -> DatabaseBackend {
        match self {
            Self::Sqlite(_) => DatabaseBackend::Sqlite,
            Self::Postgres(_) => DatabaseBackend::Postgres,
        }
    }

    /// Get the repository trait object for data operations
    pub fn repository(&self) -> Box<dyn TransactionalRepository + Send + Sync> {
        match self {
            Self::Sqlite(s) => Box::new(Arc::clone(s)),
            Self::Postgres(p) => Box::new(Arc::clone(p)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::NewUser;

    #[tokio::test]
    async fn test_repository_roundtrip_through_service() {
        let service = TransactionalService::sqlite_in_memory().await;
        assert_eq!(service.backend(), DatabaseBackend::Sqlite);

        let repo = service.repository();
        let user = repo
            .create_user(&NewUser {
                email: "svc@example.com",
                password_hash: "hash",
                age: None,
                zipcode: None,
            })
            .await
            .unwrap();

        let err = repo
            .create_user(&NewUser {
                email: "svc@example.com",
                password_hash: "hash",
                age: None,
                zipcode: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Conflict(_)));

        let fetched = repo.get_user(user.user_id).await.unwrap();
        assert_eq!(fetched, Some(user));

        service.close().await;
    }
}
