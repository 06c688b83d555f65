//! Shelfmark Database Crate
//!
//! This crate provides the persistence layer for the Shelfmark backend:
//! connection management, migrations, entities, and repository
//! implementations for users, shelves, and sessions.

use shelfmark_config::DatabaseConfig;
use sqlx::SqlitePool;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use migrations::run_migrations;

// Re-export repositories
pub use repos::{SessionRecord, SessionRepository, ShelfRepository, UserRepository};

// Re-export entities
pub use entities::{
    shelf::{CustomShelf, PredefinedKind, PredefinedShelf, Shelf, ShelfCore},
    user::{now_rfc3339, NewUser, User},
};

// Re-export types
pub use types::{
    errors::{AccountError, DatabaseError, SessionError},
    AccountResult, DatabaseResult, SessionResult,
};

/// Initialize the database with migrations
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;

    Ok(pool)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use tempfile::TempDir;

    /// Migrated throwaway database for repository tests. The TempDir guard
    /// must outlive the pool.
    pub async fn create_test_pool() -> (SqlitePool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let config = DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            max_connections: 1,
        };

        let pool = initialize_database(&config).await.unwrap();
        (pool, temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::create_test_pool;

    #[tokio::test]
    async fn test_database_initialization() {
        let (pool, _guard) = create_test_pool().await;

        let result: (bool,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert!(result.0);
    }
}
