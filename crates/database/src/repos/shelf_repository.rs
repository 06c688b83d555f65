//! Shelf repository for database operations.

use crate::entities::{now_rfc3339, PredefinedKind, Shelf};
use crate::types::{AccountError, AccountResult};
use sqlx::{Row, SqlitePool};
use tracing::debug;

const CUSTOM_KIND: &str = "custom";

/// Repository for shelf database operations
#[derive(Clone)]
pub struct ShelfRepository {
    pool: SqlitePool,
}

impl ShelfRepository {
    /// Create a new shelf repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Provision the four predefined shelves for a freshly registered user
    pub async fn create_predefined_set(&self, user_id: i64) -> AccountResult<Vec<Shelf>> {
        let mut shelves = Vec::with_capacity(PredefinedKind::ALL.len());
        for kind in PredefinedKind::ALL {
            let now = now_rfc3339();
            let result = sqlx::query(
                "INSERT INTO shelves (user_id, kind, name, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(user_id)
            .bind(kind.as_str())
            .bind(kind.shelf_name())
            .bind(&now)
            .bind(&now)
            .execute(&self.pool)
            .await
            .map_err(|e| AccountError::Database(e.to_string()))?;

            shelves.push(Shelf::predefined(
                result.last_insert_rowid(),
                kind,
                Some(user_id),
            ));
        }

        debug!(user_id, "provisioned predefined shelves");
        Ok(shelves)
    }

    /// Create a custom shelf for a user
    pub async fn create_custom(&self, user_id: i64, name: &str) -> AccountResult<Shelf> {
        let now = now_rfc3339();
        let result = sqlx::query(
            "INSERT INTO shelves (user_id, kind, name, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(CUSTOM_KIND)
        .bind(name)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AccountError::Database(e.to_string()))?;

        Ok(Shelf::custom(
            result.last_insert_rowid(),
            Some(user_id),
            name,
        ))
    }

    /// All shelves owned by a user
    pub async fn find_by_user(&self, user_id: i64) -> AccountResult<Vec<Shelf>> {
        let rows = sqlx::query(
            "SELECT id, user_id, kind, name FROM shelves WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AccountError::Database(e.to_string()))?;

        rows.iter().map(row_to_shelf).collect()
    }

    /// Shelves with no owner (left behind by account deletion)
    pub async fn find_detached(&self) -> AccountResult<Vec<Shelf>> {
        let rows =
            sqlx::query("SELECT id, user_id, kind, name FROM shelves WHERE user_id IS NULL ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| AccountError::Database(e.to_string()))?;

        rows.iter().map(row_to_shelf).collect()
    }

    /// Sever the ownership link of every shelf the user owns, keeping the
    /// shelf rows in place. Returns the number of shelves detached; zero is
    /// fine (detachment is idempotent).
    pub async fn detach_user(&self, user_id: i64) -> AccountResult<u64> {
        let now = now_rfc3339();
        let result =
            sqlx::query("UPDATE shelves SET user_id = NULL, updated_at = ? WHERE user_id = ?")
                .bind(&now)
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(|e| AccountError::Database(e.to_string()))?;

        debug!(user_id, detached = result.rows_affected(), "detached shelves");
        Ok(result.rows_affected())
    }
}

fn row_to_shelf(row: &sqlx::sqlite::SqliteRow) -> AccountResult<Shelf> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| AccountError::Database(e.to_string()))?;
    let user_id: Option<i64> = row
        .try_get("user_id")
        .map_err(|e| AccountError::Database(e.to_string()))?;
    let kind: String = row
        .try_get("kind")
        .map_err(|e| AccountError::Database(e.to_string()))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| AccountError::Database(e.to_string()))?;

    if kind == CUSTOM_KIND {
        return Ok(Shelf::custom(id, user_id, name));
    }

    let kind = PredefinedKind::from_str(&kind)
        .ok_or_else(|| AccountError::Database(format!("unknown shelf kind: {kind}")))?;
    Ok(Shelf::predefined(id, kind, user_id))
}
