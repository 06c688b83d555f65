//! User repository for database operations.

use crate::entities::{now_rfc3339, NewUser, User};
use crate::types::{AccountError, AccountResult};
use sqlx::{Row, SqlitePool};

const USER_COLUMNS: &str = "id, email, password_hash, display_name, created_at, updated_at";

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List every user, oldest first
    pub async fn find_all(&self) -> AccountResult<Vec<User>> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AccountError::Database(e.to_string()))?;

        rows.iter().map(row_to_user).collect()
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> AccountResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::Database(e.to_string()))?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> AccountResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::Database(e.to_string()))?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Check if an email is already registered
    pub async fn email_exists(&self, email: &str) -> AccountResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AccountError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    /// Insert a new user record
    pub async fn create(&self, new_user: &NewUser) -> AccountResult<User> {
        let now = now_rfc3339();

        let result = sqlx::query(
            "INSERT INTO users (email, password_hash, display_name, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.display_name)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(map_unique_email_violation)?;

        let user_id = result.last_insert_rowid();

        self.find_by_id(user_id)
            .await?
            .ok_or_else(|| AccountError::Database("failed to retrieve created user".to_string()))
    }

    /// Change the email of an existing user
    pub async fn update_email(&self, user_id: i64, new_email: &str) -> AccountResult<()> {
        let now = now_rfc3339();

        let result = sqlx::query("UPDATE users SET email = ?, updated_at = ? WHERE id = ?")
            .bind(new_email)
            .bind(&now)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(map_unique_email_violation)?;

        if result.rows_affected() == 0 {
            return Err(AccountError::UserNotFound);
        }

        Ok(())
    }

    /// Replace the stored password hash
    pub async fn update_password_hash(&self, user_id: i64, password_hash: &str) -> AccountResult<()> {
        let now = now_rfc3339();

        let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(&now)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AccountError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AccountError::UserNotFound);
        }

        Ok(())
    }

    /// Delete a user record. Owned shelves must already be detached or the
    /// foreign key constraint rejects the delete.
    pub async fn delete(&self, user_id: i64) -> AccountResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AccountError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AccountError::UserNotFound);
        }

        Ok(())
    }
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> AccountResult<User> {
    Ok(User {
        id: row
            .try_get("id")
            .map_err(|e| AccountError::Database(e.to_string()))?,
        email: row
            .try_get("email")
            .map_err(|e| AccountError::Database(e.to_string()))?,
        password_hash: row
            .try_get("password_hash")
            .map_err(|e| AccountError::Database(e.to_string()))?,
        display_name: row
            .try_get("display_name")
            .map_err(|e| AccountError::Database(e.to_string()))?,
        created_at: row
            .try_get("created_at")
            .map_err(|e| AccountError::Database(e.to_string()))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| AccountError::Database(e.to_string()))?,
    })
}

fn map_unique_email_violation(error: sqlx::Error) -> AccountError {
    let message = error.to_string();
    if message.contains("UNIQUE constraint failed") && message.contains("email") {
        AccountError::EmailTaken
    } else {
        AccountError::Database(message)
    }
}
