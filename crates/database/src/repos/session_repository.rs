//! Session repository for bearer-token persistence.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::types::{SessionError, SessionResult};

/// A stored bearer session
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub token: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

/// Repository for session database operations
#[derive(Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    /// Create a new session repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a freshly issued session
    pub async fn insert(
        &self,
        user_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> SessionResult<()> {
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO sessions (user_id, token, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(token)
        .bind(now.to_rfc3339())
        .bind(expires_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| SessionError::Database(e.to_string()))?;

        Ok(())
    }

    /// Look up a session by its token
    pub async fn find_by_token(&self, token: &str) -> SessionResult<Option<SessionRecord>> {
        let row = sqlx::query("SELECT user_id, expires_at FROM sessions WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| SessionError::Database(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user_id: i64 = row
            .try_get("user_id")
            .map_err(|e| SessionError::Database(e.to_string()))?;
        let expires_at: String = row
            .try_get("expires_at")
            .map_err(|e| SessionError::Database(e.to_string()))?;

        let expires_at = DateTime::parse_from_rfc3339(&expires_at)
            .map_err(|_| SessionError::InvalidSession)?
            .with_timezone(&Utc);

        Ok(Some(SessionRecord {
            token: token.to_owned(),
            user_id,
            expires_at,
        }))
    }

    /// Remove a single session, used on logout and expiry
    pub async fn delete_by_token(&self, token: &str) -> SessionResult<()> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| SessionError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::NewUser;
    use crate::repos::UserRepository;
    use crate::testing::create_test_pool;
    use chrono::Duration;

    async fn create_user(pool: &SqlitePool) -> i64 {
        UserRepository::new(pool.clone())
            .create(&NewUser::new(
                "a@x.com".to_string(),
                "$argon2id$hash".to_string(),
                None,
            ))
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn insert_and_find_round_trip() {
        let (pool, _guard) = create_test_pool().await;
        let repo = SessionRepository::new(pool.clone());
        let user_id = create_user(&pool).await;
        let expires_at = Utc::now() + Duration::hours(1);

        repo.insert(user_id, "token-1", expires_at).await.unwrap();

        let record = repo.find_by_token("token-1").await.unwrap().unwrap();
        assert_eq!(record.user_id, user_id);
        assert_eq!(record.expires_at.to_rfc3339(), expires_at.to_rfc3339());

        assert!(repo.find_by_token("token-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_by_token_removes_only_that_session() {
        let (pool, _guard) = create_test_pool().await;
        let repo = SessionRepository::new(pool.clone());
        let user_id = create_user(&pool).await;
        let expires_at = Utc::now() + Duration::hours(1);

        repo.insert(user_id, "token-1", expires_at).await.unwrap();
        repo.insert(user_id, "token-2", expires_at).await.unwrap();

        repo.delete_by_token("token-1").await.unwrap();
        assert!(repo.find_by_token("token-1").await.unwrap().is_none());
        assert!(repo.find_by_token("token-2").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn deleting_the_user_cascades_to_sessions() {
        let (pool, _guard) = create_test_pool().await;
        let repo = SessionRepository::new(pool.clone());
        let user_id = create_user(&pool).await;
        let expires_at = Utc::now() + Duration::hours(1);

        repo.insert(user_id, "token-1", expires_at).await.unwrap();

        UserRepository::new(pool.clone()).delete(user_id).await.unwrap();
        assert!(repo.find_by_token("token-1").await.unwrap().is_none());
    }
}
