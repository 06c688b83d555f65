//! Session service for login, token authentication, and logout.

use crate::utils::password::verify_password;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use shelfmark_database::{
    SessionError, SessionRepository, SessionResult, User, UserRepository,
};
use sqlx::sqlite::SqlitePool;
use tracing::{info, warn};

const TOKEN_BYTES: usize = 32;

/// The caller a valid session resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub user_id: i64,
}

/// A freshly issued session
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Service for session operations
pub struct SessionService {
    session_repository: SessionRepository,
    user_repository: UserRepository,
    session_ttl: Duration,
}

impl SessionService {
    pub fn new(pool: SqlitePool, session_ttl_seconds: u64) -> Self {
        Self {
            session_repository: SessionRepository::new(pool.clone()),
            user_repository: UserRepository::new(pool),
            session_ttl: Duration::seconds(session_ttl_seconds as i64),
        }
    }

    /// Verify credentials and issue a new session token.
    ///
    /// Unknown addresses and wrong passwords produce the same error so the
    /// response does not reveal which accounts exist.
    pub async fn login(&self, email: &str, password: &str) -> SessionResult<IssuedSession> {
        let user = self
            .user_repository
            .find_by_email(email)
            .await
            .map_err(|e| SessionError::Database(e.to_string()))?
            .ok_or(SessionError::InvalidCredentials)?;

        let matches = verify_password(password, &user.password_hash)
            .map_err(|e| SessionError::Database(e.to_string()))?;
        if !matches {
            warn!(user_id = user.id, "login attempt with wrong password");
            return Err(SessionError::InvalidCredentials);
        }

        let token = generate_token();
        let expires_at = Utc::now() + self.session_ttl;
        self.session_repository
            .insert(user.id, &token, expires_at)
            .await?;

        info!(user_id = user.id, "session issued");
        Ok(IssuedSession {
            user,
            token,
            expires_at,
        })
    }

    /// Resolve a bearer token to the identity behind it. Expired sessions
    /// are deleted on sight.
    pub async fn authenticate_token(&self, token: &str) -> SessionResult<AuthenticatedIdentity> {
        if token.trim().is_empty() {
            return Err(SessionError::InvalidSession);
        }

        let record = self
            .session_repository
            .find_by_token(token)
            .await?
            .ok_or(SessionError::SessionNotFound)?;

        if record.expires_at <= Utc::now() {
            self.session_repository.delete_by_token(token).await?;
            return Err(SessionError::SessionExpired);
        }

        Ok(AuthenticatedIdentity {
            user_id: record.user_id,
        })
    }

    /// Invalidate a session token (logout)
    pub async fn logout(&self, token: &str) -> SessionResult<()> {
        self.session_repository.delete_by_token(token).await
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::password::hash_password;
    use shelfmark_config::DatabaseConfig;
    use shelfmark_database::{initialize_database, NewUser};
    use tempfile::TempDir;

    async fn create_test_session_service() -> (SessionService, SqlitePool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test_sessions.db");
        let config = DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            max_connections: 2,
        };

        let pool = initialize_database(&config).await.unwrap();
        let service = SessionService::new(pool.clone(), 3600);
        (service, pool, temp_dir)
    }

    async fn seed_user(pool: &SqlitePool, email: &str, password: &str) -> User {
        let hash = hash_password(password).unwrap();
        UserRepository::new(pool.clone())
            .create(&NewUser::new(email.to_string(), hash, None))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn login_issues_authenticatable_token() {
        let (service, pool, _temp_dir) = create_test_session_service().await;
        let user = seed_user(&pool, "reader@example.com", "Str0ng!Pass").await;

        let issued = service.login("reader@example.com", "Str0ng!Pass").await.unwrap();

        assert_eq!(issued.user.id, user.id);
        assert!(!issued.token.is_empty());
        assert!(issued.expires_at > Utc::now());

        let identity = service.authenticate_token(&issued.token).await.unwrap();
        assert_eq!(identity.user_id, user.id);
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let (service, pool, _temp_dir) = create_test_session_service().await;
        seed_user(&pool, "reader@example.com", "Str0ng!Pass").await;

        let result = service.login("reader@example.com", "Wr0ng!Pass").await;
        assert!(matches!(result, Err(SessionError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn login_rejects_unknown_email() {
        let (service, _pool, _temp_dir) = create_test_session_service().await;

        let result = service.login("ghost@example.com", "Str0ng!Pass").await;
        assert!(matches!(result, Err(SessionError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn tokens_are_unique_per_login() {
        let (service, pool, _temp_dir) = create_test_session_service().await;
        seed_user(&pool, "reader@example.com", "Str0ng!Pass").await;

        let first = service.login("reader@example.com", "Str0ng!Pass").await.unwrap();
        let second = service.login("reader@example.com", "Str0ng!Pass").await.unwrap();
        assert_ne!(first.token, second.token);
    }

    #[tokio::test]
    async fn authenticate_unknown_token() {
        let (service, _pool, _temp_dir) = create_test_session_service().await;

        let result = service.authenticate_token("no-such-token").await;
        assert!(matches!(result, Err(SessionError::SessionNotFound)));
    }

    #[tokio::test]
    async fn authenticate_blank_token() {
        let (service, _pool, _temp_dir) = create_test_session_service().await;

        let result = service.authenticate_token("  ").await;
        assert!(matches!(result, Err(SessionError::InvalidSession)));
    }

    #[tokio::test]
    async fn expired_sessions_are_rejected_and_removed() {
        let (service, pool, _temp_dir) = create_test_session_service().await;
        let user = seed_user(&pool, "reader@example.com", "Str0ng!Pass").await;

        let repo = SessionRepository::new(pool.clone());
        let expired_at = Utc::now() - Duration::hours(1);
        repo.insert(user.id, "stale-token", expired_at).await.unwrap();

        let result = service.authenticate_token("stale-token").await;
        assert!(matches!(result, Err(SessionError::SessionExpired)));

        // The stale record is gone, so a retry no longer finds it.
        let result = service.authenticate_token("stale-token").await;
        assert!(matches!(result, Err(SessionError::SessionNotFound)));
    }

    #[tokio::test]
    async fn logout_invalidates_token() {
        let (service, pool, _temp_dir) = create_test_session_service().await;
        seed_user(&pool, "reader@example.com", "Str0ng!Pass").await;

        let issued = service.login("reader@example.com", "Str0ng!Pass").await.unwrap();
        service.logout(&issued.token).await.unwrap();

        let result = service.authenticate_token(&issued.token).await;
        assert!(matches!(result, Err(SessionError::SessionNotFound)));
    }
}
