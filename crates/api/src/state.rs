use std::sync::Arc;

use shelfmark_accounts::{AuthenticatedIdentity, SessionService, SqlAccountService, User};
use shelfmark_mailer::Mailer;
use sqlx::sqlite::SqlitePool;

use crate::ApiError;

#[derive(Clone)]
pub struct AppState {
    accounts: Arc<SqlAccountService>,
    sessions: Arc<SessionService>,
    mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(pool: SqlitePool, session_ttl_seconds: u64, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            accounts: Arc::new(SqlAccountService::new(pool.clone())),
            sessions: Arc::new(SessionService::new(pool, session_ttl_seconds)),
            mailer,
        }
    }

    pub fn accounts(&self) -> &SqlAccountService {
        &self.accounts
    }

    pub fn sessions(&self) -> &SessionService {
        &self.sessions
    }

    pub fn mailer(&self) -> &dyn Mailer {
        self.mailer.as_ref()
    }

    /// Resolve a bearer token to the identity behind it
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedIdentity, ApiError> {
        self.sessions
            .authenticate_token(token)
            .await
            .map_err(ApiError::from)
    }

    /// Resolve a bearer token all the way to the user record. A session
    /// whose user row has since vanished yields not-found, not
    /// unauthorized.
    pub async fn current_user(&self, token: &str) -> Result<User, ApiError> {
        let identity = self.authenticate(token).await?;
        self.accounts
            .current_user(identity.user_id)
            .await
            .map_err(ApiError::from)
    }
}
