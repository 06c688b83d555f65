//! Account service for registration and account mutations.

use crate::utils::password::{check_password_strength, hash_password, PasswordStrength};
use crate::utils::validation::{validate_display_name, validate_email};
use shelfmark_database::{
    AccountError, AccountResult, NewUser, Shelf, ShelfRepository, User, UserRepository,
};
use sqlx::sqlite::SqlitePool;
use tracing::info;

use super::mock_repositories::{MockShelfRepository, MockUserRepository};

pub const WEAK_PASSWORD_MESSAGE: &str = "Password is too weak";

/// Registration payload as accepted by the service layer
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

/// Service for account lifecycle operations
pub struct AccountService<U, S> {
    user_store: U,
    shelf_store: S,
}

/// The production wiring over the SQLite repositories
pub type SqlAccountService = AccountService<UserRepository, ShelfRepository>;

impl SqlAccountService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            user_store: UserRepository::new(pool.clone()),
            shelf_store: ShelfRepository::new(pool),
        }
    }
}

impl AccountService<MockUserRepository, MockShelfRepository> {
    /// Create an account service over in-memory stores for testing
    pub fn new_for_testing() -> Self {
        Self {
            user_store: MockUserRepository::new(),
            shelf_store: MockShelfRepository::new(),
        }
    }
}

impl<U, S> AccountService<U, S>
where
    U: UserStore,
    S: ShelfStore,
{
    /// List all registered users
    pub async fn list_users(&self) -> AccountResult<Vec<User>> {
        self.user_store.find_all().await
    }

    /// Get a user by ID
    pub async fn get_user(&self, user_id: i64) -> AccountResult<User> {
        self.user_store
            .find_by_id(user_id)
            .await?
            .ok_or(AccountError::UserNotFound)
    }

    /// Resolve the user behind an authenticated identity. The session can
    /// outlive the user row, in which case the caller could not be
    /// determined.
    pub async fn current_user(&self, user_id: i64) -> AccountResult<User> {
        self.user_store
            .find_by_id(user_id)
            .await?
            .ok_or(AccountError::CurrentUserNotFound)
    }

    /// Register a new account and provision its predefined shelves.
    ///
    /// Every constraint is checked before any of them aborts the call, so
    /// the caller gets the full list of violations in input order.
    pub async fn register(&self, request: RegisterRequest) -> AccountResult<User> {
        let mut violations = Vec::new();

        if let Err(message) = validate_email(&request.email) {
            violations.push(message);
        }
        if let Some(display_name) = &request.display_name {
            if let Err(message) = validate_display_name(display_name) {
                violations.push(message);
            }
        }
        if check_password_strength(&request.password) < PasswordStrength::Strong {
            violations.push(WEAK_PASSWORD_MESSAGE.to_string());
        }

        if !violations.is_empty() {
            return Err(AccountError::Validation(violations));
        }

        if self.user_store.email_exists(&request.email).await? {
            return Err(AccountError::EmailTaken);
        }

        let password_hash = hash_password(&request.password)?;
        let new_user = NewUser::new(request.email, password_hash, request.display_name);
        let user = self.user_store.create(&new_user).await?;

        self.shelf_store.create_predefined_set(user.id).await?;

        info!(user_id = user.id, email = %user.email, "registered new user");
        Ok(user)
    }

    /// Change the email address of an existing account. Re-validates format
    /// and uniqueness even when the boundary already did.
    pub async fn change_user_email(&self, user_id: i64, new_email: &str) -> AccountResult<()> {
        let user = self.current_user(user_id).await?;

        if let Err(message) = validate_email(new_email) {
            return Err(AccountError::validation(message));
        }

        // The caller's own address counts as taken as well.
        if self.user_store.email_exists(new_email).await? {
            return Err(AccountError::EmailTaken);
        }

        self.user_store.update_email(user.id, new_email).await?;
        info!(user_id = user.id, "user email updated");
        Ok(())
    }

    /// Change the password of an existing account
    pub async fn change_user_password(&self, user_id: i64, new_password: &str) -> AccountResult<()> {
        if check_password_strength(new_password) < PasswordStrength::Strong {
            return Err(AccountError::validation(WEAK_PASSWORD_MESSAGE));
        }

        let user = self.current_user(user_id).await?;
        let password_hash = hash_password(new_password)?;
        self.user_store
            .update_password_hash(user.id, &password_hash)
            .await?;

        info!(user_id = user.id, "user password updated");
        Ok(())
    }

    /// Delete an account. Owned shelves are detached first so they survive
    /// the owner and the foreign key constraint is satisfied.
    pub async fn delete_user_by_id(&self, user_id: i64) -> AccountResult<User> {
        let user = self.get_user(user_id).await?;

        let detached = self.shelf_store.detach_user(user.id).await?;
        self.user_store.delete(user.id).await?;

        info!(user_id = user.id, detached, "deleted user");
        Ok(user)
    }
}

/// Trait for user stores to allow generic usage
pub trait UserStore {
    async fn find_all(&self) -> AccountResult<Vec<User>>;
    async fn find_by_id(&self, user_id: i64) -> AccountResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AccountResult<Option<User>>;
    async fn email_exists(&self, email: &str) -> AccountResult<bool>;
    async fn create(&self, new_user: &NewUser) -> AccountResult<User>;
    async fn update_email(&self, user_id: i64, new_email: &str) -> AccountResult<()>;
    async fn update_password_hash(&self, user_id: i64, password_hash: &str) -> AccountResult<()>;
    async fn delete(&self, user_id: i64) -> AccountResult<()>;
}

/// Trait for shelf stores to allow generic usage
pub trait ShelfStore {
    async fn create_predefined_set(&self, user_id: i64) -> AccountResult<Vec<Shelf>>;
    async fn detach_user(&self, user_id: i64) -> AccountResult<u64>;
}

impl UserStore for UserRepository {
    async fn find_all(&self) -> AccountResult<Vec<User>> {
        self.find_all().await
    }

    async fn find_by_id(&self, user_id: i64) -> AccountResult<Option<User>> {
        self.find_by_id(user_id).await
    }

    async fn find_by_email(&self, email: &str) -> AccountResult<Option<User>> {
        self.find_by_email(email).await
    }

    async fn email_exists(&self, email: &str) -> AccountResult<bool> {
        self.email_exists(email).await
    }

    async fn create(&self, new_user: &NewUser) -> AccountResult<User> {
        self.create(new_user).await
    }

    async fn update_email(&self, user_id: i64, new_email: &str) -> AccountResult<()> {
        self.update_email(user_id, new_email).await
    }

    async fn update_password_hash(&self, user_id: i64, password_hash: &str) -> AccountResult<()> {
        self.update_password_hash(user_id, password_hash).await
    }

    async fn delete(&self, user_id: i64) -> AccountResult<()> {
        self.delete(user_id).await
    }
}

impl ShelfStore for ShelfRepository {
    async fn create_predefined_set(&self, user_id: i64) -> AccountResult<Vec<Shelf>> {
        self.create_predefined_set(user_id).await
    }

    async fn detach_user(&self, user_id: i64) -> AccountResult<u64> {
        self.detach_user(user_id).await
    }
}

impl UserStore for MockUserRepository {
    async fn find_all(&self) -> AccountResult<Vec<User>> {
        self.find_all().await
    }

    async fn find_by_id(&self, user_id: i64) -> AccountResult<Option<User>> {
        self.find_by_id(user_id).await
    }

    async fn find_by_email(&self, email: &str) -> AccountResult<Option<User>> {
        self.find_by_email(email).await
    }

    async fn email_exists(&self, email: &str) -> AccountResult<bool> {
        self.email_exists(email).await
    }

    async fn create(&self, new_user: &NewUser) -> AccountResult<User> {
        self.create(new_user).await
    }

    async fn update_email(&self, user_id: i64, new_email: &str) -> AccountResult<()> {
        self.update_email(user_id, new_email).await
    }

    async fn update_password_hash(&self, user_id: i64, password_hash: &str) -> AccountResult<()> {
        self.update_password_hash(user_id, password_hash).await
    }

    async fn delete(&self, user_id: i64) -> AccountResult<()> {
        self.delete(user_id).await
    }
}

impl ShelfStore for MockShelfRepository {
    async fn create_predefined_set(&self, user_id: i64) -> AccountResult<Vec<Shelf>> {
        self.create_predefined_set(user_id).await
    }

    async fn detach_user(&self, user_id: i64) -> AccountResult<u64> {
        self.detach_user(user_id).await
    }
}
