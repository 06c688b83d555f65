//! In-memory store implementations for exercising service logic in tests

use shelfmark_database::{
    now_rfc3339, AccountError, AccountResult, NewUser, PredefinedKind, Shelf, User,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory user store
pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<i64, User>>>,
    next_id: Arc<RwLock<i64>>,
    email_index: Arc<RwLock<HashMap<String, i64>>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(RwLock::new(1)),
            email_index: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn find_all(&self) -> AccountResult<Vec<User>> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by_key(|u| u.id);
        Ok(all)
    }

    pub async fn find_by_id(&self, user_id: i64) -> AccountResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&user_id).cloned())
    }

    pub async fn find_by_email(&self, email: &str) -> AccountResult<Option<User>> {
        let email_index = self.email_index.read().await;
        if let Some(user_id) = email_index.get(email) {
            let users = self.users.read().await;
            Ok(users.get(user_id).cloned())
        } else {
            Ok(None)
        }
    }

    pub async fn email_exists(&self, email: &str) -> AccountResult<bool> {
        let email_index = self.email_index.read().await;
        Ok(email_index.contains_key(email))
    }

    pub async fn create(&self, new_user: &NewUser) -> AccountResult<User> {
        {
            let email_index = self.email_index.read().await;
            if email_index.contains_key(&new_user.email) {
                return Err(AccountError::EmailTaken);
            }
        }

        let mut next_id = self.next_id.write().await;
        let user_id = *next_id;
        *next_id += 1;

        let now = now_rfc3339();
        let user = User {
            id: user_id,
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            display_name: new_user.display_name.clone(),
            created_at: now.clone(),
            updated_at: now,
        };

        let mut users = self.users.write().await;
        users.insert(user_id, user.clone());

        let mut email_index = self.email_index.write().await;
        email_index.insert(new_user.email.clone(), user_id);

        Ok(user)
    }

    pub async fn update_email(&self, user_id: i64, new_email: &str) -> AccountResult<()> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&user_id).ok_or(AccountError::UserNotFound)?;

        let mut email_index = self.email_index.write().await;
        email_index.remove(&user.email);
        email_index.insert(new_email.to_string(), user_id);

        user.email = new_email.to_string();
        user.updated_at = now_rfc3339();
        Ok(())
    }

    pub async fn update_password_hash(
        &self,
        user_id: i64,
        password_hash: &str,
    ) -> AccountResult<()> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&user_id).ok_or(AccountError::UserNotFound)?;
        user.password_hash = password_hash.to_string();
        user.updated_at = now_rfc3339();
        Ok(())
    }

    pub async fn delete(&self, user_id: i64) -> AccountResult<()> {
        let mut users = self.users.write().await;
        let user = users.remove(&user_id).ok_or(AccountError::UserNotFound)?;

        let mut email_index = self.email_index.write().await;
        email_index.remove(&user.email);
        Ok(())
    }
}

/// In-memory shelf store
pub struct MockShelfRepository {
    shelves: Arc<RwLock<HashMap<i64, Shelf>>>,
    next_id: Arc<RwLock<i64>>,
}

impl MockShelfRepository {
    pub fn new() -> Self {
        Self {
            shelves: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(RwLock::new(1)),
        }
    }

    pub async fn create_predefined_set(&self, user_id: i64) -> AccountResult<Vec<Shelf>> {
        let mut created = Vec::with_capacity(PredefinedKind::ALL.len());
        for kind in PredefinedKind::ALL {
            let mut next_id = self.next_id.write().await;
            let shelf_id = *next_id;
            *next_id += 1;

            let shelf = Shelf::predefined(shelf_id, kind, Some(user_id));
            let mut shelves = self.shelves.write().await;
            shelves.insert(shelf_id, shelf.clone());
            created.push(shelf);
        }
        Ok(created)
    }

    pub async fn find_by_user(&self, user_id: i64) -> AccountResult<Vec<Shelf>> {
        let shelves = self.shelves.read().await;
        let mut owned: Vec<Shelf> = shelves
            .values()
            .filter(|s| s.user_id() == Some(user_id))
            .cloned()
            .collect();
        owned.sort_by_key(|s| s.id());
        Ok(owned)
    }

    pub async fn find_detached(&self) -> AccountResult<Vec<Shelf>> {
        let shelves = self.shelves.read().await;
        let mut detached: Vec<Shelf> = shelves
            .values()
            .filter(|s| s.user_id().is_none())
            .cloned()
            .collect();
        detached.sort_by_key(|s| s.id());
        Ok(detached)
    }

    pub async fn detach_user(&self, user_id: i64) -> AccountResult<u64> {
        let mut shelves = self.shelves.write().await;
        let mut detached = 0;
        for shelf in shelves.values_mut() {
            if shelf.user_id() == Some(user_id) {
                shelf.remove_user();
                detached += 1;
            }
        }
        Ok(detached)
    }
}
