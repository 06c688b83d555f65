use chrono::Utc;
use serde::Serialize;

/// Represents a registered user
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Database primary key, stable for the lifetime of the account
    pub id: i64,
    /// Email address, unique, doubles as the login name
    pub email: String,
    /// Argon2 PHC string, never handed to clients
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Optional display name shown in notifications
    pub display_name: Option<String>,
    /// When the user was created
    pub created_at: String,
    /// When the user was last updated
    pub updated_at: String,
}

impl User {
    /// The name used to address the user in notification mail. Falls back to
    /// the local part of the email address when no display name is set.
    pub fn salutation(&self) -> &str {
        match &self.display_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}

/// Insert payload for a new user record. Carries the already-hashed
/// password; plaintext never reaches the repository.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
}

impl NewUser {
    pub fn new(email: String, password_hash: String, display_name: Option<String>) -> Self {
        Self {
            email,
            password_hash,
            display_name,
        }
    }
}

/// RFC 3339 timestamp for entity bookkeeping columns
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(email: &str, display_name: Option<&str>) -> User {
        User {
            id: 1,
            email: email.to_string(),
            password_hash: "$argon2id$hash".to_string(),
            display_name: display_name.map(str::to_string),
            created_at: now_rfc3339(),
            updated_at: now_rfc3339(),
        }
    }

    #[test]
    fn salutation_prefers_display_name() {
        let user = user_with("jane@example.com", Some("Jane"));
        assert_eq!(user.salutation(), "Jane");
    }

    #[test]
    fn salutation_falls_back_to_email_local_part() {
        let user = user_with("jane@example.com", None);
        assert_eq!(user.salutation(), "jane");

        let blank = user_with("jane@example.com", Some("   "));
        assert_eq!(blank.salutation(), "jane");
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let user = user_with("jane@example.com", Some("Jane"));
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("$argon2id$"));
    }
}
