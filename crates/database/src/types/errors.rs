//! Error types for the persistence and account layers

use thiserror::Error;

/// General database error
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Database migration error: {0}")]
    MigrationError(String),

    #[error("Database query error: {0}")]
    QueryError(String),
}

/// Account-level errors shared by the repositories and the account service.
///
/// The taxonomy mirrors the transport mapping: validation and uniqueness
/// failures are client errors, credential mismatches are unauthorized,
/// missing lookups are not-found, and notification failures are delivery
/// problems rather than input problems.
#[derive(Debug, Error)]
pub enum AccountError {
    /// One or more input constraints were violated. Messages are kept in the
    /// order the violations were found.
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("email taken")]
    EmailTaken,

    #[error("incorrect password")]
    IncorrectPassword,

    #[error("user not found")]
    UserNotFound,

    #[error("could not determine the current user")]
    CurrentUserNotFound,

    #[error("notification delivery failed: {0}")]
    Notification(String),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("database error: {0}")]
    Database(String),
}

impl AccountError {
    /// Single-message validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        AccountError::Validation(vec![message.into()])
    }
}

/// Session-specific errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("session not found")]
    SessionNotFound,

    #[error("session expired")]
    SessionExpired,

    #[error("invalid session token")]
    InvalidSession,

    #[error("database error: {0}")]
    Database(String),
}
