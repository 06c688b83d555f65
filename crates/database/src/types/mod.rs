//! Shared result and error types for the database layer

pub mod errors;

pub use errors::{AccountError, DatabaseError, SessionError};

pub type DatabaseResult<T> = Result<T, DatabaseError>;
pub type AccountResult<T> = Result<T, AccountError>;
pub type SessionResult<T> = Result<T, SessionError>;
