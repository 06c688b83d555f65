//! # Shelfmark Accounts Crate
//!
//! Account management and authentication for the Shelfmark application:
//! registration with shelf provisioning, email and password changes, account
//! deletion, and bearer-token sessions.
//!
//! - **Services**: account and session business logic
//! - **Utils**: password hashing/strength and input validation

pub mod services;
pub mod utils;

// Re-export database types the service API surfaces
pub use shelfmark_database::{
    AccountError, AccountResult, NewUser, SessionError, SessionResult, Shelf, ShelfRepository,
    User, UserRepository,
};

pub use services::{
    AccountService, AuthenticatedIdentity, IssuedSession, RegisterRequest, SessionService,
    ShelfStore, SqlAccountService, UserStore, WEAK_PASSWORD_MESSAGE,
};
pub use utils::password::{
    check_password_strength, hash_password, verify_password, PasswordStrength,
};
