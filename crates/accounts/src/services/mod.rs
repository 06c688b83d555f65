//! Service layer for account and session operations

pub mod account_service;
pub mod mock_repositories;
pub mod session_service;

pub use account_service::{
    AccountService, RegisterRequest, ShelfStore, SqlAccountService, UserStore,
    WEAK_PASSWORD_MESSAGE,
};
pub use session_service::{AuthenticatedIdentity, IssuedSession, SessionService};
