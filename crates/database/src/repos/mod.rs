//! Repository implementations for the Shelfmark database

pub mod session_repository;
pub mod shelf_repository;
pub mod user_repository;

pub use session_repository::{SessionRecord, SessionRepository};
pub use shelf_repository::ShelfRepository;
pub use user_repository::UserRepository;
