//! Entity definitions for the Shelfmark database

pub mod shelf;
pub mod user;

pub use shelf::{CustomShelf, PredefinedKind, PredefinedShelf, Shelf, ShelfCore};
pub use user::{now_rfc3339, NewUser, User};
