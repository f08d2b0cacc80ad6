//! Data model for the user collection: the `User` record, the persisted
//! `UserStore` document and the errors raised while working on it in memory.

pub mod errors;
pub mod user;

pub use user::{User, UserList, UserStore};
