//! Storage abstractions for the service layer
//!
//! `UserRepository` is the seam between the user service and wherever the
//! store document lives; `json_file_store` keeps it in a single JSON file.

pub mod json_file_store;
pub mod repository;

pub use json_file_store::JsonFileUserRepository;
pub use repository::UserRepository;
