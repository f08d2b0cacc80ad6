//! Shared helpers for the user store workspace: logging setup, filesystem
//! environment checks and small wire types used by more than one crate.

pub mod types;
pub mod utils;
pub mod env;
