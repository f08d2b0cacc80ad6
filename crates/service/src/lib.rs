//! Service layer for the user collection.
//! - `storage` owns the persisted document (load/save of the whole file).
//! - `user_service` runs each operation as one load → mutate → save cycle.
//! - `errors` carries the failure kinds every operation can report.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod user_service;
#[cfg(test)]
pub mod test_support;
