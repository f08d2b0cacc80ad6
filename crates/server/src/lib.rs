pub mod errors;
pub mod routes;
pub mod startup;

pub use startup::{build_app, run, run_until};
