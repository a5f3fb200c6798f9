//! Subcommand handlers. Each takes already-wired use cases.

pub mod admin;
pub mod users;
pub mod wizard;

pub use wizard::run_wizard;
