//! Progress store adapters.

mod file_store;
mod memory_store;

pub use file_store::{FileProgressStore, STEP_FILE, USER_DATA_FILE};
pub use memory_store::InMemoryProgressStore;
