//! Port interfaces for the application layer
//!
//! Ports are the contract between the onboarding use cases and whatever
//! talks to the backend, the progress store or the terminal. Adapters live
//! in `ob-infra` and `ob-cli`; use cases only ever hold `Arc<dyn ...Port>`.

pub mod confirmation;
pub mod email;
pub mod progress;
pub mod registration;
pub mod step_config;
pub mod user_directory;

pub use confirmation::ConfirmationPort;
pub use email::{EmailAvailabilityPort, EmailCheckError};
pub use progress::{ProgressStorePort, StoredProgress};
pub use registration::{RegistrationError, RegistrationPort};
pub use step_config::StepConfigPort;
pub use user_directory::{UserDirectoryError, UserDirectoryPort};
