//! # ob-core
//!
//! Core domain models and business logic for the onboarding wizard.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

// Public module exports
pub mod config;
pub mod draft;
pub mod field_group;
pub mod ports;
pub mod registration;
pub mod render;
pub mod step;
pub mod step_config;
pub mod user;
pub mod validation;
pub mod wizard;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use draft::{DraftField, Password, UserDraft};
pub use field_group::FieldGroupId;
pub use registration::{RegisteredUser, RegistrationPayload, UserId};
pub use step::{ConfigurableStep, WizardStep};
pub use step_config::{ComponentPageMap, StepConfig};
pub use user::UserRecord;
pub use wizard::{WizardAction, WizardError, WizardEvent, WizardSession, WizardState};
