//! Wizard domain module.
//!
//! This module defines the onboarding wizard state machine types.

mod error;
pub mod state_machine;

pub use error::WizardError;
pub use state_machine::{
    WizardAction, WizardEvent, WizardSession, WizardState, WizardStateMachine,
};
