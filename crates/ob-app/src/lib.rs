//! # ob-app
//!
//! Application layer: use cases that drive the onboarding domain through the
//! ports declared in `ob-core`.

pub mod usecases;

pub use usecases::{
    AdminConfigEditor, DataViewer, StepConfigResolver, ViewerSnapshot, WizardOrchestrator,
    WizardResponse,
};
