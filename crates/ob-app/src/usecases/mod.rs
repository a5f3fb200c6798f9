pub mod admin;
pub mod config_resolver;
pub mod viewer;
pub mod wizard;

pub use admin::{AdminConfigEditor, AdminEditorError, DragPayload, SaveOutcome};
pub use config_resolver::StepConfigResolver;
pub use viewer::{DataViewer, ViewerSnapshot};
pub use wizard::{WizardContext, WizardOrchestrator, WizardPorts, WizardResponse};
