mod context;
mod orchestrator;

pub use context::WizardContext;
pub use orchestrator::{WizardOrchestrator, WizardPorts, WizardResponse};
