pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::{load_config, resolve_config, ConfigError};
pub use self::tracing::init_tracing_subscriber;
pub use wiring::{admin_editor, data_viewer, wizard_orchestrator};
