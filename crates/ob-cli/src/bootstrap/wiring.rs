//! # Dependency wiring
//!
//! Builds the infra adapters from [`AppConfig`] and injects them into the use
//! cases through their port traits. Assembly only: no decisions about what
//! the use cases do with them.

use std::sync::Arc;

use ob_app::usecases::{AdminConfigEditor, DataViewer, WizardOrchestrator, WizardPorts};
use ob_core::ports::{ConfirmationPort, ProgressStorePort};
use ob_core::AppConfig;
use ob_infra::{FileProgressStore, HttpOnboardingApi, InMemoryProgressStore};

pub type WiringResult<T> = Result<T, WiringError>;

#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("HTTP client initialization failed: {0}")]
    HttpClient(#[source] anyhow::Error),
}

/// Where the wizard keeps its progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// `<progress.dir>/<progress.namespace>` on disk, resumed across runs.
    Durable,
    /// Process memory; a new run always starts fresh.
    Ephemeral,
}

fn http_api(config: &AppConfig) -> WiringResult<Arc<HttpOnboardingApi>> {
    HttpOnboardingApi::from_config(&config.api)
        .map(Arc::new)
        .map_err(WiringError::HttpClient)
}

fn progress_store(config: &AppConfig, mode: ProgressMode) -> Arc<dyn ProgressStorePort> {
    match mode {
        ProgressMode::Durable => Arc::new(FileProgressStore::from_config(&config.progress)),
        ProgressMode::Ephemeral => Arc::new(InMemoryProgressStore::new()),
    }
}

pub fn wizard_orchestrator(
    config: &AppConfig,
    mode: ProgressMode,
    confirmation: Arc<dyn ConfirmationPort>,
) -> WiringResult<WizardOrchestrator> {
    let api = http_api(config)?;
    Ok(WizardOrchestrator::new(WizardPorts {
        email: api.clone(),
        registration: api.clone(),
        step_config: api,
        progress: progress_store(config, mode),
        confirmation,
    }))
}

pub fn admin_editor(config: &AppConfig) -> WiringResult<AdminConfigEditor> {
    Ok(AdminConfigEditor::new(http_api(config)?))
}

pub fn data_viewer(config: &AppConfig) -> WiringResult<DataViewer> {
    Ok(DataViewer::new(
        http_api(config)?,
        config.viewer.poll_interval(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use ob_core::{DraftField, Password, UserDraft, WizardStep};
    use tempfile::TempDir;

    fn config(dir: PathBuf) -> AppConfig {
        AppConfig::with_system_defaults(dir)
    }

    #[test]
    fn invalid_base_url_is_a_wiring_error() {
        let mut config = config(PathBuf::from("/tmp/onboard"));
        config.api.base_url = "not a url".into();

        assert!(matches!(admin_editor(&config), Err(WiringError::HttpClient(_))));
        assert!(data_viewer(&config).is_err());
    }

    #[tokio::test]
    async fn durable_store_writes_under_the_namespace() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(temp_dir.path().to_path_buf());
        let store = progress_store(&config, ProgressMode::Durable);

        let mut draft = UserDraft::with_credentials("a@x.com", Password::new("secret1"));
        draft.set_field(DraftField::City, "Austin");
        store.save(&draft, WizardStep::Two).await.unwrap();

        assert!(temp_dir
            .path()
            .join(&config.progress.namespace)
            .join(ob_infra::progress::USER_DATA_FILE)
            .exists());
    }

    #[tokio::test]
    async fn ephemeral_store_touches_no_files() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(temp_dir.path().to_path_buf());
        let store = progress_store(&config, ProgressMode::Ephemeral);

        let draft = UserDraft::with_credentials("a@x.com", Password::new("secret1"));
        store.save(&draft, WizardStep::Two).await.unwrap();

        assert!(store.restore().await.unwrap().is_some());
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }
}
