//! Admin configuration editor.
//!
//! Holds its own copy of the step layout, independent of any open wizard.
//! Wizards pick up a saved layout the next time they mount.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use ob_core::ports::StepConfigPort;
use ob_core::step_config::StepConfigError;
use ob_core::{ConfigurableStep, FieldGroupId, StepConfig};

use crate::usecases::config_resolver::StepConfigResolver;

#[derive(Debug, thiserror::Error)]
pub enum AdminEditorError {
    #[error("Each page must have at least one component! Step {0} is empty.")]
    EmptyStep(ConfigurableStep),
    #[error("Failed to save configuration: {0}")]
    Persist(#[source] anyhow::Error),
}

impl From<StepConfigError> for AdminEditorError {
    fn from(err: StepConfigError) -> Self {
        match err {
            StepConfigError::EmptyStep(step) => AdminEditorError::EmptyStep(step),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// A previous save is still in flight; this one did nothing.
    AlreadySaving,
}

/// A field-group picked up from the step it currently sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragPayload {
    pub group: FieldGroupId,
    pub from: ConfigurableStep,
}

pub struct AdminConfigEditor {
    resolver: StepConfigResolver,
    config: Mutex<StepConfig>,
    saving: AtomicBool,
}

impl AdminConfigEditor {
    pub fn new(port: Arc<dyn StepConfigPort>) -> Self {
        Self {
            resolver: StepConfigResolver::new(port),
            config: Mutex::new(StepConfig::default()),
            saving: AtomicBool::new(false),
        }
    }

    /// Fetch the remote layout into the editor, falling back to the default.
    pub async fn load(&self) -> StepConfig {
        let config = self.resolver.fetch().await;
        *self.config.lock().await = config.clone();
        config
    }

    pub async fn config(&self) -> StepConfig {
        self.config.lock().await.clone()
    }

    /// Reassign `group` to `target`, removing it from wherever it was.
    pub async fn move_group(&self, group: FieldGroupId, target: ConfigurableStep) -> StepConfig {
        let mut config = self.config.lock().await;
        config.move_group(group, target);
        debug!(group = %group, target = %target, "field-group moved");
        config.clone()
    }

    /// Start dragging `group`; `None` when it is in no step.
    pub async fn begin_drag(&self, group: FieldGroupId) -> Option<DragPayload> {
        let from = self.config.lock().await.step_of(group)?;
        Some(DragPayload { group, from })
    }

    /// Dropping onto the step a group came from is not a move.
    pub fn can_drop(payload: &DragPayload, target: ConfigurableStep) -> bool {
        payload.from != target
    }

    /// Complete a drag. A drop rejected by [`Self::can_drop`] changes nothing.
    pub async fn drop_on(&self, payload: DragPayload, target: ConfigurableStep) -> StepConfig {
        if !Self::can_drop(&payload, target) {
            return self.config().await;
        }
        self.move_group(payload.group, target).await
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::SeqCst)
    }

    /// Whether the save control is enabled.
    pub async fn can_save(&self) -> bool {
        !self.is_saving() && self.config.lock().await.validate_non_empty().is_ok()
    }

    /// Validate and persist the current layout.
    ///
    /// An empty step aborts before any boundary call. A save issued while
    /// another is in flight is a no-op.
    pub async fn save(&self) -> Result<SaveOutcome, AdminEditorError> {
        if self
            .saving
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("save already in flight");
            return Ok(SaveOutcome::AlreadySaving);
        }
        let _saving = SavingGuard(&self.saving);

        let config = self.config().await;
        config.validate_non_empty()?;

        match self.resolver.persist(&config).await {
            Ok(()) => {
                info!("admin step configuration saved");
                Ok(SaveOutcome::Saved)
            }
            Err(err) => {
                warn!(error = %err, "admin step configuration save failed");
                Err(AdminEditorError::Persist(err))
            }
        }
    }
}

/// Clears the saving flag even if the save future is dropped mid-flight.
struct SavingGuard<'a>(&'a AtomicBool);

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
