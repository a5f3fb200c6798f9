use async_trait::async_trait;
use tokio::sync::Mutex;

use ob_core::ports::{ProgressStorePort, StoredProgress};
use ob_core::{UserDraft, WizardStep};

/// Progress store that lives as long as the process. Used by tests and by
/// `--ephemeral` wizard runs.
#[derive(Default)]
pub struct InMemoryProgressStore {
    stored: Mutex<Option<StoredProgress>>,
}

impl InMemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored copy, without the resumability filter `restore` applies.
    pub async fn peek(&self) -> Option<StoredProgress> {
        self.stored.lock().await.clone()
    }
}

#[async_trait]
impl ProgressStorePort for InMemoryProgressStore {
    async fn save(&self, draft: &UserDraft, step: WizardStep) -> anyhow::Result<()> {
        *self.stored.lock().await = Some(StoredProgress {
            draft: draft.clone(),
            step,
        });
        Ok(())
    }

    async fn restore(&self) -> anyhow::Result<Option<StoredProgress>> {
        Ok(self
            .stored
            .lock()
            .await
            .clone()
            .filter(|progress| progress.draft.is_persistable_at(progress.step)))
    }

    async fn clear(&self) -> anyhow::Result<()> {
        *self.stored.lock().await = None;
        Ok(())
    }
}
