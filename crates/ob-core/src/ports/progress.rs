//! Progress store port
//!
//! Durable local copy of the wizard draft and the step it was saved at, so a
//! user can resume after closing the session. Implementations self-heal: a
//! corrupt copy is erased and reported as "nothing stored".

use async_trait::async_trait;

use crate::draft::UserDraft;
use crate::step::WizardStep;

/// Draft and step recovered from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredProgress {
    pub draft: UserDraft,
    pub step: WizardStep,
}

#[async_trait]
pub trait ProgressStorePort: Send + Sync {
    /// Overwrite the stored copy.
    async fn save(&self, draft: &UserDraft, step: WizardStep) -> anyhow::Result<()>;

    /// Read the stored copy.
    ///
    /// Returns `None` when nothing is stored, when the draft has no email, or
    /// when the step is not past step 1.
    async fn restore(&self) -> anyhow::Result<Option<StoredProgress>>;

    /// Erase the stored copy. Clearing an empty store is not an error.
    async fn clear(&self) -> anyhow::Result<()>;
}
