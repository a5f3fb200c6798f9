//! File-based progress store
//!
//! Persists the wizard draft and current step under
//! `<dir>/<namespace>/`, one file each, so a wizard can resume after the
//! process exits.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use ob_core::config::ProgressConfig;
use ob_core::ports::{ProgressStorePort, StoredProgress};
use ob_core::{UserDraft, WizardStep};

pub const USER_DATA_FILE: &str = "user_data.json";
pub const STEP_FILE: &str = "current_step";

pub struct FileProgressStore {
    namespace_dir: PathBuf,
}

impl FileProgressStore {
    /// Store rooted at `namespace_dir`.
    pub fn new(namespace_dir: PathBuf) -> Self {
        Self { namespace_dir }
    }

    /// Store at `base_dir/namespace`.
    pub fn with_namespace(base_dir: PathBuf, namespace: impl AsRef<str>) -> Self {
        Self::new(base_dir.join(namespace.as_ref()))
    }

    pub fn from_config(config: &ProgressConfig) -> Self {
        Self::with_namespace(config.dir.clone(), &config.namespace)
    }

    fn user_data_path(&self) -> PathBuf {
        self.namespace_dir.join(USER_DATA_FILE)
    }

    fn step_path(&self) -> PathBuf {
        self.namespace_dir.join(STEP_FILE)
    }

    async fn ensure_dir(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.namespace_dir)
            .await
            .with_context(|| format!("failed to create {}", self.namespace_dir.display()))
    }

    /// Erase a copy that could not be parsed.
    async fn heal(&self, reason: &str) -> anyhow::Result<Option<StoredProgress>> {
        warn!(reason, dir = %self.namespace_dir.display(), "discarding corrupt onboarding progress");
        self.clear().await?;
        Ok(None)
    }
}

async fn read_optional(path: &Path) -> anyhow::Result<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
    }
}

async fn write_synced(path: &Path, content: &[u8]) -> anyhow::Result<()> {
    let mut file = fs::File::create(path)
        .await
        .with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(content)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    file.sync_all()
        .await
        .with_context(|| format!("failed to sync {}", path.display()))?;
    Ok(())
}

async fn remove_if_exists(path: &Path) -> anyhow::Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).with_context(|| format!("failed to remove {}", path.display())),
    }
}

#[async_trait]
impl ProgressStorePort for FileProgressStore {
    async fn save(&self, draft: &UserDraft, step: WizardStep) -> anyhow::Result<()> {
        self.ensure_dir().await?;
        let json =
            serde_json::to_string_pretty(draft).context("failed to serialize onboarding draft")?;
        write_synced(&self.user_data_path(), json.as_bytes()).await?;
        write_synced(&self.step_path(), step.to_string().as_bytes()).await?;
        debug!(step = %step, "onboarding progress saved");
        Ok(())
    }

    async fn restore(&self) -> anyhow::Result<Option<StoredProgress>> {
        let user_data = read_optional(&self.user_data_path()).await?;
        let step = read_optional(&self.step_path()).await?;
        let (Some(user_data), Some(step)) = (user_data, step) else {
            return Ok(None);
        };

        let draft: UserDraft = match serde_json::from_str(&user_data) {
            Ok(draft) => draft,
            Err(_) => return self.heal("unparseable draft").await,
        };
        let step: WizardStep = match step.parse() {
            Ok(step) => step,
            Err(_) => return self.heal("unparseable step").await,
        };

        if !draft.is_persistable_at(step) {
            debug!(step = %step, "saved progress not resumable");
            return Ok(None);
        }
        Ok(Some(StoredProgress { draft, step }))
    }

    async fn clear(&self) -> anyhow::Result<()> {
        remove_if_exists(&self.user_data_path()).await?;
        remove_if_exists(&self.step_path()).await?;
        Ok(())
    }
}
