//! Remote step configuration port

use async_trait::async_trait;

use crate::step_config::{ComponentPageMap, StepConfig};

#[async_trait]
pub trait StepConfigPort: Send + Sync {
    /// Fetch the current layout. Unknown keys are already dropped.
    async fn fetch(&self) -> anyhow::Result<StepConfig>;

    /// Replace the remote layout with `map`.
    async fn persist(&self, map: &ComponentPageMap) -> anyhow::Result<()>;
}
