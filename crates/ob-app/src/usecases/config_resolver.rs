//! Step configuration read/write path.

use std::sync::Arc;

use tracing::{info, warn};

use ob_core::ports::StepConfigPort;
use ob_core::{ComponentPageMap, StepConfig};

/// Fetches and persists the step layout.
///
/// Reads fail soft to [`StepConfig::default_layout`]; writes surface their
/// error to the caller.
pub struct StepConfigResolver {
    port: Arc<dyn StepConfigPort>,
}

impl StepConfigResolver {
    pub fn new(port: Arc<dyn StepConfigPort>) -> Self {
        Self { port }
    }

    pub async fn fetch(&self) -> StepConfig {
        match self.port.fetch().await {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "step config unavailable, using default layout");
                StepConfig::default_layout()
            }
        }
    }

    pub async fn persist(&self, config: &StepConfig) -> anyhow::Result<()> {
        let map: ComponentPageMap = config.to_page_map();
        self.port.persist(&map).await?;
        info!(groups = map.component_page_map.len(), "step config persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
    use ob_core::{ConfigurableStep, FieldGroupId};

    mock! {
        StepConfigStore {}

        #[async_trait]
        impl StepConfigPort for StepConfigStore {
            async fn fetch(&self) -> anyhow::Result<StepConfig>;
            async fn persist(&self, map: &ComponentPageMap) -> anyhow::Result<()>;
        }
    }

    #[tokio::test]
    async fn fetch_falls_back_to_default_layout_on_error() {
        let mut port = MockStepConfigStore::new();
        port.expect_fetch()
            .times(1)
            .returning(|| Err(anyhow::anyhow!("connection refused")));

        let resolver = StepConfigResolver::new(Arc::new(port));

        assert_eq!(resolver.fetch().await, StepConfig::default_layout());
    }

    #[tokio::test]
    async fn fetch_returns_remote_layout() {
        let remote = StepConfig::default()
            .with_groups(ConfigurableStep::Two, vec![FieldGroupId::Birthdate])
            .with_groups(
                ConfigurableStep::Three,
                vec![FieldGroupId::AboutMe, FieldGroupId::Address],
            );
        let expected = remote.clone();
        let mut port = MockStepConfigStore::new();
        port.expect_fetch().returning(move || Ok(remote.clone()));

        let resolver = StepConfigResolver::new(Arc::new(port));

        assert_eq!(resolver.fetch().await, expected);
    }

    #[tokio::test]
    async fn persist_sends_reverse_mapping_and_surfaces_errors() {
        let mut port = MockStepConfigStore::new();
        port.expect_persist()
            .withf(|map| {
                map.component_page_map.get(&FieldGroupId::Birthdate)
                    == Some(&ConfigurableStep::Three)
                    && map.component_page_map.len() == 3
            })
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("500 Internal Server Error")));

        let resolver = StepConfigResolver::new(Arc::new(port));

        let err = resolver
            .persist(&StepConfig::default_layout())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("500"));
    }
}
