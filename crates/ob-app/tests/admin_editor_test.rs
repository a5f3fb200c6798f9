use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use ob_app::usecases::{AdminConfigEditor, SaveOutcome, WizardOrchestrator, WizardPorts};
use ob_core::ports::{
    ConfirmationPort, EmailAvailabilityPort, EmailCheckError, RegistrationError,
    RegistrationPort, StepConfigPort,
};
use ob_core::{
    ComponentPageMap, ConfigurableStep, FieldGroupId, Password, RegisteredUser,
    RegistrationPayload, StepConfig, WizardStep,
};
use ob_infra::InMemoryProgressStore;

/// Remote config store shared by admin editors and wizards.
struct SharedConfigStore {
    current: StdMutex<StepConfig>,
    persisted: StdMutex<Vec<ComponentPageMap>>,
    gate: Option<Arc<Notify>>,
    persist_calls: AtomicUsize,
}

impl SharedConfigStore {
    fn new() -> Self {
        Self {
            current: StdMutex::new(StepConfig::default_layout()),
            persisted: StdMutex::new(Vec::new()),
            gate: None,
            persist_calls: AtomicUsize::new(0),
        }
    }

    fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new()
        }
    }
}

#[async_trait]
impl StepConfigPort for SharedConfigStore {
    async fn fetch(&self) -> anyhow::Result<StepConfig> {
        Ok(self.current.lock().unwrap().clone())
    }

    async fn persist(&self, map: &ComponentPageMap) -> anyhow::Result<()> {
        self.persist_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let mut config = StepConfig::default();
        for (group, step) in &map.component_page_map {
            config.move_group(*group, *step);
        }
        *self.current.lock().unwrap() = config;
        self.persisted.lock().unwrap().push(map.clone());
        Ok(())
    }
}

struct NoBackend;

#[async_trait]
impl EmailAvailabilityPort for NoBackend {
    async fn is_registered(&self, _email: &str) -> Result<bool, EmailCheckError> {
        Ok(false)
    }
}

#[async_trait]
impl RegistrationPort for NoBackend {
    async fn register(
        &self,
        _payload: &RegistrationPayload,
    ) -> Result<RegisteredUser, RegistrationError> {
        Err(RegistrationError::Transport("offline".into()))
    }
}

#[async_trait]
impl ConfirmationPort for NoBackend {
    async fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

async fn wizard_at_step_two(config: Arc<SharedConfigStore>) -> WizardOrchestrator {
    let progress = Arc::new(InMemoryProgressStore::new());
    let wizard = WizardOrchestrator::new(WizardPorts {
        email: Arc::new(NoBackend),
        registration: Arc::new(NoBackend),
        step_config: config,
        progress,
        confirmation: Arc::new(NoBackend),
    });
    wizard.mount().await;
    wizard
        .submit_credentials("new@x.com", Password::new("secret1"))
        .await;
    assert_eq!(wizard.session().await.step(), WizardStep::Two);
    wizard
}

async fn rendered_ids(wizard: &WizardOrchestrator) -> Vec<FieldGroupId> {
    wizard
        .render_current_step()
        .await
        .into_iter()
        .map(|view| view.id)
        .collect()
}

#[tokio::test]
async fn save_while_saving_is_a_no_op() {
    let gate = Arc::new(Notify::new());
    let store = Arc::new(SharedConfigStore::gated(gate.clone()));
    let editor = Arc::new(AdminConfigEditor::new(store.clone()));
    editor.load().await;
    editor
        .move_group(FieldGroupId::Birthdate, ConfigurableStep::Two)
        .await;
    editor
        .move_group(FieldGroupId::AboutMe, ConfigurableStep::Three)
        .await;

    let first = {
        let editor = editor.clone();
        tokio::spawn(async move { editor.save().await })
    };
    while store.persist_calls.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }
    assert!(editor.is_saving());
    assert!(!editor.can_save().await);

    assert_eq!(editor.save().await.unwrap(), SaveOutcome::AlreadySaving);

    gate.notify_one();
    assert_eq!(first.await.unwrap().unwrap(), SaveOutcome::Saved);
    assert!(!editor.is_saving());
    assert_eq!(store.persist_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn open_wizard_keeps_its_layout_until_it_mounts_again() {
    let store = Arc::new(SharedConfigStore::new());
    let open_wizard = wizard_at_step_two(store.clone()).await;
    assert_eq!(
        rendered_ids(&open_wizard).await,
        vec![FieldGroupId::AboutMe, FieldGroupId::Address]
    );

    let editor = AdminConfigEditor::new(store.clone());
    editor.load().await;
    editor
        .move_group(FieldGroupId::Address, ConfigurableStep::Three)
        .await;
    assert_eq!(editor.save().await.unwrap(), SaveOutcome::Saved);

    assert_eq!(
        rendered_ids(&open_wizard).await,
        vec![FieldGroupId::AboutMe, FieldGroupId::Address]
    );

    let fresh_wizard = wizard_at_step_two(store.clone()).await;
    assert_eq!(rendered_ids(&fresh_wizard).await, vec![FieldGroupId::AboutMe]);
    assert_eq!(
        store.persisted.lock().unwrap()[0]
            .component_page_map
            .get(&FieldGroupId::Address),
        Some(&ConfigurableStep::Three)
    );
}

#[tokio::test]
async fn rejected_save_leaves_remote_untouched() {
    let store = Arc::new(SharedConfigStore::new());
    let editor = AdminConfigEditor::new(store.clone());
    editor.load().await;
    editor
        .move_group(FieldGroupId::AboutMe, ConfigurableStep::Three)
        .await;
    editor
        .move_group(FieldGroupId::Address, ConfigurableStep::Three)
        .await;

    assert!(editor.save().await.is_err());
    assert_eq!(store.persist_calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        *store.current.lock().unwrap(),
        StepConfig::default_layout()
    );
}
