//! Wizard orchestrator.
//!
//! Runs the pure wizard state machine and executes the actions it emits
//! against the injected ports.

use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};

use ob_core::ports::{
    ConfirmationPort, EmailAvailabilityPort, ProgressStorePort, RegistrationPort, StepConfigPort,
};
use ob_core::render::{render_all, FieldGroupView};
use ob_core::wizard::WizardStateMachine;
use ob_core::{
    DraftField, Password, StepConfig, UserId, WizardAction, WizardEvent, WizardSession,
};

use crate::usecases::config_resolver::StepConfigResolver;
use crate::usecases::wizard::context::WizardContext;

const RESET_PROMPT: &str = "Are you sure you want to start over? All progress will be lost.";

/// Boundary ports the wizard talks to.
#[derive(Clone)]
pub struct WizardPorts {
    pub email: Arc<dyn EmailAvailabilityPort>,
    pub registration: Arc<dyn RegistrationPort>,
    pub step_config: Arc<dyn StepConfigPort>,
    pub progress: Arc<dyn ProgressStorePort>,
    pub confirmation: Arc<dyn ConfirmationPort>,
}

/// Result of one wizard operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardResponse {
    /// The operation ran; `session` is the state afterwards.
    Completed {
        session: WizardSession,
        /// Set when this operation finished a registration.
        registered_user_id: Option<UserId>,
    },
    /// Another submission was in flight; nothing happened.
    Ignored,
    /// The operator declined the start-over confirmation.
    Declined,
}

impl WizardResponse {
    pub fn session(&self) -> Option<&WizardSession> {
        match self {
            WizardResponse::Completed { session, .. } => Some(session),
            WizardResponse::Ignored | WizardResponse::Declined => None,
        }
    }

    pub fn registered_user_id(&self) -> Option<UserId> {
        match self {
            WizardResponse::Completed {
                registered_user_id, ..
            } => *registered_user_id,
            WizardResponse::Ignored | WizardResponse::Declined => None,
        }
    }
}

pub struct WizardOrchestrator {
    context: Arc<WizardContext>,
    resolver: StepConfigResolver,
    email: Arc<dyn EmailAvailabilityPort>,
    registration: Arc<dyn RegistrationPort>,
    progress: Arc<dyn ProgressStorePort>,
    confirmation: Arc<dyn ConfirmationPort>,
}

impl WizardOrchestrator {
    pub fn new(ports: WizardPorts) -> Self {
        Self {
            context: WizardContext::default().arc(),
            resolver: StepConfigResolver::new(ports.step_config),
            email: ports.email,
            registration: ports.registration,
            progress: ports.progress,
            confirmation: ports.confirmation,
        }
    }

    /// Fetch the step layout and restore saved progress, concurrently.
    ///
    /// Neither failure is visible: the layout falls back to the default and a
    /// failed restore starts a fresh wizard.
    pub async fn mount(&self) -> WizardSession {
        let (config, restored) = tokio::join!(self.resolver.fetch(), self.progress.restore());
        self.context.set_step_config(config).await;

        match restored {
            Ok(Some(progress)) => {
                info!(step = %progress.step, "resuming saved onboarding progress");
                self.dispatch_serialized(WizardEvent::ProgressRestored {
                    draft: progress.draft,
                    step: progress.step,
                })
                .await;
            }
            Ok(None) => debug!("no saved onboarding progress"),
            Err(err) => warn!(error = %err, "failed to restore onboarding progress, starting fresh"),
        }

        self.context.session().await
    }

    pub async fn submit_credentials(
        &self,
        email: impl Into<String>,
        password: Password,
    ) -> WizardResponse {
        self.dispatch_gated(WizardEvent::SubmitCredentials {
            email: email.into(),
            password,
        })
        .await
    }

    /// Merge one field-group change into the draft.
    ///
    /// Waits for an in-flight submission rather than being dropped.
    pub async fn update_field(&self, field: DraftField, value: impl Into<String>) -> WizardResponse {
        self.dispatch_serialized(WizardEvent::UpdateField {
            field,
            value: value.into(),
        })
        .await
    }

    /// "Next" on step 2, "Complete" on step 3.
    pub async fn advance(&self) -> WizardResponse {
        self.dispatch_gated(WizardEvent::Advance).await
    }

    pub async fn submit_final(&self) -> WizardResponse {
        self.dispatch_gated(WizardEvent::SubmitFinal).await
    }

    /// Start over after the operator confirms.
    pub async fn reset(&self) -> WizardResponse {
        if self.context.is_busy() {
            return WizardResponse::Ignored;
        }
        if !self.confirmation.confirm(RESET_PROMPT).await {
            debug!("start over declined");
            return WizardResponse::Declined;
        }
        self.dispatch_gated(WizardEvent::Reset).await
    }

    /// Field-groups for the current step, in layout order.
    ///
    /// Step 1 has no configurable content. Steps 2 and 3 fall back to their
    /// default groups when the layout lists nothing for them.
    pub async fn render_current_step(&self) -> Vec<FieldGroupView> {
        let session = self.context.session().await;
        let Some(step) = session.step().configurable() else {
            return Vec::new();
        };
        let groups = self.context.step_config().await.groups_or_default(step);
        render_all(&groups, &session.draft)
    }

    pub async fn session(&self) -> WizardSession {
        self.context.session().await
    }

    pub async fn step_config(&self) -> StepConfig {
        self.context.step_config().await
    }

    pub fn is_busy(&self) -> bool {
        self.context.is_busy()
    }

    async fn dispatch_gated(&self, event: WizardEvent) -> WizardResponse {
        let Some(_dispatch_guard) = self.context.try_acquire_dispatch_lock() else {
            debug!(event = ?event, "wizard busy, ignoring event");
            return WizardResponse::Ignored;
        };
        self.run(event).await
    }

    async fn dispatch_serialized(&self, event: WizardEvent) -> WizardResponse {
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;
        self.run(event).await
    }

    /// Caller holds the dispatch lock.
    async fn run(&self, event: WizardEvent) -> WizardResponse {
        let span = info_span!("usecase.wizard_orchestrator.dispatch", event = ?event);
        async {
            let mut current = self.context.session().await;
            let mut pending_events = vec![event];
            let mut registered_user_id = None;

            while let Some(event) = pending_events.pop() {
                let from = current.step();
                let event_name = format!("{:?}", event);
                let (next, actions) = WizardStateMachine::transition(current, event);
                info!(from = %from, to = %next.step(), event = %event_name, "wizard transition");
                if let Some(error) = next.state.error() {
                    debug!(error = %error, "wizard showing error");
                }

                for action in actions {
                    match self.execute_action(action).await {
                        ActionOutcome::FollowUp(event) => pending_events.push(event),
                        ActionOutcome::Registered(user_id) => registered_user_id = Some(user_id),
                        ActionOutcome::Done => {}
                    }
                }

                self.context.set_session(next.clone()).await;
                current = next;
            }

            WizardResponse::Completed {
                session: current,
                registered_user_id,
            }
        }
        .instrument(span)
        .await
    }

    async fn execute_action(&self, action: WizardAction) -> ActionOutcome {
        debug!(?action, "wizard executing action");
        match action {
            WizardAction::CheckEmailAvailability { email, password } => {
                match self.email.is_registered(&email).await {
                    Ok(true) => ActionOutcome::FollowUp(WizardEvent::EmailTaken),
                    Ok(false) => {
                        ActionOutcome::FollowUp(WizardEvent::EmailAvailable { email, password })
                    }
                    Err(err) => {
                        warn!(error = %err, "email availability check failed");
                        ActionOutcome::FollowUp(WizardEvent::EmailCheckFailed)
                    }
                }
            }
            WizardAction::SaveProgress { draft, step } => {
                if let Err(err) = self.progress.save(&draft, step).await {
                    warn!(error = %err, step = %step, "failed to save onboarding progress");
                }
                ActionOutcome::Done
            }
            WizardAction::ClearProgress => {
                if let Err(err) = self.progress.clear().await {
                    warn!(error = %err, "failed to clear onboarding progress");
                }
                ActionOutcome::Done
            }
            WizardAction::SubmitRegistration { payload } => {
                match self.registration.register(&payload).await {
                    Ok(user) => ActionOutcome::FollowUp(WizardEvent::RegistrationSucceeded {
                        user_id: user.id,
                    }),
                    Err(err) => {
                        warn!(error = %err, "registration failed");
                        ActionOutcome::FollowUp(WizardEvent::RegistrationFailed {
                            message: err.message().map(str::to_string),
                        })
                    }
                }
            }
            WizardAction::ReportRegistered { user_id } => {
                info!(user_id = %user_id, "registration complete");
                ActionOutcome::Registered(user_id)
            }
        }
    }
}

enum ActionOutcome {
    FollowUp(WizardEvent),
    Registered(UserId),
    Done,
}
