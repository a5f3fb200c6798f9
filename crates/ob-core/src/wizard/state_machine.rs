//! Wizard state machine.
//!
//! Defines a pure state transition function for the onboarding wizard.

use crate::draft::{DraftField, Password, UserDraft};
use crate::registration::{RegistrationPayload, UserId};
use crate::step::WizardStep;
use crate::validation;
use crate::wizard::WizardError;

/// Wizard page state.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum WizardState {
    /// Step 1: credentials not yet verified.
    Credentials { error: Option<WizardError> },
    /// Step 2: dynamic field-groups.
    Details { error: Option<WizardError> },
    /// Step 3: dynamic field-groups, then submission.
    Review { error: Option<WizardError> },
}

impl WizardState {
    pub fn initial() -> Self {
        WizardState::Credentials { error: None }
    }

    pub fn at_step(step: WizardStep) -> Self {
        match step {
            WizardStep::One => WizardState::Credentials { error: None },
            WizardStep::Two => WizardState::Details { error: None },
            WizardStep::Three => WizardState::Review { error: None },
        }
    }

    pub fn step(&self) -> WizardStep {
        match self {
            WizardState::Credentials { .. } => WizardStep::One,
            WizardState::Details { .. } => WizardStep::Two,
            WizardState::Review { .. } => WizardStep::Three,
        }
    }

    pub fn error(&self) -> Option<&WizardError> {
        match self {
            WizardState::Credentials { error }
            | WizardState::Details { error }
            | WizardState::Review { error } => error.as_ref(),
        }
    }

    fn with_error(self, error: Option<WizardError>) -> Self {
        match self {
            WizardState::Credentials { .. } => WizardState::Credentials { error },
            WizardState::Details { .. } => WizardState::Details { error },
            WizardState::Review { .. } => WizardState::Review { error },
        }
    }
}

impl Default for WizardState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Page state plus the draft it is building.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardSession {
    pub state: WizardState,
    pub draft: UserDraft,
}

impl WizardSession {
    pub fn step(&self) -> WizardStep {
        self.state.step()
    }
}

/// Events that drive the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    /// Valid progress was found in the store at mount.
    ProgressRestored { draft: UserDraft, step: WizardStep },
    /// User submits step 1.
    SubmitCredentials { email: String, password: Password },
    /// Email check result: not yet registered.
    EmailAvailable { email: String, password: Password },
    /// Email check result: already registered.
    EmailTaken,
    /// Email check could not be completed.
    EmailCheckFailed,
    /// A field-group reported a change.
    UpdateField { field: DraftField, value: String },
    /// "Next" on step 2, "Complete" on step 3.
    Advance,
    /// Explicit final submission from step 3.
    SubmitFinal,
    RegistrationSucceeded { user_id: UserId },
    RegistrationFailed { message: Option<String> },
    /// Confirmed start-over.
    Reset,
}

/// Side-effects produced by transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    /// Ask the backend whether the email is registered.
    CheckEmailAvailability { email: String, password: Password },
    /// Overwrite the persisted progress.
    SaveProgress { draft: UserDraft, step: WizardStep },
    /// Erase the persisted progress.
    ClearProgress,
    /// Send the complete registration.
    SubmitRegistration { payload: RegistrationPayload },
    /// Hand the assigned id to the caller.
    ReportRegistered { user_id: UserId },
}

/// Pure wizard state machine.
pub struct WizardStateMachine;

impl WizardStateMachine {
    pub fn transition(
        session: WizardSession,
        event: WizardEvent,
    ) -> (WizardSession, Vec<WizardAction>) {
        let WizardSession { state, draft } = session;
        match (state, event) {
            (WizardState::Credentials { error }, WizardEvent::ProgressRestored { draft: restored, step }) => {
                if !restored.is_persistable_at(step) {
                    return (
                        WizardSession {
                            state: WizardState::Credentials { error },
                            draft,
                        },
                        Vec::new(),
                    );
                }
                (
                    WizardSession {
                        state: WizardState::at_step(step),
                        draft: restored,
                    },
                    Vec::new(),
                )
            }
            (
                WizardState::Credentials { .. },
                WizardEvent::SubmitCredentials { email, password },
            ) => {
                if let Err(error) = validation::validate_credentials(&email, &password) {
                    return (
                        WizardSession {
                            state: WizardState::Credentials { error: Some(error) },
                            draft,
                        },
                        Vec::new(),
                    );
                }
                (
                    WizardSession {
                        state: WizardState::Credentials { error: None },
                        draft,
                    },
                    vec![WizardAction::CheckEmailAvailability { email, password }],
                )
            }
            (
                WizardState::Credentials { .. },
                WizardEvent::EmailAvailable { email, password },
            ) => {
                let draft = UserDraft::with_credentials(email, password);
                let next = WizardSession {
                    state: WizardState::Details { error: None },
                    draft,
                };
                let actions = save_progress(&next);
                (next, actions)
            }
            (WizardState::Credentials { .. }, WizardEvent::EmailTaken) => (
                WizardSession {
                    state: WizardState::Credentials {
                        error: Some(WizardError::EmailAlreadyRegistered),
                    },
                    draft,
                },
                Vec::new(),
            ),
            (WizardState::Credentials { .. }, WizardEvent::EmailCheckFailed) => (
                WizardSession {
                    state: WizardState::Credentials {
                        error: Some(WizardError::EmailCheckUnavailable),
                    },
                    draft,
                },
                Vec::new(),
            ),
            (
                state @ (WizardState::Details { .. } | WizardState::Review { .. }),
                WizardEvent::UpdateField { field, value },
            ) => {
                if field == DraftField::Birthdate
                    && !value.is_empty()
                    && !validation::is_iso_date(&value)
                {
                    return (
                        WizardSession {
                            state: state.with_error(Some(WizardError::InvalidBirthdate)),
                            draft,
                        },
                        Vec::new(),
                    );
                }
                let mut draft = draft;
                draft.set_field(field, value);
                let next = WizardSession {
                    state: state.with_error(None),
                    draft,
                };
                let actions = save_progress(&next);
                (next, actions)
            }
            (WizardState::Details { .. }, WizardEvent::Advance) => {
                let next = WizardSession {
                    state: WizardState::Review { error: None },
                    draft,
                };
                let actions = save_progress(&next);
                (next, actions)
            }
            (WizardState::Review { .. }, WizardEvent::Advance | WizardEvent::SubmitFinal) => {
                let payload = RegistrationPayload::from(&draft);
                (
                    WizardSession {
                        state: WizardState::Review { error: None },
                        draft,
                    },
                    vec![WizardAction::SubmitRegistration { payload }],
                )
            }
            (WizardState::Review { .. }, WizardEvent::RegistrationSucceeded { user_id }) => (
                WizardSession::default(),
                vec![
                    WizardAction::ClearProgress,
                    WizardAction::ReportRegistered { user_id },
                ],
            ),
            (WizardState::Review { .. }, WizardEvent::RegistrationFailed { message }) => (
                WizardSession {
                    state: WizardState::Review {
                        error: Some(WizardError::RegistrationFailed { message }),
                    },
                    draft,
                },
                Vec::new(),
            ),
            (WizardState::Details { .. } | WizardState::Review { .. }, WizardEvent::Reset) => {
                (WizardSession::default(), vec![WizardAction::ClearProgress])
            }
            (state, _event) => (WizardSession { state, draft }, Vec::new()),
        }
    }
}

fn save_progress(session: &WizardSession) -> Vec<WizardAction> {
    let step = session.step();
    if session.draft.is_persistable_at(step) {
        vec![WizardAction::SaveProgress {
            draft: session.draft.clone(),
            step,
        }]
    } else {
        Vec::new()
    }
}
