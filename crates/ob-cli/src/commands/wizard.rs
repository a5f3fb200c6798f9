//! Interactive registration wizard.

use tracing::info;

use ob_app::{WizardOrchestrator, WizardResponse};
use ob_core::render::FieldView;
use ob_core::{DraftField, Password, UserId, WizardError, WizardSession, WizardStep};

use crate::terminal::Prompt;

const TOTAL_STEPS: u8 = 3;

/// What the user chose after filling a details step.
enum StepChoice {
    Continue,
    StartOver,
    Quit,
}

/// Run the wizard until registration completes or input ends.
///
/// Returns the new user's id, or `None` when the user quit. Saved progress
/// is left in place on quit so the next run resumes.
pub async fn run_wizard(
    wizard: &WizardOrchestrator,
    prompt: &Prompt,
) -> anyhow::Result<Option<UserId>> {
    let session = wizard.mount().await;
    if session.step() > WizardStep::One {
        prompt
            .say(format!(
                "Resuming registration for {} at step {}.",
                session.draft.email,
                session.step()
            ))
            .await?;
    }

    let mut last_credentials: Option<Credentials> = None;
    loop {
        let session = wizard.session().await;
        prompt
            .say(format!("\n== Step {} of {TOTAL_STEPS} ==", session.step()))
            .await?;
        show_error(prompt, &session).await?;

        let response = match session.step() {
            WizardStep::One => {
                let Some(credentials) = ask_credentials(prompt, last_credentials.as_ref()).await?
                else {
                    return Ok(None);
                };
                let response = wizard
                    .submit_credentials(&credentials.email, credentials.password.clone())
                    .await;
                last_credentials = Some(credentials);
                response
            }
            step @ (WizardStep::Two | WizardStep::Three) => {
                if !fill_fields(wizard, prompt).await? {
                    return Ok(None);
                }
                match choose(prompt, step).await? {
                    StepChoice::Quit => {
                        prompt.say("Progress saved. Run again to continue.").await?;
                        return Ok(None);
                    }
                    StepChoice::StartOver => wizard.reset().await,
                    StepChoice::Continue if step == WizardStep::Two => wizard.advance().await,
                    StepChoice::Continue => wizard.submit_final().await,
                }
            }
        };

        if let Some(user_id) = response.registered_user_id() {
            info!(%user_id, "registration completed");
            prompt
                .say(format!("Registration Complete! User ID: {user_id}"))
                .await?;
            return Ok(Some(user_id));
        }
        if matches!(response, WizardResponse::Declined) {
            prompt.say("Keeping your progress.").await?;
        }
    }
}

/// Step-one answers, offered again when the step is re-asked.
struct Credentials {
    email: String,
    password: Password,
}

/// Ask for email and password. With `previous` set, an empty answer keeps
/// the previous value. Returns `None` when input ended.
async fn ask_credentials(
    prompt: &Prompt,
    previous: Option<&Credentials>,
) -> anyhow::Result<Option<Credentials>> {
    let email_question = match previous {
        Some(previous) => format!("Email [{}]: ", previous.email),
        None => "Email: ".to_string(),
    };
    let Some(email) = prompt.ask(&email_question).await? else {
        return Ok(None);
    };
    let email = match (email.trim(), previous) {
        ("", Some(previous)) => previous.email.clone(),
        (email, _) => email.to_string(),
    };

    let password_question = if previous.is_some() {
        "Password [unchanged]: "
    } else {
        "Password: "
    };
    let Some(password) = prompt.ask_secret(password_question).await? else {
        return Ok(None);
    };
    let password = match previous {
        Some(previous) if password.is_empty() => previous.password.clone(),
        _ => Password::new(password),
    };

    Ok(Some(Credentials { email, password }))
}

async fn show_error(prompt: &Prompt, session: &WizardSession) -> anyhow::Result<()> {
    if let Some(error) = session.state.error() {
        prompt.say(format!("! {error}")).await?;
    }
    Ok(())
}

/// Ask for every field on the current step. An empty answer keeps the
/// current value. Returns `false` when input ended.
async fn fill_fields(wizard: &WizardOrchestrator, prompt: &Prompt) -> anyhow::Result<bool> {
    for group in wizard.render_current_step().await {
        prompt.say(format!("-- {} --", group.title)).await?;
        for field in &group.fields {
            if !fill_field(wizard, prompt, field).await? {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

async fn fill_field(
    wizard: &WizardOrchestrator,
    prompt: &Prompt,
    field: &FieldView,
) -> anyhow::Result<bool> {
    loop {
        let question = if field.value.is_empty() {
            format!("{}: ", field.label)
        } else {
            format!("{} [{}]: ", field.label, field.value)
        };
        let Some(answer) = prompt.ask(&question).await? else {
            return Ok(false);
        };
        let answer = answer.trim();
        if answer.is_empty() || answer == field.value {
            return Ok(true);
        }

        let response = wizard.update_field(field.field, answer).await;
        let rejected = field.field == DraftField::Birthdate
            && response
                .session()
                .and_then(|session| session.state.error())
                == Some(&WizardError::InvalidBirthdate);
        if !rejected {
            return Ok(true);
        }
        prompt.say(format!("! {}", WizardError::InvalidBirthdate)).await?;
    }
}

async fn choose(prompt: &Prompt, step: WizardStep) -> anyhow::Result<StepChoice> {
    let action = if step == WizardStep::Three {
        "complete registration"
    } else {
        "next step"
    };
    let question = format!("[Enter] {action}, [r] start over, [q] quit: ");
    loop {
        let Some(answer) = prompt.ask(&question).await? else {
            return Ok(StepChoice::Quit);
        };
        match answer.trim().to_ascii_lowercase().as_str() {
            "" => return Ok(StepChoice::Continue),
            "r" => return Ok(StepChoice::StartOver),
            "q" => return Ok(StepChoice::Quit),
            _ => continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex as StdMutex};

    use async_trait::async_trait;

    use ob_app::usecases::WizardPorts;
    use ob_core::ports::{
        EmailAvailabilityPort, EmailCheckError, RegistrationError, RegistrationPort,
        StepConfigPort,
    };
    use ob_core::{ComponentPageMap, RegisteredUser, RegistrationPayload, StepConfig};
    use ob_infra::InMemoryProgressStore;

    use super::*;
    use crate::terminal::prompt::testing::scripted;
    use crate::terminal::TerminalConfirmation;

    #[derive(Default)]
    struct Backend {
        taken: Vec<String>,
        submitted: StdMutex<Vec<RegistrationPayload>>,
        email_checks: AtomicUsize,
    }

    #[async_trait]
    impl EmailAvailabilityPort for Backend {
        async fn is_registered(&self, email: &str) -> Result<bool, EmailCheckError> {
            self.email_checks.fetch_add(1, Ordering::SeqCst);
            Ok(self.taken.iter().any(|taken| taken == email))
        }
    }

    #[async_trait]
    impl RegistrationPort for Backend {
        async fn register(
            &self,
            payload: &RegistrationPayload,
        ) -> Result<RegisteredUser, RegistrationError> {
            self.submitted.lock().unwrap().push(payload.clone());
            Ok(RegisteredUser::with_id(UserId(42)))
        }
    }

    #[async_trait]
    impl StepConfigPort for Backend {
        async fn fetch(&self) -> anyhow::Result<StepConfig> {
            Ok(StepConfig::default_layout())
        }

        async fn persist(&self, _map: &ComponentPageMap) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn wizard(backend: Arc<Backend>, prompt: Arc<Prompt>) -> WizardOrchestrator {
        WizardOrchestrator::new(WizardPorts {
            email: backend.clone(),
            registration: backend.clone(),
            step_config: backend,
            progress: Arc::new(InMemoryProgressStore::new()),
            confirmation: Arc::new(TerminalConfirmation::new(prompt)),
        })
    }

    #[tokio::test]
    async fn completes_registration_from_terminal_answers() {
        let input = [
            "new@x.com",  // email
            "secret1",    // password
            "Hiker",      // about me
            "1 Main St",  // street
            "Austin",     // city
            "",           // state
            "",           // zip
            "",           // next step
            "05/01/1990", // birthdate, rejected
            "1990-01-05", // birthdate
            "",           // complete
        ]
        .join("\n")
            + "\n";
        let (prompt, transcript) = scripted(&input);
        let backend = Arc::new(Backend::default());
        let wizard = wizard(backend.clone(), prompt.clone());

        let id = run_wizard(&wizard, &prompt).await.unwrap();

        assert_eq!(id, Some(UserId(42)));
        let output = transcript.text();
        assert!(output.contains("Registration Complete! User ID: 42"));
        assert!(output.contains("YYYY-MM-DD"));
        let submitted = backend.submitted.lock().unwrap()[0].clone();
        assert_eq!(submitted.about_me.as_deref(), Some("Hiker"));
        assert_eq!(submitted.state, None);
        assert_eq!(submitted.birthdate.as_deref(), Some("1990-01-05"));
    }

    #[tokio::test]
    async fn taken_email_is_reported_and_asked_again() {
        let (prompt, transcript) = scripted("taken@x.com\nsecret1\n");
        let backend = Arc::new(Backend {
            taken: vec!["taken@x.com".into()],
            ..Backend::default()
        });
        let wizard = wizard(backend.clone(), prompt.clone());

        let id = run_wizard(&wizard, &prompt).await.unwrap();

        assert_eq!(id, None);
        let output = transcript.text();
        assert!(output.contains("already registered"));
        let retry = output.split("already registered").nth(1).unwrap();
        assert!(retry.contains("Email [taken@x.com]: "));
        assert!(retry.contains("Password [unchanged]: "));
        assert_eq!(backend.email_checks.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_answers_resubmit_previous_credentials() {
        let (prompt, transcript) = scripted("taken@x.com\nsecret1\n\n\n");
        let backend = Arc::new(Backend {
            taken: vec!["taken@x.com".into()],
            ..Backend::default()
        });
        let wizard = wizard(backend.clone(), prompt.clone());

        let id = run_wizard(&wizard, &prompt).await.unwrap();

        assert_eq!(id, None);
        assert_eq!(backend.email_checks.load(Ordering::SeqCst), 2);
        assert_eq!(transcript.text().matches("already registered").count(), 2);
        assert_eq!(wizard.session().await.step(), WizardStep::One);
    }

    #[tokio::test]
    async fn new_email_replaces_the_previous_one() {
        let input = "taken@x.com\nsecret1\nnew@x.com\n\n";
        let (prompt, _) = scripted(input);
        let backend = Arc::new(Backend {
            taken: vec!["taken@x.com".into()],
            ..Backend::default()
        });
        let wizard = wizard(backend.clone(), prompt.clone());

        run_wizard(&wizard, &prompt).await.unwrap();

        let session = wizard.session().await;
        assert_eq!(session.step(), WizardStep::Two);
        assert_eq!(session.draft.email, "new@x.com");
        assert_eq!(session.draft.password.expose(), "secret1");
    }

    #[tokio::test]
    async fn declined_start_over_keeps_the_draft() {
        let input = "new@x.com\nsecret1\nHiker\n\n\n\n\nr\nn\n";
        let (prompt, transcript) = scripted(input);
        let backend = Arc::new(Backend::default());
        let wizard = wizard(backend, prompt.clone());

        let id = run_wizard(&wizard, &prompt).await.unwrap();

        assert_eq!(id, None);
        assert!(transcript.text().contains("Keeping your progress."));
        let session = wizard.session().await;
        assert_eq!(session.step(), WizardStep::Two);
        assert_eq!(session.draft.about_me.as_deref(), Some("Hiker"));
    }
}
