use serde::{Deserialize, Serialize};

const GENERIC_REGISTRATION_FAILURE: &str = "Registration failed. Please try again.";

/// User-visible wizard errors.
///
/// Validation and conflict errors are recovered in place; boundary errors
/// keep the draft intact so the user can retry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum WizardError {
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Password must be at least {min_len} characters.")]
    PasswordTooShort { min_len: usize },
    #[error("This email is already registered. Please use a different email.")]
    EmailAlreadyRegistered,
    #[error("Could not validate email. Please try again.")]
    EmailCheckUnavailable,
    #[error("Birthdate must be a date in YYYY-MM-DD format.")]
    InvalidBirthdate,
    /// Carries the backend's message verbatim when it sent one.
    #[error("{}", .message.as_deref().unwrap_or(GENERIC_REGISTRATION_FAILURE))]
    RegistrationFailed { message: Option<String> },
}
