use async_trait::async_trait;

use crate::registration::{RegisteredUser, RegistrationPayload};

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    /// The backend answered with an error body carrying a message.
    #[error("registration rejected: {0}")]
    Rejected(String),
    /// No usable answer: connection failure, timeout, unreadable body.
    #[error("registration request failed: {0}")]
    Transport(String),
}

impl RegistrationError {
    /// Message suitable for showing to the user, when the backend gave one.
    pub fn message(&self) -> Option<&str> {
        match self {
            RegistrationError::Rejected(message) => Some(message),
            RegistrationError::Transport(_) => None,
        }
    }
}

#[async_trait]
pub trait RegistrationPort: Send + Sync {
    /// Submits the complete record, returning the created user.
    async fn register(&self, payload: &RegistrationPayload)
        -> Result<RegisteredUser, RegistrationError>;
}
