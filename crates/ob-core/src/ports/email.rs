use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
#[error("email availability check failed: {0}")]
pub struct EmailCheckError(pub String);

/// Asks the backend whether an email is already registered.
#[async_trait]
pub trait EmailAvailabilityPort: Send + Sync {
    /// `Ok(true)` when a user with this email exists, `Ok(false)` when the
    /// backend reports it unknown. Anything else is an error.
    async fn is_registered(&self, email: &str) -> Result<bool, EmailCheckError>;
}
