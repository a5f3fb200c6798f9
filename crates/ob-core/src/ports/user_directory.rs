use async_trait::async_trait;

use crate::user::UserRecord;

#[derive(Debug, thiserror::Error)]
pub enum UserDirectoryError {
    #[error("failed to reach user directory: {0}")]
    Transport(String),
    #[error("user directory answered with status {0}")]
    UnexpectedStatus(u16),
    #[error("user directory returned a malformed response: {0}")]
    MalformedResponse(String),
}

/// Lists every registered user, read-only.
#[async_trait]
pub trait UserDirectoryPort: Send + Sync {
    async fn list_users(&self) -> Result<Vec<UserRecord>, UserDirectoryError>;
}
