use async_trait::async_trait;

/// Asks the person at the keyboard a yes/no question.
#[async_trait]
pub trait ConfirmationPort: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}
