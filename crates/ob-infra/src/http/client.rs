//! HTTP client for the onboarding backend.
//!
//! One `reqwest::Client` implements every boundary port. Paths are joined
//! onto the configured base URL, e.g. `{base}/users/email/{email}`.

use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};

use ob_core::config::ApiConfig;
use ob_core::ports::{
    EmailAvailabilityPort, EmailCheckError, RegistrationError, RegistrationPort, StepConfigPort,
    UserDirectoryError, UserDirectoryPort,
};
use ob_core::{ComponentPageMap, RegisteredUser, RegistrationPayload, StepConfig, UserRecord};

#[derive(Clone)]
pub struct HttpOnboardingApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpOnboardingApi {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("invalid API base URL: {base_url}"))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("API base URL cannot carry paths: {base_url}"));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(api: &ApiConfig) -> anyhow::Result<Self> {
        Self::new(&api.base_url, api.timeout())
    }

    /// Base URL with `segments` appended, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json(&self, url: Url) -> Result<Value, UserDirectoryError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| UserDirectoryError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(UserDirectoryError::UnexpectedStatus(status.as_u16()));
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| UserDirectoryError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl EmailAvailabilityPort for HttpOnboardingApi {
    async fn is_registered(&self, email: &str) -> Result<bool, EmailCheckError> {
        let url = self.endpoint(&["users", "email", email]);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| EmailCheckError(e.to_string()))?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(EmailCheckError(format!("unexpected status {status}"))),
        }
    }
}

#[async_trait]
impl RegistrationPort for HttpOnboardingApi {
    async fn register(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<RegisteredUser, RegistrationError> {
        let url = self.endpoint(&["users", "register-complete"]);
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| RegistrationError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let user = response
                .json::<RegisteredUser>()
                .await
                .map_err(|e| RegistrationError::Transport(format!("unreadable response: {e}")))?;
            debug!(user_id = %user.id, "registration accepted");
            return Ok(user);
        }

        let body = response.text().await.unwrap_or_default();
        match failure_message(&body) {
            Some(message) => Err(RegistrationError::Rejected(message)),
            None => Err(RegistrationError::Transport(format!(
                "unexpected status {status}"
            ))),
        }
    }
}

/// Message carried by an error body: `{"message": ...}` or the raw text.
fn failure_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) {
        if let Some(Value::String(message)) = fields.get("message") {
            return Some(message.clone());
        }
    }
    Some(body.to_string())
}

#[async_trait]
impl StepConfigPort for HttpOnboardingApi {
    async fn fetch(&self) -> anyhow::Result<StepConfig> {
        let url = self.endpoint(&["admin", "config"]);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("failed to request admin config")?
            .error_for_status()
            .context("admin config request rejected")?;
        response
            .json::<StepConfig>()
            .await
            .context("failed to parse admin config")
    }

    async fn persist(&self, map: &ComponentPageMap) -> anyhow::Result<()> {
        let url = self.endpoint(&["admin", "config"]);
        self.client
            .put(url)
            .json(map)
            .send()
            .await
            .context("failed to send admin config")?
            .error_for_status()
            .context("admin config update rejected")?;
        Ok(())
    }
}

#[async_trait]
impl UserDirectoryPort for HttpOnboardingApi {
    async fn list_users(&self) -> Result<Vec<UserRecord>, UserDirectoryError> {
        let body = match self.get_json(self.endpoint(&["users"])).await {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %err, "user list failed, trying legacy endpoint");
                self.get_json(self.endpoint(&["data", "users"])).await?
            }
        };

        if !body.is_array() {
            return Err(UserDirectoryError::MalformedResponse(
                "expected a JSON array of users".to_string(),
            ));
        }
        serde_json::from_value(body).map_err(|e| UserDirectoryError::MalformedResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpOnboardingApi {
        HttpOnboardingApi::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn endpoint_joins_onto_base_path() {
        assert_eq!(
            api("http://localhost:8080/api").endpoint(&["admin", "config"]).as_str(),
            "http://localhost:8080/api/admin/config"
        );
        assert_eq!(
            api("http://localhost:8080/api/").endpoint(&["users"]).as_str(),
            "http://localhost:8080/api/users"
        );
    }

    #[test]
    fn endpoint_encodes_path_separators_in_segments() {
        let url = api("http://localhost:8080/api").endpoint(&["users", "email", "a/b@x.com"]);
        assert_eq!(url.path(), "/api/users/email/a%2Fb@x.com");
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(HttpOnboardingApi::new("not a url", Duration::from_secs(1)).is_err());
        assert!(HttpOnboardingApi::new("mailto:ops@x.com", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn failure_message_prefers_json_message() {
        assert_eq!(
            failure_message(r#"{"message": "Email already exists"}"#).as_deref(),
            Some("Email already exists")
        );
        assert_eq!(failure_message("  Bad zip  ").as_deref(), Some("Bad zip"));
        assert_eq!(failure_message(""), None);
    }
}
