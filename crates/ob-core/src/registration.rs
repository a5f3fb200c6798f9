//! Final submission payload and the backend's reply.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::draft::{Password, UserDraft};

/// Identifier assigned by the backend on registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Complete registration request.
///
/// Every key is always present; unset or empty optional fields serialize as
/// `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPayload {
    pub email: String,
    pub password: Password,
    pub about_me: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub birthdate: Option<String>,
}

impl From<&UserDraft> for RegistrationPayload {
    fn from(draft: &UserDraft) -> Self {
        Self {
            email: draft.email.clone(),
            password: draft.password.clone(),
            about_me: non_empty(&draft.about_me),
            street_address: non_empty(&draft.street_address),
            city: non_empty(&draft.city),
            state: non_empty(&draft.state),
            zip: non_empty(&draft.zip),
            birthdate: non_empty(&draft.birthdate),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

/// Registration response: the assigned id plus echoed fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub about_me: Option<String>,
    #[serde(default)]
    pub street_address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub birthdate: Option<String>,
}

impl RegisteredUser {
    pub fn with_id(id: UserId) -> Self {
        Self {
            id,
            email: None,
            about_me: None,
            street_address: None,
            city: None,
            state: None,
            zip: None,
            birthdate: None,
        }
    }
}
