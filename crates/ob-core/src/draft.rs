//! The in-progress registration record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::step::WizardStep;

/// Plaintext password carried by the draft.
///
/// Kept in memory and in the persisted progress copy as entered; only the
/// `Debug` output is redacted so it never reaches the logs.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Length in characters, as the input widget counts it.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for Password {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl From<&str> for Password {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Optional draft fields a field-group may write.
///
/// `email` and `password` are deliberately absent: they are only set by the
/// credentials step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DraftField {
    AboutMe,
    StreetAddress,
    City,
    State,
    Zip,
    Birthdate,
}

impl DraftField {
    pub const ALL: [DraftField; 6] = [
        DraftField::AboutMe,
        DraftField::StreetAddress,
        DraftField::City,
        DraftField::State,
        DraftField::Zip,
        DraftField::Birthdate,
    ];

    /// Wire/field name (`aboutMe`, `streetAddress`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            DraftField::AboutMe => "aboutMe",
            DraftField::StreetAddress => "streetAddress",
            DraftField::City => "city",
            DraftField::State => "state",
            DraftField::Zip => "zip",
            DraftField::Birthdate => "birthdate",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown draft field: {0}")]
pub struct UnknownDraftField(pub String);

impl FromStr for DraftField {
    type Err = UnknownDraftField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DraftField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| UnknownDraftField(s.to_string()))
    }
}

/// The accumulating, not-yet-submitted user record.
///
/// Until `email` is non-empty no other field is meaningful; `email` is also
/// the sentinel deciding whether persisted progress is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: Password,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about_me: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<String>,
}

impl UserDraft {
    /// A fresh draft holding only verified credentials.
    pub fn with_credentials(email: impl Into<String>, password: Password) -> Self {
        Self {
            email: email.into(),
            password,
            ..Self::default()
        }
    }

    pub fn has_email(&self) -> bool {
        !self.email.is_empty()
    }

    /// Whether this draft may be written to the progress store at `step`.
    pub fn is_persistable_at(&self, step: WizardStep) -> bool {
        self.has_email() && step > WizardStep::One
    }

    pub fn field(&self, field: DraftField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Last write wins per field.
    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    fn slot(&self, field: DraftField) -> &Option<String> {
        match field {
            DraftField::AboutMe => &self.about_me,
            DraftField::StreetAddress => &self.street_address,
            DraftField::City => &self.city,
            DraftField::State => &self.state,
            DraftField::Zip => &self.zip,
            DraftField::Birthdate => &self.birthdate,
        }
    }

    fn slot_mut(&mut self, field: DraftField) -> &mut Option<String> {
        match field {
            DraftField::AboutMe => &mut self.about_me,
            DraftField::StreetAddress => &mut self.street_address,
            DraftField::City => &mut self.city,
            DraftField::State => &mut self.state,
            DraftField::Zip => &mut self.zip,
            DraftField::Birthdate => &mut self.birthdate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_debug_is_redacted() {
        let password = Password::new("secret1");
        assert_eq!(format!("{password:?}"), "[REDACTED]");
        assert_eq!(password.expose(), "secret1");
    }

    #[test]
    fn set_field_is_last_write_wins() {
        let mut draft = UserDraft::with_credentials("a@b.com", Password::new("secret1"));
        draft.set_field(DraftField::City, "Austin");
        draft.set_field(DraftField::Zip, "73301");
        draft.set_field(DraftField::City, "Dallas");

        assert_eq!(draft.field(DraftField::City), Some("Dallas"));
        assert_eq!(draft.field(DraftField::Zip), Some("73301"));
        assert_eq!(draft.field(DraftField::AboutMe), None);
    }

    #[test]
    fn persistable_requires_email_and_step_past_one() {
        let empty = UserDraft::default();
        assert!(!empty.is_persistable_at(WizardStep::Two));

        let draft = UserDraft::with_credentials("a@b.com", Password::new("secret1"));
        assert!(!draft.is_persistable_at(WizardStep::One));
        assert!(draft.is_persistable_at(WizardStep::Two));
        assert!(draft.is_persistable_at(WizardStep::Three));
    }

    #[test]
    fn draft_serializes_with_camel_case_keys() {
        let mut draft = UserDraft::with_credentials("a@b.com", Password::new("secret1"));
        draft.set_field(DraftField::StreetAddress, "1 Main St");

        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["password"], "secret1");
        assert_eq!(json["streetAddress"], "1 Main St");
        assert!(json.get("aboutMe").is_none());
    }

    #[test]
    fn draft_without_email_key_deserializes_as_empty_email() {
        let draft: UserDraft = serde_json::from_str(r#"{"aboutMe":"hi"}"#).unwrap();
        assert!(!draft.has_email());
        assert_eq!(draft.about_me.as_deref(), Some("hi"));
    }

    #[test]
    fn draft_field_parses_wire_names() {
        assert_eq!("aboutMe".parse::<DraftField>(), Ok(DraftField::AboutMe));
        assert_eq!("zip".parse::<DraftField>(), Ok(DraftField::Zip));
        assert!("email".parse::<DraftField>().is_err());
    }
}
