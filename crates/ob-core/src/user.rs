//! Registered user records shown by the data viewer.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::registration::UserId;
use crate::validation::ISO_DATE_FORMAT;

/// Placeholder for missing values.
pub const MISSING: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default)]
    pub id: Option<UserId>,
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
    #[serde(default)]
    pub created_at: Option<String>,
}

impl UserRecord {
    pub fn display_id(&self) -> String {
        self.id.map_or_else(|| "N/A".to_string(), |id| id.to_string())
    }

    pub fn display_email(&self) -> &str {
        present(&self.email).unwrap_or("N/A")
    }

    /// `Jan 5, 1990`; raw value when it does not parse.
    pub fn display_birthdate(&self) -> String {
        let Some(raw) = present(&self.birthdate) else {
            return MISSING.to_string();
        };
        match NaiveDate::parse_from_str(raw, ISO_DATE_FORMAT) {
            Ok(date) => date.format("%b %-d, %Y").to_string(),
            Err(_) => raw.to_string(),
        }
    }

    /// `Jan 5, 2024, 10:30 AM`; raw value when it does not parse.
    pub fn display_created_at(&self) -> String {
        let Some(raw) = present(&self.created_at) else {
            return MISSING.to_string();
        };
        let parsed = DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.naive_local())
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"));
        match parsed {
            Ok(dt) => dt.format("%b %-d, %Y, %I:%M %p").to_string(),
            Err(_) => raw.to_string(),
        }
    }
}

/// Value of an optional text column, `None` when absent or blank.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
