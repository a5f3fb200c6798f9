//! Field-group identifiers.
//!
//! A field-group is a named cluster of draft fields treated as one unit when
//! assigning content to the configurable steps.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::draft::DraftField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldGroupId {
    AboutMe,
    Address,
    Birthdate,
}

impl FieldGroupId {
    pub const ALL: [FieldGroupId; 3] = [
        FieldGroupId::AboutMe,
        FieldGroupId::Address,
        FieldGroupId::Birthdate,
    ];

    /// Identifier as exchanged with the backend.
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldGroupId::AboutMe => "ABOUT_ME",
            FieldGroupId::Address => "ADDRESS",
            FieldGroupId::Birthdate => "BIRTHDATE",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            FieldGroupId::AboutMe => "About Me",
            FieldGroupId::Address => "Address",
            FieldGroupId::Birthdate => "Birthdate",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            FieldGroupId::AboutMe => "Large text area for user bio",
            FieldGroupId::Address => "Street, city, state, ZIP fields",
            FieldGroupId::Birthdate => "Date picker for birth date",
        }
    }

    /// Draft fields owned by this group, in display order.
    pub const fn fields(self) -> &'static [DraftField] {
        match self {
            FieldGroupId::AboutMe => &[DraftField::AboutMe],
            FieldGroupId::Address => &[
                DraftField::StreetAddress,
                DraftField::City,
                DraftField::State,
                DraftField::Zip,
            ],
            FieldGroupId::Birthdate => &[DraftField::Birthdate],
        }
    }
}

impl fmt::Display for FieldGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field-group: {0}")]
pub struct UnknownFieldGroup(pub String);

impl FromStr for FieldGroupId {
    type Err = UnknownFieldGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldGroupId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownFieldGroup(s.to_string()))
    }
}
