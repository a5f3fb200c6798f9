//! Wizard step ordinals.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Invalid step value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid wizard step: {0:?}")]
pub struct StepParseError(pub String);

/// One page of the onboarding wizard.
///
/// Steps are totally ordered and only ever advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    /// Credentials and email-uniqueness gate.
    One,
    /// First configurable field-group page.
    Two,
    /// Second configurable field-group page, followed by submission.
    Three,
}

impl WizardStep {
    pub const fn number(self) -> u8 {
        match self {
            WizardStep::One => 1,
            WizardStep::Two => 2,
            WizardStep::Three => 3,
        }
    }

    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(WizardStep::One),
            2 => Some(WizardStep::Two),
            3 => Some(WizardStep::Three),
            _ => None,
        }
    }

    /// The admin-configurable slot for this step, if any.
    pub const fn configurable(self) -> Option<ConfigurableStep> {
        match self {
            WizardStep::One => None,
            WizardStep::Two => Some(ConfigurableStep::Two),
            WizardStep::Three => Some(ConfigurableStep::Three),
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl FromStr for WizardStep {
    type Err = StepParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(Self::from_number)
            .ok_or_else(|| StepParseError(s.to_string()))
    }
}

/// Steps whose field-group content is decided by the admin configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigurableStep {
    Two,
    Three,
}

impl ConfigurableStep {
    pub const ALL: [ConfigurableStep; 2] = [ConfigurableStep::Two, ConfigurableStep::Three];

    pub const fn number(self) -> u8 {
        self.step().number()
    }

    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            2 => Some(ConfigurableStep::Two),
            3 => Some(ConfigurableStep::Three),
            _ => None,
        }
    }

    pub const fn step(self) -> WizardStep {
        match self {
            ConfigurableStep::Two => WizardStep::Two,
            ConfigurableStep::Three => WizardStep::Three,
        }
    }
}

impl fmt::Display for ConfigurableStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl FromStr for ConfigurableStep {
    type Err = StepParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(Self::from_number)
            .ok_or_else(|| StepParseError(s.to_string()))
    }
}

impl From<ConfigurableStep> for WizardStep {
    fn from(step: ConfigurableStep) -> Self {
        step.step()
    }
}

// Wire format is the bare step number (`{"ABOUT_ME": 2}`).
impl Serialize for ConfigurableStep {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number())
    }
}

impl<'de> Deserialize<'de> for ConfigurableStep {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let number = u8::deserialize(deserializer)?;
        Self::from_number(number)
            .ok_or_else(|| de::Error::custom(format!("step {number} is not configurable")))
    }
}
