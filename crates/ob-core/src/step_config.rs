//! Step → field-group layout.
//!
//! The remote copy is the source of truth between sessions. The wizard and the
//! admin editor each hold their own copy; there is no live sync between them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::field_group::FieldGroupId;
use crate::step::ConfigurableStep;

/// Mapping from configurable step to an ordered list of field-groups.
///
/// The read path tolerates anything the backend sends: empty or missing
/// steps, duplicates, groups missing from both steps. Only the admin editor
/// enforces the non-empty invariant, before persisting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Vec<String>>",
    into = "BTreeMap<String, Vec<String>>"
)]
pub struct StepConfig {
    pages: BTreeMap<ConfigurableStep, Vec<FieldGroupId>>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepConfigError {
    #[error("step {0} must have at least one component")]
    EmptyStep(ConfigurableStep),
}

impl StepConfig {
    /// Layout used whenever the remote configuration is unavailable.
    pub fn default_layout() -> Self {
        Self::default()
            .with_groups(
                ConfigurableStep::Two,
                vec![FieldGroupId::AboutMe, FieldGroupId::Address],
            )
            .with_groups(ConfigurableStep::Three, vec![FieldGroupId::Birthdate])
    }

    pub fn with_groups(mut self, step: ConfigurableStep, groups: Vec<FieldGroupId>) -> Self {
        self.pages.insert(step, groups);
        self
    }

    /// Groups listed for `step`; empty when the step is absent.
    pub fn groups(&self, step: ConfigurableStep) -> &[FieldGroupId] {
        self.pages.get(&step).map(Vec::as_slice).unwrap_or_default()
    }

    /// Groups for `step`, falling back to the default layout for that step
    /// alone when it is empty or absent.
    pub fn groups_or_default(&self, step: ConfigurableStep) -> Vec<FieldGroupId> {
        let groups = self.groups(step);
        if groups.is_empty() {
            Self::default_layout().groups(step).to_vec()
        } else {
            groups.to_vec()
        }
    }

    /// First step listing `id`.
    pub fn step_of(&self, id: FieldGroupId) -> Option<ConfigurableStep> {
        self.pages
            .iter()
            .find(|(_, groups)| groups.contains(&id))
            .map(|(step, _)| *step)
    }

    /// Removes `id` from every step, then appends it to `target`.
    ///
    /// After any sequence of moves each group sits in at most one step.
    pub fn move_group(&mut self, id: FieldGroupId, target: ConfigurableStep) {
        for groups in self.pages.values_mut() {
            groups.retain(|group| *group != id);
        }
        self.pages.entry(target).or_default().push(id);
    }

    pub fn empty_steps(&self) -> Vec<ConfigurableStep> {
        ConfigurableStep::ALL
            .into_iter()
            .filter(|step| self.groups(*step).is_empty())
            .collect()
    }

    /// Every configurable step must list at least one group.
    pub fn validate_non_empty(&self) -> Result<(), StepConfigError> {
        match self.empty_steps().first() {
            Some(step) => Err(StepConfigError::EmptyStep(*step)),
            None => Ok(()),
        }
    }

    /// Groups listed in no step.
    pub fn unassigned(&self) -> Vec<FieldGroupId> {
        FieldGroupId::ALL
            .into_iter()
            .filter(|id| self.step_of(*id).is_none())
            .collect()
    }

    /// Reverse mapping sent to the backend on save.
    pub fn to_page_map(&self) -> ComponentPageMap {
        let mut component_page_map = BTreeMap::new();
        for (step, groups) in &self.pages {
            for group in groups {
                component_page_map.insert(*group, *step);
            }
        }
        ComponentPageMap { component_page_map }
    }
}

impl From<BTreeMap<String, Vec<String>>> for StepConfig {
    fn from(raw: BTreeMap<String, Vec<String>>) -> Self {
        let mut pages = BTreeMap::new();
        for (key, names) in raw {
            let Ok(step) = key.parse::<ConfigurableStep>() else {
                debug!(key = %key, "ignoring non-configurable step in config");
                continue;
            };
            let groups = names
                .iter()
                .filter_map(|name| match name.parse::<FieldGroupId>() {
                    Ok(id) => Some(id),
                    Err(err) => {
                        debug!(error = %err, "ignoring unrecognized field-group");
                        None
                    }
                })
                .collect();
            pages.insert(step, groups);
        }
        Self { pages }
    }
}

impl From<StepConfig> for BTreeMap<String, Vec<String>> {
    fn from(config: StepConfig) -> Self {
        config
            .pages
            .into_iter()
            .map(|(step, groups)| {
                (
                    step.to_string(),
                    groups.iter().map(|g| g.as_str().to_string()).collect(),
                )
            })
            .collect()
    }
}

/// Field-group → step mapping, the persist payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPageMap {
    pub component_page_map: BTreeMap<FieldGroupId, ConfigurableStep>,
}
