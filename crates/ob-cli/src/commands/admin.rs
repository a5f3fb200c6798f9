//! Admin step-layout commands.

use std::fmt::Write as _;

use anyhow::Context;
use tracing::info;

use ob_app::usecases::{AdminConfigEditor, AdminEditorError, SaveOutcome};
use ob_core::{ConfigurableStep, FieldGroupId, StepConfig};

use crate::terminal::Prompt;

pub fn render_config(config: &StepConfig) -> String {
    let mut out = String::new();
    for step in ConfigurableStep::ALL {
        let _ = writeln!(out, "Step {step}:");
        let groups = config.groups(step);
        if groups.is_empty() {
            let _ = writeln!(out, "  (empty)");
        }
        for group in groups {
            let _ = writeln!(
                out,
                "  {:<10} {}: {}",
                group.as_str(),
                group.display_name(),
                group.description()
            );
        }
    }

    let unassigned = config.unassigned();
    if !unassigned.is_empty() {
        let names: Vec<&str> = unassigned.iter().map(|group| group.as_str()).collect();
        let _ = writeln!(out, "Unassigned: {}", names.join(", "));
    }
    out
}

pub async fn show(editor: &AdminConfigEditor, prompt: &Prompt) -> anyhow::Result<()> {
    let config = editor.load().await;
    prompt.say(render_config(&config).trim_end()).await?;
    Ok(())
}

/// Drag `group` onto `target` and save.
///
/// Dropping onto the step the group is already on saves nothing.
pub async fn move_group(
    editor: &AdminConfigEditor,
    prompt: &Prompt,
    group: FieldGroupId,
    target: ConfigurableStep,
) -> anyhow::Result<()> {
    editor.load().await;

    match editor.begin_drag(group).await {
        Some(payload) if !AdminConfigEditor::can_drop(&payload, target) => {
            prompt
                .say(format!("{group} is already on step {target}; nothing to save."))
                .await?;
            return Ok(());
        }
        Some(payload) => {
            editor.drop_on(payload, target).await;
        }
        None => {
            editor.move_group(group, target).await;
        }
    }

    prompt.say(render_config(&editor.config().await).trim_end()).await?;

    match editor.save().await {
        Ok(SaveOutcome::Saved) => {
            info!(%group, %target, "step layout saved");
            prompt.say("Configuration saved successfully!").await?;
            Ok(())
        }
        Ok(SaveOutcome::AlreadySaving) => {
            prompt.say("A save is already in progress.").await?;
            Ok(())
        }
        Err(err @ AdminEditorError::EmptyStep(_)) => Err(err).context("configuration not saved"),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex as StdMutex};

    use async_trait::async_trait;

    use ob_core::ports::StepConfigPort;
    use ob_core::ComponentPageMap;

    use super::*;
    use crate::terminal::prompt::testing::scripted;

    #[derive(Default)]
    struct RecordingStore {
        persisted: StdMutex<Vec<ComponentPageMap>>,
    }

    #[async_trait]
    impl StepConfigPort for RecordingStore {
        async fn fetch(&self) -> anyhow::Result<StepConfig> {
            Ok(StepConfig::default_layout())
        }

        async fn persist(&self, map: &ComponentPageMap) -> anyhow::Result<()> {
            self.persisted.lock().unwrap().push(map.clone());
            Ok(())
        }
    }

    #[test]
    fn render_lists_groups_per_step() {
        let text = render_config(&StepConfig::default_layout());

        assert!(text.starts_with("Step 2:\n  ABOUT_ME"));
        assert!(text.contains("Street, city, state, ZIP fields"));
        assert!(text.contains("Step 3:\n  BIRTHDATE"));
        assert!(!text.contains("Unassigned"));
    }

    #[test]
    fn render_marks_empty_steps_and_unassigned_groups() {
        let config =
            StepConfig::default().with_groups(ConfigurableStep::Two, vec![FieldGroupId::Address]);

        let text = render_config(&config);

        assert!(text.contains("Step 3:\n  (empty)"));
        assert!(text.contains("Unassigned: ABOUT_ME, BIRTHDATE"));
    }

    #[tokio::test]
    async fn move_saves_new_layout() {
        let store = Arc::new(RecordingStore::default());
        let editor = AdminConfigEditor::new(store.clone());
        let (prompt, transcript) = scripted("");

        move_group(&editor, &prompt, FieldGroupId::Address, ConfigurableStep::Three)
            .await
            .unwrap();

        assert!(transcript.text().contains("Configuration saved successfully!"));
        let persisted = store.persisted.lock().unwrap();
        assert_eq!(
            persisted[0].component_page_map.get(&FieldGroupId::Address),
            Some(&ConfigurableStep::Three)
        );
    }

    #[tokio::test]
    async fn move_to_same_step_saves_nothing() {
        let store = Arc::new(RecordingStore::default());
        let editor = AdminConfigEditor::new(store.clone());
        let (prompt, transcript) = scripted("");

        move_group(&editor, &prompt, FieldGroupId::Birthdate, ConfigurableStep::Three)
            .await
            .unwrap();

        assert!(transcript.text().contains("nothing to save"));
        assert!(store.persisted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn move_that_empties_a_step_is_refused() {
        let store = Arc::new(RecordingStore::default());
        let editor = AdminConfigEditor::new(store.clone());
        let (prompt, _) = scripted("");

        let err = move_group(&editor, &prompt, FieldGroupId::Birthdate, ConfigurableStep::Two)
            .await
            .unwrap_err();

        assert!(format!("{err:#}").contains("Step 3 is empty"));
        assert!(store.persisted.lock().unwrap().is_empty());
    }
}
