//! FieldGroup renderer.
//!
//! Maps a [`FieldGroupId`] plus the current draft to a presentational unit.
//! Each rendered field carries the [`DraftField`] it is bound to; front-ends
//! report edits back through the wizard's `update_field` with that binding.

use serde::Serialize;

use crate::draft::{DraftField, UserDraft};
use crate::field_group::FieldGroupId;

/// Input widget constraint for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    TextArea,
    Text,
    /// Calendar date, ISO `YYYY-MM-DD`.
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    pub field: DraftField,
    pub label: &'static str,
    pub input: InputKind,
    /// Current draft value, empty when unset.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldGroupView {
    pub id: FieldGroupId,
    pub title: &'static str,
    pub fields: Vec<FieldView>,
}

pub fn render(id: FieldGroupId, draft: &UserDraft) -> FieldGroupView {
    let fields = match id {
        FieldGroupId::AboutMe => vec![field_view(
            draft,
            DraftField::AboutMe,
            "Tell us about yourself",
            InputKind::TextArea,
        )],
        FieldGroupId::Address => vec![
            field_view(
                draft,
                DraftField::StreetAddress,
                "Street Address",
                InputKind::Text,
            ),
            field_view(draft, DraftField::City, "City", InputKind::Text),
            field_view(draft, DraftField::State, "State", InputKind::Text),
            field_view(draft, DraftField::Zip, "ZIP", InputKind::Text),
        ],
        FieldGroupId::Birthdate => vec![field_view(
            draft,
            DraftField::Birthdate,
            "Birthdate",
            InputKind::Date,
        )],
    };

    FieldGroupView {
        id,
        title: id.display_name(),
        fields,
    }
}

/// Renders `ids` in list order.
pub fn render_all(ids: &[FieldGroupId], draft: &UserDraft) -> Vec<FieldGroupView> {
    ids.iter().map(|id| render(*id, draft)).collect()
}

fn field_view(
    draft: &UserDraft,
    field: DraftField,
    label: &'static str,
    input: InputKind,
) -> FieldView {
    FieldView {
        field,
        label,
        input,
        value: draft.field(field).unwrap_or_default().to_string(),
    }
}
