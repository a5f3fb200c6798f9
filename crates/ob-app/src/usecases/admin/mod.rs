mod editor;

pub use editor::{AdminConfigEditor, AdminEditorError, DragPayload, SaveOutcome};
