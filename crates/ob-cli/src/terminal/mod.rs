pub mod prompt;
pub mod table;

pub use prompt::{Prompt, TerminalConfirmation};
pub use table::{render_snapshot, render_users};
