//! Plain-text user table.

use std::fmt::Write as _;

use ob_app::ViewerSnapshot;
use ob_core::user::{present, MISSING};
use ob_core::UserRecord;

const HEADERS: [&str; 9] = [
    "ID",
    "Email",
    "About Me",
    "Street Address",
    "City",
    "State",
    "ZIP",
    "Birthdate",
    "Created",
];

/// Cells longer than this are cut and end in `...`.
const MAX_CELL_WIDTH: usize = 40;

fn optional(value: &Option<String>) -> String {
    present(value).unwrap_or(MISSING).to_string()
}

fn row(user: &UserRecord) -> [String; 9] {
    [
        user.display_id(),
        user.display_email().to_string(),
        optional(&user.about_me),
        optional(&user.street_address),
        optional(&user.city),
        optional(&user.state),
        optional(&user.zip),
        user.display_birthdate(),
        user.display_created_at(),
    ]
}

fn clip(cell: &str) -> String {
    let single_line = cell.replace(['\r', '\n'], " ");
    if single_line.chars().count() <= MAX_CELL_WIDTH {
        return single_line;
    }
    let kept: String = single_line.chars().take(MAX_CELL_WIDTH - 3).collect();
    format!("{kept}...")
}

/// Summary line, error banner and table for one snapshot.
pub fn render_snapshot(snapshot: &ViewerSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total Users: {}", snapshot.count());
    if let Some(error) = &snapshot.error {
        let _ = writeln!(out, "Error: {error}");
    }

    if snapshot.users.is_empty() {
        let message = if snapshot.error.is_some() {
            "Unable to Load Data"
        } else {
            "No Users Found"
        };
        let _ = writeln!(out, "{message}");
    } else {
        out.push_str(&render_users(&snapshot.users));
    }

    if let Some(at) = snapshot.last_updated {
        let _ = writeln!(
            out,
            "Last refresh: {}",
            at.with_timezone(&chrono::Local).format("%H:%M:%S")
        );
    }
    out
}

pub fn render_users(users: &[UserRecord]) -> String {
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|user| row(user).iter().map(|cell| clip(cell)).collect())
        .collect();

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.chars().count()).collect();
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, HEADERS.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, rule.iter().map(String::as_str), &widths);
    for cells in &rows {
        push_line(&mut out, cells.iter().map(String::as_str), &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", line.join(" | ").trim_end());
}
