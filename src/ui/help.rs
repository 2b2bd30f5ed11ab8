//! Help overlay: the key binding table.

use crate::app::App;
use ratatui::{
    layout::Constraint,
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Row, Table},
    Frame,
};

use super::render::centered_rect;

/// Key column and description, in display order. Empty keys start a section.
const BINDINGS: [(&str, &str); 17] = [
    ("", "Browse"),
    ("j / Down", "Focus next control"),
    ("k / Up", "Focus previous control"),
    ("Enter", "Open focused control"),
    ("Backspace / h", "Back"),
    ("l", "Forward"),
    ("/", "Search (when the catalog offers it)"),
    ("r", "Reload"),
    ("Ctrl+d / PgDn", "Scroll down"),
    ("Ctrl+u / PgUp", "Scroll up"),
    ("t", "Switch theme"),
    ("?", "This help"),
    ("q / Esc", "Quit"),
    ("", "Search"),
    ("Enter", "Submit search"),
    ("Esc", "Cancel"),
    ("any key", "Dismiss a notice"),
];

/// Render the help overlay on top of the current view.
pub(super) fn render(f: &mut Frame, app: &App) {
    let overlay = centered_rect(70, 80, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let rows: Vec<Row> = BINDINGS
        .iter()
        .map(|(key, action)| {
            if key.is_empty() {
                Row::new(vec![format!("-- {action} --"), String::new()])
                    .style(app.palette.heading.add_modifier(Modifier::BOLD))
            } else {
                Row::new(vec![format!("  {key}"), (*action).to_string()])
            }
        })
        .collect();

    let widths = [Constraint::Length(18), Constraint::Min(20)];

    let table = Table::new(rows, widths)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.palette.content_border)
                .title(" Help (any key to close) "),
        )
        .header(
            Row::new(vec!["Key", "Action"])
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::UNDERLINED),
                )
                .bottom_margin(1),
        )
        .style(app.palette.body);

    f.render_widget(table, overlay);
}
