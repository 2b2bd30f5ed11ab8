use crate::app::{App, Mode};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    // EDGE-001: Guard against zero-width/height areas
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.pending_fetches > 0 {
        Cow::Borrowed("Loading...")
    } else {
        match app.mode {
            Mode::Search => Cow::Borrowed("Type a search term | ENTER search | ESC cancel"),
            Mode::Notice(_) | Mode::Help => Cow::Borrowed("Press any key"),
            Mode::Browse if app.search_visible() => {
                Cow::Borrowed("[j/k]move [Enter]open [h]back [l]forward [/]search [r]eload [?]help [q]uit")
            }
            Mode::Browse => {
                Cow::Borrowed("[j/k]move [Enter]open [h]back [l]forward [r]eload [?]help [q]uit")
            }
        }
    };

    let paragraph = Paragraph::new(text).style(app.palette.status_bar);
    f.render_widget(paragraph, area);
}
