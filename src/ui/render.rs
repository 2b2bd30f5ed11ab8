//! Render functions for the TUI.
//!
//! Lays out the title bar, navigation region, content region and status
//! bar, then draws any overlay for the current mode.

use crate::app::{App, Mode};
use crate::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::{content, help, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 40;
pub(super) const MIN_HEIGHT: u16 = 8;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // EDGE-001: Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    // EDGE-001: Minimum terminal size check for usable UI
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let searching = app.mode == Mode::Search;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(if searching { 1 } else { 0 }),
            Constraint::Length(1),
        ])
        .split(area);

    render_title(f, app, chunks[0]);
    render_navigation(f, app, chunks[1]);
    render_content(f, app, chunks[2]);
    if searching {
        render_search_prompt(f, app, chunks[3]);
    }
    status::render(f, app, chunks[4]);

    match &app.mode {
        Mode::Notice(text) => render_notice_overlay(f, app, text),
        Mode::Help => help::render(f, app),
        Mode::Browse | Mode::Search => {}
    }
}

fn render_title(f: &mut Frame, app: &App, area: Rect) {
    let title = match app.navigator.display() {
        Some(display) => strip_control_chars(&display.title).into_owned(),
        None => "folio".to_string(),
    };
    let title = truncate_to_width(&title, area.width.saturating_sub(2) as usize).into_owned();
    let paragraph = Paragraph::new(format!(" {title}")).style(app.palette.title_bar);
    f.render_widget(paragraph, area);
}

fn render_navigation(f: &mut Frame, app: &App, area: Rect) {
    let Some(display) = app.navigator.display() else {
        return;
    };
    let focused = (app.focus < display.navigation.len()).then_some(app.focus);
    let line = content::navigation_line(&display.navigation, focused, &app.palette);
    let offset = content::navigation_offset(&display.navigation, focused, area.width as usize);
    let offset = offset.min(u16::MAX as usize) as u16;
    f.render_widget(
        Paragraph::new(line)
            .style(app.palette.nav_bar)
            .scroll((0, offset)),
        area,
    );
}

fn render_content(f: &mut Frame, app: &mut App, area: Rect) {
    // EDGE-001: Layout may produce zero-sized rects during resizes
    if area.width < 3 || area.height < 3 {
        return;
    }

    let Some(display) = app.navigator.display() else {
        let text = if app.pending_fetches > 0 {
            "Loading catalog..."
        } else {
            "Nothing to show. Press r to retry."
        };
        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(app.palette.content_border),
            )
            .style(app.palette.muted);
        f.render_widget(paragraph, area);
        return;
    };

    let inner_width = area.width.saturating_sub(2) as usize;
    let visible = area.height.saturating_sub(2) as usize;
    let focused = app.focus.checked_sub(display.navigation.len());
    let flat = content::flatten(&display.content, inner_width, focused, &app.palette);

    let mut scroll = app.scroll;
    if app.follow_focus {
        if let Some(&line) = focused.and_then(|i| flat.target_lines.get(i)) {
            if line < scroll {
                scroll = line;
            } else if line >= scroll + visible {
                scroll = line + 1 - visible;
            }
        }
    }
    // BUG-012: Clamp before rendering so a resize never shows an empty page.
    let max_scroll = flat.lines.len().saturating_sub(visible);
    scroll = scroll.min(max_scroll).min(u16::MAX as usize);

    let title = format!(" {} ", strip_control_chars(display.path.as_str()));
    let lines = if flat.lines.is_empty() {
        vec![Line::styled("(empty)", app.palette.muted)]
    } else {
        flat.lines
    };

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.palette.content_border)
                .title(title),
        )
        .style(app.palette.body)
        .scroll((scroll as u16, 0));

    app.scroll = scroll;
    f.render_widget(paragraph, area);
}

fn render_search_prompt(f: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled("Search: ", app.palette.search_prompt),
        Span::raw(format!("{}_", app.search_input)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Render a blocking notice centered on screen.
fn render_notice_overlay(f: &mut Frame, app: &App, text: &str) {
    let area = f.area();

    let width = 50u16.min(area.width.saturating_sub(4));
    let height = 7u16.min(area.height.saturating_sub(4));
    let overlay = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    );

    if overlay.width < 10 || overlay.height < 5 {
        return;
    }

    f.render_widget(Clear, overlay);

    let paragraph = Paragraph::new(format!("{text}\n\n(any key) Dismiss"))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.palette.notice_border)
                .title(" Notice "),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(app.palette.notice_text);

    f.render_widget(paragraph, overlay);
}

/// Create a centered rectangle with the given percentage of the parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
