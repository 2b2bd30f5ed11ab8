//! Input handling for the TUI.
//!
//! Routes key presses by mode. Every navigation spawns a fetch task whose
//! result comes back as an `AppEvent`.

use crate::app::{App, AppEvent, Mode};
use crate::nav::{Activation, NavRequest};
use crate::util::{validate_url_for_open, MAX_SEARCH_QUERY_LENGTH};
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;
use url::Url;

use super::Action;

/// Lines moved by a page scroll.
const PAGE_LINES: usize = 10;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match app.mode {
        // Any key dismisses a blocking notice or the help overlay.
        Mode::Notice(_) | Mode::Help => {
            app.mode = Mode::Browse;
            Action::Continue
        }
        Mode::Search => {
            handle_search_input(app, code, event_tx);
            Action::Continue
        }
        Mode::Browse => handle_browse_input(app, code, modifiers, event_tx),
    }
}

fn handle_browse_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);

    match code {
        KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => app.focus_next(),
        KeyCode::Char('k') | KeyCode::Up => app.focus_prev(),
        KeyCode::Char('d') if ctrl => app.scroll_down(PAGE_LINES),
        KeyCode::Char('u') if ctrl => app.scroll_up(PAGE_LINES),
        KeyCode::PageDown => app.scroll_down(PAGE_LINES),
        KeyCode::PageUp => app.scroll_up(PAGE_LINES),
        KeyCode::Enter => activate_focused(app, event_tx),
        KeyCode::Backspace | KeyCode::Char('h') => match app.navigator.go_back() {
            Some(request) => spawn_fetch(app, request, event_tx),
            None => app.set_status("Already at the first page"),
        },
        KeyCode::Char('l') => match app.navigator.go_forward() {
            Some(request) => spawn_fetch(app, request, event_tx),
            None => app.set_status("Already at the last page"),
        },
        KeyCode::Char('/') => {
            if app.search_visible() {
                app.search_input.clear();
                app.mode = Mode::Search;
            } else {
                app.set_status("This catalog page has no search");
            }
        }
        KeyCode::Char('r') => {
            let request = app.navigator.reload_request();
            spawn_fetch(app, request, event_tx);
        }
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('?') => app.mode = Mode::Help,
        _ => {}
    }
    Action::Continue
}

fn handle_search_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) {
    match code {
        KeyCode::Esc => {
            app.search_input.clear();
            app.mode = Mode::Browse;
        }
        KeyCode::Enter => {
            let term = std::mem::take(&mut app.search_input);
            app.mode = Mode::Browse;
            match app.navigator.search_request(&term) {
                Ok(request) => spawn_fetch(app, request, event_tx),
                Err(e) => {
                    let notice = e.notice(&app.navigator.settings().strings).to_string();
                    app.show_notice(notice);
                }
            }
        }
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) => {
            if app.search_input.chars().count() < MAX_SEARCH_QUERY_LENGTH {
                app.search_input.push(c);
            } else {
                app.set_status(format!(
                    "Search query too long (max {} chars)",
                    MAX_SEARCH_QUERY_LENGTH
                ));
            }
        }
        _ => {}
    }
}

/// Dispatches the focused control: catalog links navigate, everything else
/// opens in the system browser.
fn activate_focused(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let Some(target) = app.focused_target() else {
        return;
    };
    match app.navigator.dispatch(&target) {
        Ok(Activation::Navigate(request)) => spawn_fetch(app, request, event_tx),
        Ok(Activation::Open(url)) => open_external(app, &url),
        Err(e) => {
            tracing::warn!(error = %e, "Could not resolve link");
            app.set_status(format!("Invalid link: {e}"));
        }
    }
}

fn open_external(app: &mut App, url: &Url) {
    // SEC-004: Validate URL before open::that() to prevent command injection
    match validate_url_for_open(url.as_str()) {
        Err(e) => app.set_status(e.to_string()),
        Ok(url) => {
            if let Err(e) = open::that(url.as_str()) {
                app.set_status(format!("Failed to open browser: {}", e));
            } else {
                app.set_status(format!("Opening {}...", url));
            }
        }
    }
}

/// Starts a background fetch for `request`.
///
/// Fetches are not cancelled by later ones; each result is applied when it
/// arrives.
fn spawn_fetch(app: &mut App, request: NavRequest, event_tx: &mpsc::Sender<AppEvent>) {
    app.pending_fetches += 1;
    let fetcher = app.navigator.fetcher().clone();
    let tx = event_tx.clone();

    tracing::debug!(
        path = %request.path,
        from_history = request.from_history,
        "Spawning fetch task"
    );

    tokio::spawn(async move {
        let result = fetcher.fetch(&request.path).await;
        if let Err(e) = tx.send(AppEvent::FeedLoaded { request, result }).await {
            tracing::warn!(error = %e, "Failed to send fetch result (receiver dropped)");
        }
    });
}

/// Spawns the page-load navigation named by the current location.
pub(super) fn spawn_initial_load(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let request = app.navigator.initial_request();
    spawn_fetch(app, request, event_tx);
}
