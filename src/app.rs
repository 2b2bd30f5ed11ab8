use crate::feed::{FetchError, FetchedFeed};
use crate::nav::{NavRequest, Navigator};
use crate::theme::{ColorPalette, ThemeVariant};
use crate::view::Target;
use std::borrow::Cow;
use tokio::time::Instant;

/// Maximum scroll offset for the content region (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

// ============================================================================
// Mode and Event Types
// ============================================================================

/// What the keyboard is currently driving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Moving between and activating controls.
    Browse,
    /// Typing a search term.
    Search,
    /// A blocking notice is shown; any key dismisses it.
    Notice(String),
    /// Key binding overlay.
    Help,
}

/// Events sent from background tasks to the main loop.
#[derive(Debug)]
pub enum AppEvent {
    /// A spawned fetch finished, successfully or not.
    FeedLoaded {
        request: NavRequest,
        result: Result<FetchedFeed, FetchError>,
    },
}

// ============================================================================
// App State
// ============================================================================

/// Terminal host state wrapped around a [`Navigator`].
pub struct App {
    pub navigator: Navigator,
    pub mode: Mode,
    /// Search term being typed in `Mode::Search`.
    pub search_input: String,
    /// Index into [`App::controls`].
    pub focus: usize,
    /// First visible content line.
    pub scroll: usize,
    /// Keep the focused control in view on the next draw.
    pub follow_focus: bool,
    /// Fetch tasks spawned but not yet applied.
    pub pending_fetches: usize,
    pub theme: ThemeVariant,
    pub palette: ColorPalette,
    /// PERF-010: Only redraw when state has changed.
    pub needs_redraw: bool,
    pub status_message: Option<(Cow<'static, str>, Instant)>,
}

impl App {
    pub fn new(navigator: Navigator, theme: ThemeVariant) -> Self {
        Self {
            navigator,
            mode: Mode::Browse,
            search_input: String::new(),
            focus: 0,
            scroll: 0,
            follow_focus: true,
            pending_fetches: 0,
            theme,
            palette: theme.palette(),
            needs_redraw: true,
            status_message: None,
        }
    }

    /// Every focusable control: the navigation region first, then the
    /// content region, each in display order.
    pub fn controls(&self) -> Vec<Target> {
        let Some(display) = self.navigator.display() else {
            return Vec::new();
        };
        display
            .navigation
            .iter()
            .map(|control| Target::Navigate(control.target.clone()))
            .chain(display.content.targets())
            .collect()
    }

    /// Number of controls in the navigation region.
    pub fn navigation_len(&self) -> usize {
        self.navigator
            .display()
            .map_or(0, |display| display.navigation.len())
    }

    pub fn focused_target(&self) -> Option<Target> {
        self.controls().into_iter().nth(self.focus)
    }

    pub fn focus_next(&mut self) {
        let count = self.controls().len();
        if count > 0 && self.focus + 1 < count {
            self.focus += 1;
        }
        self.follow_focus = true;
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.saturating_sub(1);
        self.follow_focus = true;
    }

    /// Moves focus to the first content control, or the first control when
    /// the content region has none.
    pub fn reset_focus(&mut self) {
        let total = self.controls().len();
        let nav = self.navigation_len();
        self.focus = if nav < total { nav } else { 0 };
        self.scroll = 0;
        self.follow_focus = true;
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_add(lines).min(MAX_SCROLL);
        self.follow_focus = false;
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
        self.follow_focus = false;
    }

    /// Whether the displayed feed offers search.
    pub fn search_visible(&self) -> bool {
        self.navigator
            .display()
            .is_some_and(|display| display.search_visible)
    }

    pub fn show_notice(&mut self, text: impl Into<String>) {
        self.mode = Mode::Notice(text.into());
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.next();
        self.palette = self.theme.palette();
        self.set_status(format!("Theme: {}", self.theme.name()));
    }

    /// Set a status message that will auto-clear after 3 seconds.
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired (older than 3 seconds).
    /// Returns true if a message was actually cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}
