//! Color themes for the terminal host.
//!
//! A `ColorPalette` maps each semantic role of the catalog screen (bars,
//! headings, controls, notices) to a ratatui `Style`. `ThemeVariant`
//! selects between the Dark and Light palettes.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Variant named in the config, falling back to Dark for unknown names.
    pub fn from_config(name: &str) -> Self {
        Self::from_str_name(name).unwrap_or_else(|| {
            tracing::warn!(theme = %name, "Unknown theme, using dark");
            Self::Dark
        })
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// Semantic roles of the catalog screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPalette {
    /// Feed title bar.
    pub title_bar: Style,
    /// Navigation region background.
    pub nav_bar: Style,
    /// Entry headings (book titles, author bios).
    pub heading: Style,
    /// Body text and decoded content.
    pub body: Style,
    /// Secondary text: timestamps, genres.
    pub muted: Style,
    /// In-catalog navigation control.
    pub link: Style,
    /// Link opened outside the catalog (downloads, covers).
    pub external: Style,
    /// The focused control, whatever its kind.
    pub focused: Style,
    pub separator: Style,
    pub content_border: Style,
    pub search_prompt: Style,
    pub status_bar: Style,
    pub notice_border: Style,
    pub notice_text: Style,
}

impl ColorPalette {
    pub fn dark() -> Self {
        Self {
            title_bar: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            nav_bar: Style::default().fg(Color::White),
            heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            body: Style::default().fg(Color::White),
            muted: Style::default().fg(Color::DarkGray),
            link: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::UNDERLINED),
            external: Style::default().fg(Color::Green),
            focused: Style::default().bg(Color::DarkGray).fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),
            content_border: Style::default().fg(Color::Cyan),
            search_prompt: Style::default().fg(Color::Yellow),
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            notice_border: Style::default().fg(Color::Red),
            notice_text: Style::default().fg(Color::White),
        }
    }

    pub fn light() -> Self {
        Self {
            title_bar: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            nav_bar: Style::default().fg(Color::Black),
            heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            body: Style::default().fg(Color::Black),
            muted: Style::default().fg(Color::Gray),
            link: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::UNDERLINED),
            external: Style::default().fg(Color::Green),
            focused: Style::default().bg(Color::Blue).fg(Color::White),
            separator: Style::default().fg(Color::Gray),
            content_border: Style::default().fg(Color::Blue),
            search_prompt: Style::default().fg(Color::Magenta),
            status_bar: Style::default().bg(Color::Gray).fg(Color::Black),
            notice_border: Style::default().fg(Color::Red),
            notice_text: Style::default().fg(Color::Black),
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::dark()
    }
}
