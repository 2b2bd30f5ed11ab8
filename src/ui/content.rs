//! Terminal adapter for the view tree.
//!
//! Flattens a [`View`] into styled lines for a fixed width. Controls are
//! counted in the same order as [`View::targets`], so a focus index into
//! the targets picks out exactly one highlighted span, and the line each
//! control lands on is recorded for scrolling.

use crate::nav::Display;
use crate::theme::ColorPalette;
use crate::util::{display_width, strip_control_chars, to_plain_text, truncate_to_width, wrap_to_width};
use crate::view::{NavControl, Node, Row, View};
use ratatui::style::Style;
use ratatui::text::{Line, Span};

/// Groups whose controls are laid out inline rather than one per line.
const INLINE_GROUPS: [&str; 3] = ["authors", "links", "genres"];

const INLINE_SEPARATOR: &str = " · ";

/// Flattened content region.
#[derive(Debug, Default)]
pub(super) struct Flattened {
    pub lines: Vec<Line<'static>>,
    /// Line index of each control, indexed like [`View::targets`].
    pub target_lines: Vec<usize>,
}

/// Flattens `view` to lines at most `width` columns wide.
///
/// `focused` indexes the view's targets; `None` highlights nothing.
pub(super) fn flatten(
    view: &View,
    width: usize,
    focused: Option<usize>,
    palette: &ColorPalette,
) -> Flattened {
    let mut builder = Builder {
        width: width.max(1),
        focused,
        palette,
        out: Flattened::default(),
    };
    for row in &view.rows {
        builder.row(row);
    }
    builder.out
}

/// Single-line rendering of the navigation region.
pub(super) fn navigation_line(
    controls: &[NavControl],
    focused: Option<usize>,
    palette: &ColorPalette,
) -> Line<'static> {
    let mut spans = Vec::with_capacity(controls.len() * 2);
    for (i, control) in controls.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let style = if focused == Some(i) {
            palette.focused
        } else {
            palette.link
        };
        spans.push(Span::styled(format!("[{}]", clean(&control.label)), style));
    }
    Line::from(spans).style(palette.nav_bar)
}

/// Horizontal offset that keeps the focused control of a `width`-column
/// navigation bar in view. Zero while everything up to the focus fits.
pub(super) fn navigation_offset(controls: &[NavControl], focused: Option<usize>, width: usize) -> usize {
    let Some(focused) = focused.filter(|&i| i < controls.len()) else {
        return 0;
    };
    let start: usize = controls[..focused]
        .iter()
        .map(|c| display_width(&clean(&c.label)) + 3)
        .sum();
    let end = start + display_width(&clean(&controls[focused].label)) + 2;
    if end <= width {
        0
    } else {
        // EDGE-004: a control wider than the bar is shown from its start
        (end - width).min(start)
    }
}

/// The display as plain text, laid out as the terminal shows it.
pub fn plain_text(display: &Display, width: usize) -> String {
    let palette = ColorPalette::default();
    let mut out = String::new();
    let mut push_line = |line: &Line<'_>| {
        let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
        out.push_str(text.trim_end());
        out.push('\n');
    };

    push_line(&Line::raw(clean(&display.title)));
    if !display.navigation.is_empty() {
        push_line(&navigation_line(&display.navigation, None, &palette));
    }
    push_line(&Line::default());
    for line in &flatten(&display.content, width, None, &palette).lines {
        push_line(line);
    }
    out
}

fn clean(text: &str) -> String {
    strip_control_chars(text).into_owned()
}

/// Label shown for a control node, with its base style.
fn control_label(node: &Node, palette: &ColorPalette) -> Option<(String, Style)> {
    match node {
        Node::Nav(control) => Some((clean(&control.label), palette.link)),
        Node::External { label, .. } => Some((format!("↓ {}", clean(label)), palette.external)),
        Node::Image { src } => Some((format!("[cover] {}", clean(src)), palette.external)),
        _ => None,
    }
}

struct Builder<'a> {
    width: usize,
    focused: Option<usize>,
    palette: &'a ColorPalette,
    out: Flattened,
}

impl Builder<'_> {
    /// Claims the next target index for a control placed on line `line`,
    /// returning the style it should be drawn with.
    fn claim_target(&mut self, line: usize, base: Style) -> Style {
        let index = self.out.target_lines.len();
        self.out.target_lines.push(line);
        if self.focused == Some(index) {
            self.palette.focused
        } else {
            base
        }
    }

    fn next_line(&self) -> usize {
        self.out.lines.len()
    }

    fn push(&mut self, line: Line<'static>) {
        self.out.lines.push(line);
    }

    fn push_wrapped(&mut self, text: &str, style: Style) {
        for line in wrap_to_width(&strip_control_chars(text), self.width) {
            self.push(Line::styled(line, style));
        }
    }

    fn row(&mut self, row: &Row) {
        if row.class == "row" {
            self.two_column_row(row);
            return;
        }
        for node in &row.nodes {
            self.node(node);
        }
    }

    fn node(&mut self, node: &Node) {
        let palette = self.palette;
        match node {
            Node::Heading { text } => self.push_wrapped(text, palette.heading),
            Node::Text { class, text } => {
                let style = if *class == "updated" {
                    palette.muted
                } else {
                    palette.body
                };
                self.push_wrapped(text, style);
            }
            Node::RichText { html } => {
                let plain = to_plain_text(html);
                self.push_wrapped(&plain, palette.body);
            }
            Node::Nav(_) | Node::External { .. } | Node::Image { .. } => {
                if let Some((label, base)) = control_label(node, palette) {
                    let line = self.next_line();
                    let style = self.claim_target(line, base);
                    let label = truncate_to_width(&label, self.width).into_owned();
                    self.push(Line::from(Span::styled(label, style)));
                }
            }
            Node::Group { class, children } if INLINE_GROUPS.contains(class) => {
                self.inline_group(class, children);
            }
            Node::Group { children, .. } => {
                for child in children {
                    self.node(child);
                }
            }
            Node::Separator => {
                self.push(Line::styled("─".repeat(self.width), palette.separator));
            }
        }
    }

    /// Lays children out left to right, wrapping between them.
    fn inline_group(&mut self, class: &str, children: &[Node]) {
        let palette = self.palette;
        let prefix = match class {
            "authors" => "by ",
            "genres" => "in ",
            _ => "",
        };
        let mut spans: Vec<Span<'static>> = vec![Span::styled(prefix, palette.muted)];
        let mut used = display_width(prefix);

        for (i, child) in children.iter().enumerate() {
            let (label, base, is_control) = match child {
                Node::Text { text, .. } => (clean(text), palette.body, false),
                other => match control_label(other, palette) {
                    Some((label, base)) => (label, base, true),
                    None => continue,
                },
            };
            let label = truncate_to_width(&label, self.width).into_owned();
            let label_width = display_width(&label);
            let sep_width = if i > 0 { display_width(INLINE_SEPARATOR) } else { 0 };

            if i > 0 && used + sep_width + label_width > self.width {
                self.push(Line::from(std::mem::take(&mut spans)));
                used = 0;
            } else if i > 0 {
                spans.push(Span::styled(INLINE_SEPARATOR, palette.muted));
                used += sep_width;
            }

            let style = if is_control {
                let line = self.next_line();
                self.claim_target(line, base)
            } else {
                base
            };
            spans.push(Span::styled(label, style));
            used += label_width;
        }

        self.push(Line::from(spans));
    }

    /// Title on the left, first line of the content on the right.
    fn two_column_row(&mut self, row: &Row) {
        let palette = self.palette;
        let left_width = (self.width * 2 / 5).max(1);
        let right_width = self.width.saturating_sub(left_width + 1);

        let mut spans = Vec::with_capacity(3);
        let mut description = String::new();

        for node in &row.nodes {
            let Node::Group { class, children } = node else {
                continue;
            };
            for child in children {
                if *class == "col2" {
                    if let Node::Text { text, .. } = child {
                        description.push_str(text);
                    }
                    continue;
                }
                let (label, style) = match child {
                    Node::Text { text, .. } => (clean(text), palette.body),
                    other => match control_label(other, palette) {
                        Some((label, base)) => {
                            let line = self.next_line();
                            (label, self.claim_target(line, base))
                        }
                        None => continue,
                    },
                };
                let label = truncate_to_width(&label, left_width).into_owned();
                let pad = left_width.saturating_sub(display_width(&label));
                spans.push(Span::styled(label, style));
                spans.push(Span::raw(" ".repeat(pad + 1)));
            }
        }

        let description = clean(&description).replace('\n', " ");
        let description = truncate_to_width(description.trim(), right_width).into_owned();
        spans.push(Span::styled(description, palette.muted));
        self.push(Line::from(spans));
    }
}
