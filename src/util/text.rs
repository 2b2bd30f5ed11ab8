use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Terminal columns occupied by `s`.
///
/// ```
/// use folio::util::display_width;
///
/// assert_eq!(display_width("Tolkien"), 7);
/// assert_eq!(display_width("指輪物語"), 8);
/// ```
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Byte offset of the longest prefix of `s` that fits in `max_width` columns.
fn fitting_prefix(s: &str, max_width: usize) -> usize {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = char_width(c);
        if used + w > max_width {
            return idx;
        }
        used += w;
    }
    s.len()
}

/// Truncates `s` to `max_width` columns, appending "..." when cut.
///
/// Widths of three columns or fewer have no room for the ellipsis, so the
/// text is cut bare. Returns `Cow::Borrowed` when `s` already fits.
///
/// ```
/// use folio::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Short", 10), "Short");
/// assert_eq!(truncate_to_width("The Fellowship", 10), "The Fel...");
/// assert_eq!(truncate_to_width("Test", 2), "Te");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width <= ELLIPSIS_WIDTH {
        return Cow::Owned(s[..fitting_prefix(s, max_width)].to_string());
    }
    let end = fitting_prefix(s, max_width - ELLIPSIS_WIDTH);
    let mut out = String::with_capacity(end + ELLIPSIS.len());
    out.push_str(&s[..end]);
    out.push_str(ELLIPSIS);
    Cow::Owned(out)
}

/// Greedy word wrap to `width` columns.
///
/// Words wider than a line are split at character boundaries. Each input
/// line is wrapped separately; blank input lines are kept.
pub fn wrap_to_width(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for source in text.lines() {
        let mut line = String::new();
        let mut line_width = 0;

        for word in source.split_whitespace() {
            let mut word = word;
            let mut word_width = display_width(word);

            if line_width > 0 && line_width + 1 + word_width > width {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }

            // EDGE-004: a single word longer than the line
            while word_width > width {
                let end = fitting_prefix(word, width - line_width).max(
                    word.chars().next().map_or(0, char::len_utf8),
                );
                let (head, tail) = word.split_at(end);
                line.push_str(head);
                lines.push(std::mem::take(&mut line));
                line_width = 0;
                word = tail;
                word_width = display_width(word);
            }

            if word.is_empty() {
                continue;
            }
            if line_width > 0 {
                line.push(' ');
                line_width += 1;
            }
            line.push_str(word);
            line_width += word_width;
        }

        lines.push(line);
    }

    lines
}

/// SEC-001: Removes control characters before text reaches the terminal.
///
/// Catalog titles and descriptions are server-controlled; an embedded ESC
/// sequence could rewrite the screen. Newlines and tabs are kept, tabs as a
/// single space.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| c.is_control() && c != '\n') {
        return Cow::Borrowed(s);
    }
    Cow::Owned(
        s.chars()
            .filter_map(|c| match c {
                '\n' => Some('\n'),
                '\t' => Some(' '),
                c if c.is_control() => None,
                c => Some(c),
            })
            .collect(),
    )
}
