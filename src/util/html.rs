use std::borrow::Cow;

use quick_xml::escape::{resolve_html5_entity, resolve_predefined_entity, unescape_with};

/// Longest reference body we try to resolve (`&CounterClockwiseContourIntegral;`).
const MAX_ENTITY_LEN: usize = 40;

/// Block-level tags that end a line when markup is flattened to text.
const BLOCK_TAGS: [&str; 12] = [
    "p", "br", "div", "li", "ul", "ol", "h1", "h2", "h3", "h4", "tr", "blockquote",
];

/// Escapes text for safe insertion into markup.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(text)
}

/// Decodes HTML character references, leniently.
///
/// Named (HTML5 table) and numeric references are resolved. Anything that
/// does not form a valid reference, such as a bare `&` or an unknown name,
/// is kept as written. Returns `Cow::Borrowed` when there is nothing to do.
///
/// # Examples
///
/// ```
/// use folio::util::decode_entities;
///
/// assert_eq!(decode_entities("&lt;p&gt;Tom &amp; Jerry&lt;/p&gt;"), "<p>Tom & Jerry</p>");
/// assert_eq!(decode_entities("caf&eacute; &#8470;5"), "café №5");
/// assert_eq!(decode_entities("R&D; & more"), "R&D; & more");
/// ```
pub fn decode_entities(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match reference_end(tail) {
            Some(end) => {
                let candidate = &tail[..=end];
                match unescape_with(candidate, |name| {
                    resolve_predefined_entity(name).or_else(|| resolve_html5_entity(name))
                }) {
                    Ok(decoded) => out.push_str(&decoded),
                    Err(_) => out.push_str(candidate),
                }
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Byte index of the `;` closing the reference that starts `tail`, if any.
fn reference_end(tail: &str) -> Option<usize> {
    for (idx, c) in tail.char_indices().skip(1).take(MAX_ENTITY_LEN) {
        match c {
            ';' if idx > 1 => return Some(idx),
            c if c.is_ascii_alphanumeric() || c == '#' => {}
            _ => return None,
        }
    }
    None
}

/// Flattens decoded markup into plain text for the terminal.
///
/// Tags are dropped, block-level tags become line breaks, entities are
/// decoded, and runs of blank lines collapse to one.
pub fn to_plain_text(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut rest = markup;

    while let Some(open) = rest.find('<') {
        text.push_str(&rest[..open]);
        let Some(close) = rest[open..].find('>') else {
            text.push_str(&rest[open..]);
            rest = "";
            break;
        };
        let tag = &rest[open + 1..open + close];
        if BLOCK_TAGS.contains(&tag_name(tag).to_ascii_lowercase().as_str()) {
            text.push('\n');
        }
        rest = &rest[open + close + 1..];
    }
    text.push_str(rest);

    let decoded = decode_entities(&text);
    let mut lines: Vec<String> = Vec::new();
    for line in decoded.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() && lines.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        lines.push(collapsed);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

fn tag_name(tag: &str) -> &str {
    tag.trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode_named_and_numeric() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&laquo;Война и мир&raquo;"), "«Война и мир»");
        assert_eq!(decode_entities("&#39;quoted&#x27;"), "'quoted'");
        assert_eq!(decode_entities("non&nbsp;breaking"), "non\u{a0}breaking");
    }

    #[test]
    fn test_decode_without_references_borrows() {
        assert!(matches!(decode_entities("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_decode_keeps_invalid_references() {
        assert_eq!(decode_entities("fish & chips"), "fish & chips");
        assert_eq!(decode_entities("&unknownname;"), "&unknownname;");
        assert_eq!(decode_entities("trailing &"), "trailing &");
        assert_eq!(decode_entities("&;"), "&;");
        assert_eq!(decode_entities("&amp"), "&amp");
    }

    #[test]
    fn test_decode_only_one_level() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn test_plain_text_breaks_blocks() {
        let markup = "<p>First <b>bold</b> line</p><p>Second&nbsp;line<br/>third</p>";
        assert_eq!(to_plain_text(markup), "First bold line\n\nSecond line\nthird");
    }

    #[test]
    fn test_plain_text_collapses_blank_lines() {
        let markup = "<div>\n\n  a  \n\n\n</div><div></div><p>b</p>";
        assert_eq!(to_plain_text(markup), "a\n\nb");
    }

    #[test]
    fn test_plain_text_unclosed_tag_is_kept() {
        assert_eq!(to_plain_text("a < b"), "a < b");
    }

    proptest! {
        #[test]
        fn test_decode_inverts_escape(text in "\\PC{0,64}") {
            let escaped = escape_html(&text);
            let decoded = decode_entities(&escaped);
            prop_assert_eq!(decoded.as_ref(), text.as_str());
        }

        #[test]
        fn test_decode_inverts_escape_of_entity_text(text in "[&;#a-z0-9 <>\"']{0,32}") {
            let escaped = escape_html(&text);
            let decoded = decode_entities(&escaped);
            prop_assert_eq!(decoded.as_ref(), text.as_str());
        }
    }
}
