use quick_xml::encoding::Decoder;
use quick_xml::escape::escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Reader;
use thiserror::Error;

use super::model::{Author, Category, Entry, FeedDocument, Link};

/// SEC-003: Maximum element nesting depth accepted from a catalog response.
const MAX_DEPTH: usize = 64;

/// Errors that can occur while parsing a feed document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The body is not well-formed XML.
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Well-formed XML, but the root element is not `<feed>`.
    #[error("document has no <feed> root element")]
    MissingRoot,
    /// SEC-003: Nesting depth exceeds safety limit.
    #[error("nesting depth exceeds maximum of {0} levels")]
    MaxDepthExceeded(usize),
}

/// Parses a catalog response body into a [`FeedDocument`].
///
/// Elements are matched by local name, so namespace prefixes are ignored.
/// Entry `<content>` is kept as written (still entity-encoded); other text
/// fields are unescaped and trimmed. Missing entry fields are left empty.
///
/// # Security
///
/// SEC-002: quick-xml never expands `<!ENTITY>` declarations, so DTD-based
/// entity attacks cannot reach the text we keep.
pub fn parse_feed(bytes: &[u8]) -> Result<FeedDocument, ParseError> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(false);
    let decoder = reader.decoder();

    let mut builder = FeedBuilder::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => builder.start(&e, decoder)?,
            Event::Empty(e) => builder.empty(&e, decoder),
            Event::End(e) => builder.end(&e),
            Event::Text(t) => builder.text(&t),
            Event::CData(c) => builder.cdata(&String::from_utf8_lossy(&c)),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    builder.finish()
}

/// Text-bearing element currently being collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    FeedTitle,
    EntryTitle,
    EntryId,
    EntryUpdated,
    EntryContent,
    EntrySummary,
    AuthorName,
    AuthorUri,
}

impl Field {
    /// Content fields keep their inner markup verbatim.
    fn keeps_markup(self) -> bool {
        matches!(self, Field::EntryContent | Field::EntrySummary)
    }
}

struct Capture {
    field: Field,
    /// Stack depth outside the captured element.
    depth: usize,
    text: String,
}

#[derive(Default)]
struct FeedBuilder {
    doc: FeedDocument,
    stack: Vec<Vec<u8>>,
    entry: Option<Entry>,
    summary: Option<String>,
    author: Option<Author>,
    capture: Option<Capture>,
    saw_root: bool,
    has_title: bool,
}

impl FeedBuilder {
    /// Local name of the innermost open element.
    fn parent(&self) -> Option<Vec<u8>> {
        self.stack.last().cloned()
    }

    fn start(&mut self, e: &BytesStart<'_>, decoder: Decoder) -> Result<(), ParseError> {
        if self.stack.len() >= MAX_DEPTH {
            return Err(ParseError::MaxDepthExceeded(MAX_DEPTH));
        }
        let local = e.local_name().as_ref().to_vec();

        if let Some(capture) = self.capture.as_mut() {
            if capture.field.keeps_markup() {
                capture.text.push('<');
                capture.text.push_str(&String::from_utf8_lossy(e));
                capture.text.push('>');
            }
            self.stack.push(local);
            return Ok(());
        }

        let parent = self.parent();
        let field = match (parent.as_deref(), local.as_slice()) {
            (None, b"feed") => {
                self.saw_root = true;
                None
            }
            (Some(b"feed"), b"title") if !self.has_title => Some(Field::FeedTitle),
            (Some(b"feed"), b"entry") => {
                self.entry = Some(Entry::default());
                self.summary = None;
                None
            }
            (Some(b"feed"), b"link") => {
                self.doc.links.push(parse_link(e, decoder));
                None
            }
            (Some(b"entry"), name) if self.entry.is_some() => match name {
                b"title" => Some(Field::EntryTitle),
                b"id" => Some(Field::EntryId),
                b"updated" => Some(Field::EntryUpdated),
                b"content" => Some(Field::EntryContent),
                b"summary" => Some(Field::EntrySummary),
                b"author" => {
                    self.author = Some(Author::default());
                    None
                }
                b"link" | b"category" => {
                    self.entry_child(name, e, decoder);
                    None
                }
                _ => None,
            },
            (Some(b"author"), b"name") if self.author.is_some() => Some(Field::AuthorName),
            (Some(b"author"), b"uri") if self.author.is_some() => Some(Field::AuthorUri),
            _ => None,
        };

        if let Some(field) = field {
            self.capture = Some(Capture {
                field,
                depth: self.stack.len(),
                text: String::new(),
            });
        }
        self.stack.push(local);
        Ok(())
    }

    fn empty(&mut self, e: &BytesStart<'_>, decoder: Decoder) {
        if let Some(capture) = self.capture.as_mut() {
            if capture.field.keeps_markup() {
                capture.text.push('<');
                capture.text.push_str(&String::from_utf8_lossy(e));
                capture.text.push_str("/>");
            }
            return;
        }

        let parent = self.parent();
        let local = e.local_name();
        match (parent.as_deref(), local.as_ref()) {
            (Some(b"feed"), b"link") => self.doc.links.push(parse_link(e, decoder)),
            (Some(b"entry"), name @ (b"link" | b"category")) => {
                let name = name.to_vec();
                self.entry_child(&name, e, decoder);
            }
            _ => {}
        }
    }

    fn entry_child(&mut self, name: &[u8], e: &BytesStart<'_>, decoder: Decoder) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };
        match name {
            b"link" => entry.links.push(parse_link(e, decoder)),
            b"category" => entry.categories.push(parse_category(e, decoder)),
            _ => {}
        }
    }

    fn text(&mut self, t: &BytesText<'_>) {
        let Some(capture) = self.capture.as_mut() else {
            return;
        };
        if capture.field.keeps_markup() {
            capture.text.push_str(&String::from_utf8_lossy(t));
            return;
        }
        match t.unescape() {
            Ok(text) => capture.text.push_str(&text),
            Err(e) => {
                tracing::warn!(error = %e, "Keeping undecodable text as written");
                capture.text.push_str(&String::from_utf8_lossy(t));
            }
        }
    }

    fn cdata(&mut self, raw: &str) {
        let Some(capture) = self.capture.as_mut() else {
            return;
        };
        if capture.field.keeps_markup() {
            // Content is stored entity-encoded; CDATA is not
            capture.text.push_str(&escape(raw));
        } else {
            capture.text.push_str(raw);
        }
    }

    fn end(&mut self, e: &BytesEnd<'_>) {
        let Some(local) = self.stack.pop() else {
            return;
        };

        if let Some(capture) = self.capture.as_mut() {
            if self.stack.len() > capture.depth {
                if capture.field.keeps_markup() {
                    capture.text.push_str("</");
                    capture.text.push_str(&String::from_utf8_lossy(e.name().as_ref()));
                    capture.text.push('>');
                }
                return;
            }
        }
        if let Some(capture) = self.capture.take() {
            self.store(capture);
            return;
        }

        match local.as_slice() {
            b"author" => {
                if let (Some(author), Some(entry)) = (self.author.take(), self.entry.as_mut()) {
                    entry.authors.push(author);
                }
            }
            b"entry" => {
                if let Some(mut entry) = self.entry.take() {
                    if entry.content.is_empty() {
                        if let Some(summary) = self.summary.take() {
                            entry.content = summary;
                        }
                    }
                    self.doc.entries.push(entry);
                }
            }
            _ => {}
        }
    }

    fn store(&mut self, capture: Capture) {
        let text = capture.text.trim().to_string();
        match capture.field {
            Field::FeedTitle => {
                self.doc.title = text;
                self.has_title = true;
            }
            Field::AuthorName => {
                if let Some(author) = self.author.as_mut() {
                    author.name = text;
                }
            }
            Field::AuthorUri => {
                if let Some(author) = self.author.as_mut() {
                    author.uri = non_empty(text);
                }
            }
            Field::EntrySummary => self.summary = Some(text),
            field => {
                let Some(entry) = self.entry.as_mut() else {
                    return;
                };
                match field {
                    Field::EntryTitle => entry.title = text,
                    Field::EntryId => entry.id = text,
                    Field::EntryUpdated => entry.updated = non_empty(text),
                    Field::EntryContent => entry.content = text,
                    _ => {}
                }
            }
        }
    }

    fn finish(self) -> Result<FeedDocument, ParseError> {
        if !self.saw_root {
            return Err(ParseError::MissingRoot);
        }
        Ok(self.doc)
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Decoded attributes of an element by local name. Malformed ones are skipped with a warning.
fn attribute_values<'a>(
    e: &'a BytesStart<'_>,
    decoder: Decoder,
) -> impl Iterator<Item = (Vec<u8>, String)> + 'a {
    e.attributes().filter_map(move |attr_result| {
        let attr = match attr_result {
            Ok(attr) => attr,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed feed attribute");
                return None;
            }
        };
        match attr.decode_and_unescape_value(decoder) {
            Ok(value) => Some((attr.key.local_name().as_ref().to_vec(), value.into_owned())),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping undecodable feed attribute");
                None
            }
        }
    })
}

fn parse_link(e: &BytesStart<'_>, decoder: Decoder) -> Link {
    let mut link = Link::default();
    for (key, value) in attribute_values(e, decoder) {
        match key.as_slice() {
            b"rel" => link.rel = Some(value),
            b"href" => link.href = value,
            b"type" => link.media_type = Some(value),
            b"title" => link.title = Some(value),
            _ => {}
        }
    }
    link
}

fn parse_category(e: &BytesStart<'_>, decoder: Decoder) -> Category {
    let mut category = Category::default();
    for (key, value) in attribute_values(e, decoder) {
        match key.as_slice() {
            b"label" => category.label = value,
            b"term" => category.term = value,
            _ => {}
        }
    }
    if category.label.is_empty() {
        category.label = category.term.clone();
    }
    category
}
