/// Parsed feed document, owned by a single render cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedDocument {
    /// Feed-level `<title>`.
    pub title: String,
    /// Feed-level `<link>` elements, in document order. Entry links are
    /// never collected here.
    pub links: Vec<Link>,
    pub entries: Vec<Entry>,
}

/// A `<link>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    pub rel: Option<String>,
    pub href: String,
    /// The `type` attribute.
    pub media_type: Option<String>,
    pub title: Option<String>,
}

/// One catalog item: a navigable collection, an author, or a book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub title: String,
    pub id: String,
    /// Raw `<updated>` text.
    pub updated: Option<String>,
    /// Inner markup of `<content>` (or `<summary>`) as written in the
    /// document, with HTML still entity-encoded.
    pub content: String,
    pub links: Vec<Link>,
    pub categories: Vec<Category>,
    pub authors: Vec<Author>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Category {
    pub label: String,
    pub term: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub uri: Option<String>,
}
