use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use std::fmt;
use url::Url;

/// Characters left unescaped by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A catalog resource identifier, relative to the site root.
///
/// Stored in normalized form: leading slashes are stripped, so `/opds/x` and
/// `opds/x` compare equal. The same value produces both the request target
/// (`/opds/x`) and the addressable location fragment (`#opds/x`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CatalogPath(String);

impl CatalogPath {
    /// Normalize a raw path by stripping any leading slashes.
    pub fn new(raw: &str) -> Self {
        Self(raw.trim_start_matches('/').to_string())
    }

    /// Build a path from a link href.
    ///
    /// Hrefs are usually site-relative. Absolute `http(s)` URLs are reduced to
    /// their path and query so they still address the catalog on this origin.
    pub fn from_href(href: &str) -> Self {
        match Url::parse(href) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                let mut target = url.path().to_string();
                if let Some(query) = url.query() {
                    target.push('?');
                    target.push_str(query);
                }
                Self::new(&target)
            }
            _ => Self::new(href),
        }
    }

    /// Recover a path from a location fragment (`#opds/x` or `opds/x`).
    ///
    /// Returns `None` when the fragment carries no path, which callers treat
    /// as "go to the catalog root".
    pub fn from_fragment(fragment: &str) -> Option<Self> {
        let raw = fragment.strip_prefix('#').unwrap_or(fragment);
        let path = Self::new(raw);
        if path.0.is_empty() {
            None
        } else {
            Some(path)
        }
    }

    /// The catalog root, `<prefix>/`.
    pub fn root(prefix: &str) -> Self {
        Self::new(&format!("{}/", prefix.trim_matches('/')))
    }

    /// Search path for a user-entered term, encoded like `encodeURIComponent`.
    pub fn search(prefix: &str, term: &str) -> Self {
        Self::new(&format!(
            "{}/search?searchTerm={}",
            prefix.trim_matches('/'),
            utf8_percent_encode(term, URI_COMPONENT)
        ))
    }

    /// Genre listing synthesized from a category term.
    pub fn genre(prefix: &str, term: &str) -> Self {
        Self::new(&format!("{}/genre/{}", prefix.trim_matches('/'), term))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Target for the HTTP request, always rooted at the site root.
    pub fn request_target(&self) -> String {
        format!("/{}", self.0)
    }

    /// Location fragment mirrored into the address bar.
    pub fn to_fragment(&self) -> String {
        format!("#{}", self.0)
    }

    /// Path segments below the catalog prefix.
    ///
    /// The prefix is removed only when it is a whole leading segment, then
    /// any slashes that follow it. `opds/author/1` yields `["author", "1"]`.
    pub fn segments(&self, prefix: &str) -> Vec<&str> {
        let prefix = prefix.trim_matches('/');
        let mut rest = self.0.as_str();
        if !prefix.is_empty() {
            if let Some(stripped) = rest.strip_prefix(prefix) {
                if stripped.is_empty() || stripped.starts_with('/') {
                    rest = stripped;
                }
            }
        }
        rest.trim_start_matches('/').split('/').collect()
    }
}

impl fmt::Display for CatalogPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CatalogPath {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}
