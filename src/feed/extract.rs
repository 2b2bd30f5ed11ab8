use serde::Serialize;

use super::model::{Entry, FeedDocument, Link};
use crate::catalog::{CatalogPath, CatalogSettings};

/// Media type that marks a link as catalog navigation.
const OPDS_CATALOG_TYPE: &str = "application/atom+xml;profile=opds-catalog";
/// Any Atom media type also counts as catalog navigation.
const ATOM_TYPE_PREFIX: &str = "application/atom";

const REL_SEARCH: &str = "search";
const REL_RELATED: &str = "related";
const REL_ALTERNATE: &str = "alternate";
const REL_OPEN_ACCESS: &str = "http://opds-spec.org/acquisition/open-access";
const REL_STANZA_COVER: &str = "x-stanza-cover-image";

/// Feed-level data used by the navigation region and the renderers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedFields {
    pub title: String,
    /// Feed-level links other than `search`, in document order.
    pub navigation: Vec<NavLink>,
    /// Whether the feed advertises a search link.
    pub has_search: bool,
    pub entries: Vec<EntryFields>,
}

/// A feed-level navigation link with its resolved display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub rel: Option<String>,
    pub href: String,
    pub label: String,
}

/// Fixed-shape record for one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntryFields {
    pub id: String,
    pub title: String,
    /// Content as written in the document, still entity-encoded.
    pub content: String,
    pub updated: Option<String>,
    /// Where activating the entry title navigates to.
    pub catalog_link: Option<CatalogPath>,
    /// Links with a recognized relation, in document order.
    pub links: Vec<RoleLink>,
    pub categories: Vec<CategoryRef>,
    pub authors: Vec<AuthorRef>,
}

/// How a book record presents one of its links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkRole {
    /// `related`: another catalog listing (author, sequence).
    Secondary,
    /// `open-access` download or `alternate` reader page, opened outside the catalog.
    Direct,
    /// Cover image source.
    Cover,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleLink {
    pub role: LinkRole,
    pub href: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRef {
    pub label: String,
    pub term: String,
    /// Synthesized genre listing; `None` when the term is empty.
    pub path: Option<CatalogPath>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorRef {
    pub name: String,
    /// The author `uri`, when present.
    pub target: Option<CatalogPath>,
}

/// Extracts everything a render cycle needs from a parsed document.
///
/// Consumes the document: nothing from it outlives the render cycle.
pub fn extract(doc: FeedDocument, settings: &CatalogSettings) -> FeedFields {
    let has_search = doc
        .links
        .iter()
        .any(|l| l.rel.as_deref() == Some(REL_SEARCH));

    let navigation = doc
        .links
        .into_iter()
        .filter(|l| l.rel.as_deref() != Some(REL_SEARCH))
        .map(|l| NavLink {
            label: settings.labels.label_for(l.rel.as_deref(), &l.href),
            rel: l.rel,
            href: l.href,
        })
        .collect();

    let entries = doc
        .entries
        .into_iter()
        .map(|entry| extract_entry(entry, &settings.prefix))
        .collect();

    FeedFields {
        title: doc.title,
        navigation,
        has_search,
        entries,
    }
}

fn extract_entry(entry: Entry, prefix: &str) -> EntryFields {
    let catalog_link = catalog_link(&entry.links).map(|l| CatalogPath::from_href(&l.href));

    let links = entry
        .links
        .iter()
        .filter_map(|link| {
            let role = link_role(link.rel.as_deref())?;
            let label = link
                .title
                .clone()
                .or_else(|| link.media_type.clone())
                .unwrap_or_else(|| link.href.clone());
            Some(RoleLink {
                role,
                href: link.href.clone(),
                label,
            })
        })
        .collect();

    let categories = entry
        .categories
        .into_iter()
        .map(|c| CategoryRef {
            path: (!c.term.is_empty()).then(|| CatalogPath::genre(prefix, &c.term)),
            label: c.label,
            term: c.term,
        })
        .collect();

    let authors = entry
        .authors
        .into_iter()
        .map(|a| AuthorRef {
            target: a
                .uri
                .as_deref()
                .filter(|uri| !uri.trim().is_empty())
                .map(CatalogPath::from_href),
            name: a.name,
        })
        .collect();

    EntryFields {
        id: entry.id,
        title: entry.title,
        content: entry.content,
        updated: entry.updated,
        catalog_link,
        links,
        categories,
        authors,
    }
}

/// Whether a link leads to another catalog feed.
pub fn is_catalog_link(link: &Link) -> bool {
    let atom = link
        .media_type
        .as_deref()
        .is_some_and(|t| t == OPDS_CATALOG_TYPE || t.starts_with(ATOM_TYPE_PREFIX));
    atom && link.rel.as_deref() != Some(REL_SEARCH)
}

/// The entry's catalog navigation link.
///
/// When several links qualify, the last one wins.
pub fn catalog_link(links: &[Link]) -> Option<&Link> {
    links.iter().rev().find(|l| is_catalog_link(l))
}

/// Role of an entry link, or `None` for relations book records ignore.
pub fn link_role(rel: Option<&str>) -> Option<LinkRole> {
    match rel? {
        REL_RELATED => Some(LinkRole::Secondary),
        REL_OPEN_ACCESS | REL_ALTERNATE => Some(LinkRole::Direct),
        REL_STANZA_COVER => Some(LinkRole::Cover),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::model::{Author, Category};
    use pretty_assertions::assert_eq;

    fn link(rel: Option<&str>, href: &str, media_type: Option<&str>) -> Link {
        Link {
            rel: rel.map(str::to_string),
            href: href.to_string(),
            media_type: media_type.map(str::to_string),
            title: None,
        }
    }

    fn doc_with_links(links: Vec<Link>) -> FeedDocument {
        FeedDocument {
            title: "Catalog".into(),
            links,
            entries: Vec::new(),
        }
    }

    #[test]
    fn test_search_link_sets_affordance_and_is_not_navigation() {
        let doc = doc_with_links(vec![
            link(Some("start"), "/opds/", Some(OPDS_CATALOG_TYPE)),
            link(Some("search"), "/opds/search?searchTerm={searchTerms}", None),
            link(Some("next"), "/opds/time?page=2", None),
        ]);
        let fields = extract(doc, &CatalogSettings::default());
        assert!(fields.has_search);
        let labels: Vec<_> = fields.navigation.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["HOME", "NEXT"]);
    }

    #[test]
    fn test_no_search_link() {
        let doc = doc_with_links(vec![link(Some("self"), "/opds/", None)]);
        let fields = extract(doc, &CatalogSettings::default());
        assert!(!fields.has_search);
        assert_eq!(fields.navigation[0].label, "RELOAD");
    }

    #[test]
    fn test_navigation_label_fallbacks() {
        let doc = doc_with_links(vec![
            link(Some("http://opds-spec.org/sort/new"), "/opds/new", None),
            link(None, "/opds/bare", None),
        ]);
        let fields = extract(doc, &CatalogSettings::default());
        assert_eq!(fields.navigation[0].label, "http://opds-spec.org/sort/new");
        assert_eq!(fields.navigation[1].label, "/opds/bare");
    }

    #[test]
    fn test_catalog_link_last_wins() {
        let links = vec![
            link(Some("subsection"), "/opds/first", Some(OPDS_CATALOG_TYPE)),
            link(Some("alternate"), "/read/1", Some("text/html")),
            link(Some("subsection"), "/opds/second", Some("application/atom+xml")),
        ];
        assert_eq!(catalog_link(&links).map(|l| l.href.as_str()), Some("/opds/second"));
    }

    #[test]
    fn test_catalog_link_skips_search_and_untyped() {
        let links = vec![
            link(Some("subsection"), "/opds/real", Some(OPDS_CATALOG_TYPE)),
            link(Some("search"), "/opds/search", Some("application/atom+xml")),
            link(Some("related"), "/opds/untyped", None),
        ];
        assert_eq!(catalog_link(&links).map(|l| l.href.as_str()), Some("/opds/real"));
        assert!(catalog_link(&[link(None, "/x", Some("text/html"))]).is_none());
    }

    #[test]
    fn test_link_roles() {
        assert_eq!(link_role(Some("related")), Some(LinkRole::Secondary));
        assert_eq!(link_role(Some(REL_OPEN_ACCESS)), Some(LinkRole::Direct));
        assert_eq!(link_role(Some("alternate")), Some(LinkRole::Direct));
        assert_eq!(link_role(Some("x-stanza-cover-image")), Some(LinkRole::Cover));
        assert_eq!(link_role(Some("http://opds-spec.org/image")), None);
        assert_eq!(link_role(None), None);
    }

    #[test]
    fn test_entry_fields() {
        let mut related = link(Some("related"), "/opds/author/1/2/12", Some("application/atom+xml"));
        related.title = Some("Tolkien".into());
        let doc = FeedDocument {
            title: "Books".into(),
            links: Vec::new(),
            entries: vec![Entry {
                title: "The Hobbit".into(),
                id: "tag:book:1".into(),
                updated: Some("2024-04-30T08:15:00+00:00".into()),
                content: "&lt;p&gt;x&lt;/p&gt;".into(),
                links: vec![
                    related,
                    link(Some(REL_OPEN_ACCESS), "/dl/1.fb2.zip", Some("application/fb2+zip")),
                    link(Some("x-stanza-cover-image"), "/cover/1.jpg", Some("image/jpeg")),
                    link(Some("http://opds-spec.org/image/thumbnail"), "/thumb/1.jpg", None),
                ],
                categories: vec![
                    Category {
                        label: "Fantasy".into(),
                        term: "sf_fantasy".into(),
                    },
                    Category {
                        label: "Loose".into(),
                        term: String::new(),
                    },
                ],
                authors: vec![
                    Author {
                        name: "J. R. R. Tolkien".into(),
                        uri: Some("/opds/author/1/2/12".into()),
                    },
                    Author {
                        name: "Anonymous".into(),
                        uri: None,
                    },
                ],
            }],
        };

        let fields = extract(doc, &CatalogSettings::default());
        let entry = &fields.entries[0];

        // The related link is the last Atom-typed one
        assert_eq!(entry.catalog_link, Some(CatalogPath::new("opds/author/1/2/12")));
        assert_eq!(entry.content, "&lt;p&gt;x&lt;/p&gt;");
        assert_eq!(
            entry.links,
            vec![
                RoleLink {
                    role: LinkRole::Secondary,
                    href: "/opds/author/1/2/12".into(),
                    label: "Tolkien".into(),
                },
                RoleLink {
                    role: LinkRole::Direct,
                    href: "/dl/1.fb2.zip".into(),
                    label: "application/fb2+zip".into(),
                },
                RoleLink {
                    role: LinkRole::Cover,
                    href: "/cover/1.jpg".into(),
                    label: "image/jpeg".into(),
                },
            ]
        );
        assert_eq!(
            entry.categories[0].path,
            Some(CatalogPath::new("opds/genre/sf_fantasy"))
        );
        assert_eq!(entry.categories[1].path, None);
        assert_eq!(
            entry.authors[0].target,
            Some(CatalogPath::new("opds/author/1/2/12"))
        );
        assert_eq!(entry.authors[1].target, None);
    }
}
