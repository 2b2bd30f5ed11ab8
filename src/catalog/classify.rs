use serde::Serialize;

use super::CatalogPath;

/// View-construction strategy chosen for a catalog path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderStrategy {
    /// One title per row.
    SimpleList,
    /// Title plus the entry content as a second column.
    TwoColumnList,
    /// Full book records.
    BookDetailList,
    /// Author biography followed by links to the author's listings.
    AuthorOverview,
}

impl RenderStrategy {
    /// Style class set on the content region.
    pub fn style_class(self) -> &'static str {
        match self {
            Self::SimpleList => "rowlist_single",
            Self::TwoColumnList => "rowlist",
            Self::BookDetailList => "booklist",
            Self::AuthorOverview => "author_info",
        }
    }
}

/// Assign a render strategy to a path.
///
/// Total over all inputs: anything the table does not recognize is a
/// simple list. Author pages look like `author/<a>/<b>/<id>`; deeper paths
/// are the author's book listings, except `.../sequences`.
pub fn classify(path: &CatalogPath, prefix: &str) -> RenderStrategy {
    let segments = path.segments(prefix);
    match segments.as_slice() {
        ["author", _, _, _] => RenderStrategy::AuthorOverview,
        ["author", _, _, _, "sequences", ..] => RenderStrategy::TwoColumnList,
        ["author", ..] => RenderStrategy::BookDetailList,
        ["sequence" | "time" | "genre" | "random-books", ..] => RenderStrategy::BookDetailList,
        ["rnd", "genre", ..] => RenderStrategy::BookDetailList,
        ["rnd", ..] => RenderStrategy::SimpleList,
        ["search", sub, ..] if sub.starts_with("books") => RenderStrategy::BookDetailList,
        _ => RenderStrategy::SimpleList,
    }
}
