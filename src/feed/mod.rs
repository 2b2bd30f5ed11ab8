//! Catalog feed retrieval and interpretation.
//!
//! - [`model`] - parsed document types (`FeedDocument`, `Entry`, `Link`, ...)
//! - [`parser`] - quick-xml event parser for Atom/OPDS documents
//! - [`fetcher`] - HTTP retrieval of a catalog path with size and redirect limits
//! - [`extract`] - per-render field extraction: navigation links, search
//!   affordance, entry records
//!
//! # Example
//!
//! ```ignore
//! use folio::catalog::{CatalogPath, CatalogSettings};
//! use folio::feed::{extract, FeedFetcher};
//!
//! let fetched = fetcher.fetch(&CatalogPath::new("opds/")).await?;
//! let fields = extract(fetched.document, &CatalogSettings::default());
//! ```

mod extract;
mod fetcher;
pub mod model;
mod parser;

pub use extract::{
    catalog_link, extract, is_catalog_link, link_role, AuthorRef, CategoryRef, EntryFields,
    FeedFields, LinkRole, NavLink, RoleLink,
};
pub use fetcher::{FeedFetcher, FetchError, FetchedFeed};
pub use model::{Author, Category, Entry, FeedDocument, Link};
pub use parser::{parse_feed, ParseError};
