//! Catalog addressing: paths, render-strategy classification, and the
//! lookup tables shared by the navigator and renderers.
//!
//! - [`path`] - `CatalogPath` normalization, request targets, location fragments
//! - [`classify`] - path → [`RenderStrategy`] dispatch table
//! - [`settings`] - catalog prefix, navigation label table, UI strings

mod classify;
mod path;
mod settings;

pub use classify::{classify, RenderStrategy};
pub use path::CatalogPath;
pub use settings::{CatalogSettings, LinkLabels, UiStrings};
