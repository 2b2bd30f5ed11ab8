//! Declarative view tree produced by the renderers.
//!
//! Renderers never touch a UI. They describe the content region as a
//! [`View`], and a host adapter ([`html`], or the terminal host in `ui`)
//! materializes it. Navigation controls carry their target path as data;
//! activating one is handed back to the navigator.

pub mod html;
mod render;

pub use render::{format_updated, render, render_navigation, AUTHOR_BIO_MARKER};

use crate::catalog::{CatalogPath, RenderStrategy};
use serde::Serialize;

/// The content region: one row per entry, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub strategy: RenderStrategy,
    /// Style class of the region, e.g. `rowlist_single`.
    pub class: &'static str,
    pub rows: Vec<Row>,
}

impl View {
    /// Every navigable or openable control in display order.
    pub fn targets(&self) -> Vec<Target> {
        let mut targets = Vec::new();
        for row in &self.rows {
            collect_targets(&row.nodes, &mut targets);
        }
        targets
    }
}

fn collect_targets(nodes: &[Node], out: &mut Vec<Target>) {
    for node in nodes {
        match node {
            Node::Nav(control) => out.push(Target::Navigate(control.target.clone())),
            Node::External { href, .. } => out.push(Target::Open(href.clone())),
            Node::Image { src } => out.push(Target::Open(src.clone())),
            Node::Group { children, .. } => collect_targets(children, out),
            _ => {}
        }
    }
}

/// One entry's rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub entry_id: String,
    pub class: &'static str,
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Node {
    Heading { text: String },
    /// Plain text; never interpreted as markup.
    Text { class: &'static str, text: String },
    /// Decoded markup, inserted as interpreted content.
    RichText { html: String },
    /// In-catalog navigation.
    Nav(NavControl),
    /// Link opened outside the catalog; never recorded in history.
    External { label: String, href: String },
    Image { src: String },
    Group { class: &'static str, children: Vec<Node> },
    Separator,
}

/// A rendered control that navigates to `target` when activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavControl {
    pub label: String,
    pub target: CatalogPath,
}

/// What activating a control asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Navigate(CatalogPath),
    /// Absolute or site-relative href to open externally.
    Open(String),
}
