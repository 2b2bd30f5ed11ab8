use chrono::DateTime;

use super::{NavControl, Node, Row, View};
use crate::catalog::{CatalogPath, CatalogSettings, RenderStrategy};
use crate::feed::{EntryFields, FeedFields, LinkRole, NavLink};
use crate::util::decode_entities;

/// Entry ids starting with this mark the author biography block.
pub const AUTHOR_BIO_MARKER: &str = "tag:author:bio";

const UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

/// Renders the content region for `strategy`.
///
/// Always one row per entry, in document order.
pub fn render(strategy: RenderStrategy, fields: &FeedFields, settings: &CatalogSettings) -> View {
    let rows = fields
        .entries
        .iter()
        .map(|entry| match strategy {
            RenderStrategy::SimpleList => title_row(entry),
            RenderStrategy::TwoColumnList => two_column_row(entry),
            RenderStrategy::BookDetailList => book_row(entry, settings),
            RenderStrategy::AuthorOverview => author_row(entry),
        })
        .collect();

    View {
        strategy,
        class: strategy.style_class(),
        rows,
    }
}

/// Controls for the navigation region, in document order.
pub fn render_navigation(links: &[NavLink]) -> Vec<NavControl> {
    links
        .iter()
        .map(|link| NavControl {
            label: link.label.clone(),
            target: CatalogPath::from_href(&link.href),
        })
        .collect()
}

/// `updated` as shown in book records: RFC 3339 timestamps become
/// `YYYY-MM-DD HH:MM:SS +HH:MM` in their own offset, anything else is shown
/// as written.
pub fn format_updated(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(ts) => ts.format(UPDATED_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// The entry title as a navigation control, or plain text without a target.
fn title_node(entry: &EntryFields) -> Node {
    match &entry.catalog_link {
        Some(target) => Node::Nav(NavControl {
            label: entry.title.clone(),
            target: target.clone(),
        }),
        None => Node::Text {
            class: "title",
            text: entry.title.clone(),
        },
    }
}

fn title_row(entry: &EntryFields) -> Row {
    Row {
        entry_id: entry.id.clone(),
        class: "col1",
        nodes: vec![title_node(entry)],
    }
}

fn two_column_row(entry: &EntryFields) -> Row {
    Row {
        entry_id: entry.id.clone(),
        class: "row",
        nodes: vec![
            Node::Group {
                class: "col1",
                children: vec![title_node(entry)],
            },
            Node::Group {
                class: "col2",
                children: vec![Node::Text {
                    class: "content",
                    text: decode_entities(&entry.content).into_owned(),
                }],
            },
        ],
    }
}

fn book_row(entry: &EntryFields, settings: &CatalogSettings) -> Row {
    let mut nodes = vec![Node::Heading {
        text: entry.title.clone(),
    }];

    let authors: Vec<Node> = entry
        .authors
        .iter()
        .map(|author| match &author.target {
            Some(target) => Node::Nav(NavControl {
                label: author.name.clone(),
                target: target.clone(),
            }),
            None => Node::Text {
                class: "author",
                text: author.name.clone(),
            },
        })
        .collect();
    push_group(&mut nodes, "authors", authors);

    let mut links = Vec::new();
    let mut covers = Vec::new();
    for link in &entry.links {
        match link.role {
            LinkRole::Secondary => links.push(Node::Nav(NavControl {
                label: link.label.clone(),
                target: CatalogPath::from_href(&link.href),
            })),
            LinkRole::Direct => links.push(Node::External {
                label: link.label.clone(),
                href: link.href.clone(),
            }),
            LinkRole::Cover => covers.push(Node::Image {
                src: link.href.clone(),
            }),
        }
    }
    push_group(&mut nodes, "cover", covers);
    push_group(&mut nodes, "links", links);

    let genres: Vec<Node> = entry
        .categories
        .iter()
        .map(|category| match &category.path {
            Some(target) => Node::Nav(NavControl {
                label: category.label.clone(),
                target: target.clone(),
            }),
            None => Node::Text {
                class: "genre",
                text: category.label.clone(),
            },
        })
        .collect();
    push_group(&mut nodes, "genres", genres);

    if !entry.content.is_empty() {
        nodes.push(Node::RichText {
            html: decode_entities(&entry.content).into_owned(),
        });
    }

    if let Some(updated) = &entry.updated {
        nodes.push(Node::Text {
            class: "updated",
            text: format!("{}: {}", settings.strings.added, format_updated(updated)),
        });
    }

    nodes.push(Node::Separator);

    Row {
        entry_id: entry.id.clone(),
        class: "book",
        nodes,
    }
}

fn author_row(entry: &EntryFields) -> Row {
    if entry.id.starts_with(AUTHOR_BIO_MARKER) {
        return Row {
            entry_id: entry.id.clone(),
            class: "bio",
            nodes: vec![
                Node::Heading {
                    text: entry.title.clone(),
                },
                Node::RichText {
                    html: decode_entities(&entry.content).into_owned(),
                },
            ],
        };
    }
    title_row(entry)
}

fn push_group(nodes: &mut Vec<Node>, class: &'static str, children: Vec<Node>) {
    if !children.is_empty() {
        nodes.push(Node::Group { class, children });
    }
}
