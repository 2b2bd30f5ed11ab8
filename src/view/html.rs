//! HTML adapter: materializes a view tree as markup.
//!
//! All text and attribute values are escaped. `RichText` is the one node
//! inserted verbatim, since it already holds decoded markup.

use std::fmt::Write;

use super::{NavControl, Node, View};
use crate::nav::Display;
use crate::util::escape_html;

/// The content region, `<div id="content" class="...">`.
pub fn to_html(view: &View) -> String {
    let mut out = String::new();
    let _ = write!(out, r#"<div id="content" class="{}">"#, view.class);
    for row in &view.rows {
        let _ = write!(
            out,
            r#"<div class="{}" data-entry-id="{}">"#,
            row.class,
            escape_html(&row.entry_id)
        );
        for node in &row.nodes {
            write_node(&mut out, node);
        }
        out.push_str("</div>");
    }
    out.push_str("</div>");
    out
}

/// The navigation region: one anchor per control, separated by spaces.
pub fn navigation_html(controls: &[NavControl]) -> String {
    let anchors: Vec<String> = controls.iter().map(nav_anchor).collect();
    format!(
        r#"<div id="navigation-section">{}</div>"#,
        anchors.join(" ")
    )
}

/// A standalone page for a displayed view.
pub fn document_html(display: &Display) -> String {
    let title = escape_html(&display.title);
    let search_style = if display.search_visible {
        ""
    } else {
        r#" style="display: none""#
    };
    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n",
            "<h1 id=\"title\">{title}</h1>\n",
            "{navigation}\n",
            "<div id=\"search-section\"{search_style}><input id=\"search-input\" type=\"search\"></div>\n",
            "{content}\n",
            "</body>\n</html>\n"
        ),
        title = title,
        navigation = navigation_html(&display.navigation),
        search_style = search_style,
        content = to_html(&display.content),
    )
}

fn nav_anchor(control: &NavControl) -> String {
    let path = escape_html(control.target.as_str());
    format!(
        r##"<a href="#{path}" data-path="{path}">{}</a>"##,
        escape_html(&control.label)
    )
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Heading { text } => {
            let _ = write!(out, "<h2>{}</h2>", escape_html(text));
        }
        Node::Text { class, text } => {
            let _ = write!(out, r#"<div class="{}">{}</div>"#, class, escape_html(text));
        }
        Node::RichText { html } => {
            let _ = write!(out, "<p>{html}</p>");
        }
        Node::Nav(control) => out.push_str(&nav_anchor(control)),
        Node::External { label, href } => {
            let _ = write!(
                out,
                r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
                escape_html(href),
                escape_html(label)
            );
        }
        Node::Image { src } => {
            let _ = write!(out, r#"<img src="{}" alt="">"#, escape_html(src));
        }
        Node::Group { class, children } => {
            let _ = write!(out, r#"<div class="{class}">"#);
            for child in children {
                write_node(out, child);
            }
            out.push_str("</div>");
        }
        Node::Separator => out.push_str("<hr>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogPath, RenderStrategy};
    use crate::view::Row;
    use pretty_assertions::assert_eq;

    fn control(label: &str, path: &str) -> NavControl {
        NavControl {
            label: label.into(),
            target: CatalogPath::new(path),
        }
    }

    #[test]
    fn test_simple_view_html() {
        let view = View {
            strategy: RenderStrategy::SimpleList,
            class: "rowlist_single",
            rows: vec![Row {
                entry_id: "tag:root:time".into(),
                class: "col1",
                nodes: vec![Node::Nav(control("By <time>", "/opds/time"))],
            }],
        };
        assert_eq!(
            to_html(&view),
            concat!(
                r#"<div id="content" class="rowlist_single">"#,
                r#"<div class="col1" data-entry-id="tag:root:time">"#,
                r##"<a href="#opds/time" data-path="opds/time">By &lt;time&gt;</a>"##,
                "</div></div>"
            )
        );
    }

    #[test]
    fn test_text_is_escaped_rich_text_is_not() {
        let view = View {
            strategy: RenderStrategy::BookDetailList,
            class: "booklist",
            rows: vec![Row {
                entry_id: "b".into(),
                class: "book",
                nodes: vec![
                    Node::Text {
                        class: "content",
                        text: "<b>x</b>".into(),
                    },
                    Node::RichText {
                        html: "<b>x</b>".into(),
                    },
                    Node::External {
                        label: "fb2".into(),
                        href: "/dl/a?x=1&y=2".into(),
                    },
                    Node::Separator,
                ],
            }],
        };
        let html = to_html(&view);
        assert!(html.contains(r#"<div class="content">&lt;b&gt;x&lt;/b&gt;</div>"#));
        assert!(html.contains("<p><b>x</b></p>"));
        assert!(html.contains(r#"<a href="/dl/a?x=1&amp;y=2" target="_blank" rel="noopener">fb2</a>"#));
        assert!(html.ends_with("<hr></div></div>"));
    }

    #[test]
    fn test_navigation_html_separates_with_spaces() {
        let html = navigation_html(&[control("HOME", "/opds/"), control("NEXT", "opds/x?page=2")]);
        assert_eq!(
            html,
            concat!(
                r#"<div id="navigation-section">"#,
                r##"<a href="#opds/" data-path="opds/">HOME</a> "##,
                r##"<a href="#opds/x?page=2" data-path="opds/x?page=2">NEXT</a>"##,
                "</div>"
            )
        );
    }

    #[test]
    fn test_document_hides_search_section() {
        let display = Display {
            title: "Catalog & more".into(),
            path: CatalogPath::new("opds/"),
            content: View {
                strategy: RenderStrategy::SimpleList,
                class: "rowlist_single",
                rows: Vec::new(),
            },
            navigation: Vec::new(),
            search_visible: false,
        };
        let html = document_html(&display);
        assert!(html.contains("<title>Catalog &amp; more</title>"));
        assert!(html.contains(r#"<div id="search-section" style="display: none">"#));

        let visible = Display {
            search_visible: true,
            ..display
        };
        assert!(document_html(&visible).contains(r#"<div id="search-section"><input"#));
    }
}
