//! End-to-end navigation tests: fetch, classify, extract, render, history.
//!
//! Each test starts its own mock catalog server and drives a `Navigator`
//! through the public API the way a host would.

use folio::catalog::{CatalogPath, CatalogSettings, RenderStrategy};
use folio::feed::{FeedFetcher, FetchError};
use folio::nav::{Activation, History, NavError, NavRequest, Navigator};
use folio::view::{Node, Target};
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CATALOG_TYPE: &str = "application/atom+xml;profile=opds-catalog";

fn feed(title: &str, searchable: bool, body: &str) -> String {
    let search = if searchable {
        r#"<link href="/opds/search?searchTerm={searchTerms}" rel="search" type="application/atom+xml"/>"#
    } else {
        ""
    };
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <id>tag:feed</id>
  <title>{title}</title>
  <link href="/opds/" rel="start" type="{CATALOG_TYPE}"/>
  {search}
  {body}
</feed>"#
    )
}

fn nav_entry(id: &str, title: &str, href: &str) -> String {
    format!(
        r#"<entry><id>{id}</id><title>{title}</title><link href="{href}" type="{CATALOG_TYPE}"/></entry>"#
    )
}

async fn mount(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn navigator(server: &MockServer, location: Option<&str>) -> Navigator {
    let fetcher = FeedFetcher::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        Duration::from_secs(5),
    );
    let history = location.map_or_else(History::new, History::with_location);
    Navigator::new(fetcher, Arc::new(CatalogSettings::default()), history)
}

// ============================================================================
// Browsing
// ============================================================================

#[tokio::test]
async fn test_browse_root_to_author_and_back() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/opds/",
        feed(
            "Library",
            true,
            &[
                nav_entry("tag:root:author", "By author", "/opds/author"),
                nav_entry("tag:root:time", "By time", "/opds/time"),
            ]
            .concat(),
        ),
    )
    .await;
    mount(
        &server,
        "/opds/author/12/lem/stanislaw",
        feed(
            "Stanisław Lem",
            false,
            &[
                r#"<entry><id>tag:author:bio:12</id><title>About the author</title>
<content type="text">&lt;p&gt;Polish writer of &lt;b&gt;science fiction&lt;/b&gt;.&lt;/p&gt;</content></entry>"#
                    .to_string(),
                nav_entry("tag:author:books", "All books", "/opds/author/12/lem/stanislaw/time"),
                nav_entry(
                    "tag:author:sequences",
                    "Series",
                    "/opds/author/12/lem/stanislaw/sequences",
                ),
            ]
            .concat(),
        ),
    )
    .await;

    let mut nav = navigator(&server, None);

    let display = nav.initial_load().await.unwrap();
    assert_eq!(display.content.strategy, RenderStrategy::SimpleList);
    assert_eq!(display.content.rows.len(), 2);
    assert!(display.search_visible);
    assert_eq!(nav.history().location(), None);

    let display = nav
        .navigate_to(CatalogPath::new("/opds/author/12/lem/stanislaw"), false)
        .await
        .unwrap();
    assert_eq!(display.content.strategy, RenderStrategy::AuthorOverview);
    assert_eq!(display.content.class, "author_info");
    assert!(!display.search_visible);

    let bio = &display.content.rows[0];
    assert_eq!(bio.class, "bio");
    assert_eq!(
        bio.nodes[1],
        Node::RichText {
            html: "<p>Polish writer of <b>science fiction</b>.</p>".into()
        }
    );
    assert_eq!(
        display.content.targets()[1],
        Target::Navigate(CatalogPath::new("opds/author/12/lem/stanislaw/sequences"))
    );
    assert_eq!(
        nav.history().location(),
        Some("#opds/author/12/lem/stanislaw")
    );

    let request = nav.go_back().unwrap();
    assert!(request.from_history);
    assert_eq!(request.path, CatalogPath::new("opds/"));
    let display = nav.navigate(request).await.unwrap();
    assert_eq!(display.title, "Library");
    assert_eq!(nav.history().location(), None);
    assert!(nav.history().can_go_forward());
}

#[tokio::test]
async fn test_initial_location_is_loaded_without_push() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/opds/sequence/7",
        feed(
            "Foundation",
            false,
            r#"<entry><id>b1</id><title>Foundation</title>
<author><name>Isaac Asimov</name><uri>/opds/author/3/asimov/isaac</uri></author>
<category term="sf" label="Science fiction"/>
<link href="/dl/foundation.epub" rel="http://opds-spec.org/acquisition/open-access" type="application/epub+zip"/>
<link href="/covers/foundation.jpg" rel="x-stanza-cover-image" type="image/jpeg"/>
<updated>2024-03-01T10:15:00+00:00</updated>
<content type="text">First of the series</content></entry>"#,
        ),
    )
    .await;

    let mut nav = navigator(&server, Some("#/opds/sequence/7"));
    let display = nav.initial_load().await.unwrap();

    assert_eq!(display.content.strategy, RenderStrategy::BookDetailList);
    assert_eq!(
        display.content.targets(),
        vec![
            Target::Navigate(CatalogPath::new("opds/author/3/asimov/isaac")),
            Target::Open("/covers/foundation.jpg".into()),
            Target::Open("/dl/foundation.epub".into()),
            Target::Navigate(CatalogPath::new("opds/genre/sf")),
        ]
    );
    let row = &display.content.rows[0];
    assert!(row.nodes.contains(&Node::Text {
        class: "updated",
        text: "Added: 2024-03-01 10:15:00 +00:00".into()
    }));
    assert_eq!(nav.history().location(), Some("#opds/sequence/7"));
    assert!(!nav.history().can_go_back());
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_search_round_trip() {
    let server = MockServer::start().await;
    mount(&server, "/opds/", feed("Library", true, "")).await;
    Mock::given(method("GET"))
        .and(path("/opds/search"))
        .and(query_param("searchTerm", "война и мир"))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed(
            "Results",
            true,
            &nav_entry("r1", "Books", "/opds/search/books/война"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let mut nav = navigator(&server, None);
    nav.initial_load().await.unwrap();

    assert!(matches!(
        nav.search_submitted("   ").await,
        Err(NavError::EmptyQuery)
    ));
    assert_eq!(nav.display().unwrap().title, "Library");

    let display = nav.search_submitted("война и мир").await.unwrap();
    assert_eq!(display.title, "Results");
    assert_eq!(
        nav.history().current_path().unwrap().as_str(),
        "opds/search?searchTerm=%D0%B2%D0%BE%D0%B9%D0%BD%D0%B0%20%D0%B8%20%D0%BC%D0%B8%D1%80"
    );
}

// ============================================================================
// Failures and external links
// ============================================================================

#[tokio::test]
async fn test_failed_navigation_keeps_everything() {
    let server = MockServer::start().await;
    mount(&server, "/opds/", feed("Library", false, "")).await;
    Mock::given(method("GET"))
        .and(path("/opds/broken"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;
    mount(&server, "/opds/garbage", "<html><body>oops</body></html>".into()).await;

    let mut nav = navigator(&server, None);
    nav.initial_load().await.unwrap();
    let before = nav.display().cloned();
    let history_before = nav.history().clone();

    for target in ["opds/broken", "opds/garbage"] {
        let err = nav
            .navigate_to(CatalogPath::new(target), false)
            .await
            .unwrap_err();
        assert_eq!(
            err.notice(&nav.settings().strings),
            "Failed to fetch OPDS data"
        );
        assert_eq!(nav.display().cloned(), before);
        assert_eq!(nav.history(), &history_before);
    }

    // Still usable afterwards.
    assert!(nav.reload().await.is_ok());
}

#[tokio::test]
async fn test_unreachable_catalog_keeps_everything() {
    let server = MockServer::start().await;
    mount(&server, "/opds/", feed("Library", false, "")).await;

    let mut nav = navigator(&server, None);
    nav.initial_load().await.unwrap();
    let before = nav.display().cloned();
    let history_before = nav.history().clone();

    // Nothing listens on a port that was just released
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let unreachable = FeedFetcher::with_client(
        reqwest::Client::new(),
        Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap(),
        Duration::from_secs(5),
    );

    let request = NavRequest::new(CatalogPath::new("opds/time"), false);
    let result = unreachable.fetch(&request.path).await;
    let err = nav.complete(&request, result).map(|_| ()).unwrap_err();
    assert!(matches!(err, NavError::Fetch(FetchError::Network(_))), "{err:?}");
    assert_eq!(
        err.notice(&nav.settings().strings),
        "Failed to fetch OPDS data"
    );
    assert_eq!(nav.display().cloned(), before);
    assert_eq!(nav.history(), &history_before);

    // A navigator whose catalog is down never shows anything, and the
    // location it was opened at is kept.
    let mut offline = Navigator::new(
        unreachable,
        Arc::new(CatalogSettings::default()),
        History::with_location("#opds/new"),
    );
    assert!(matches!(
        offline.initial_load().await.map(|_| ()),
        Err(NavError::Fetch(FetchError::Network(_)))
    ));
    assert!(offline.display().is_none());
    assert_eq!(offline.history().location(), Some("#opds/new"));
}

#[tokio::test]
async fn test_external_activation_resolves_against_origin() {
    let server = MockServer::start().await;
    mount(&server, "/opds/", feed("Library", false, "")).await;

    let mut nav = navigator(&server, None);
    nav.initial_load().await.unwrap();

    let url = nav
        .activate(&Target::Open("/dl/book.fb2.zip".into()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(url.as_str(), format!("{}/dl/book.fb2.zip", server.uri()));
    assert_eq!(nav.history().location(), None);

    match nav.dispatch(&Target::Navigate(CatalogPath::new("opds/time"))).unwrap() {
        Activation::Navigate(request) => assert!(!request.from_history),
        Activation::Open(_) => panic!("catalog targets navigate"),
    }
}
