use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use url::Url;

use super::History;
use crate::catalog::{classify, CatalogPath, CatalogSettings, UiStrings};
use crate::feed::{extract, FeedFetcher, FetchError, FetchedFeed};
use crate::view::{render, render_navigation, NavControl, Target, View};

/// Errors surfaced to the user by a navigation attempt.
///
/// Neither variant changes what is displayed or the history.
#[derive(Debug, Error)]
pub enum NavError {
    /// The feed could not be fetched or parsed.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    /// A search was submitted without a term.
    #[error("empty search query")]
    EmptyQuery,
}

impl NavError {
    /// Blocking notice shown to the user.
    pub fn notice<'a>(&self, strings: &'a UiStrings) -> &'a str {
        match self {
            NavError::Fetch(_) => &strings.fetch_failed,
            NavError::EmptyQuery => &strings.empty_query,
        }
    }
}

/// Everything currently shown, replaced wholesale by each successful render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Display {
    pub title: String,
    /// The path this display was rendered from.
    pub path: CatalogPath,
    pub content: View,
    pub navigation: Vec<NavControl>,
    pub search_visible: bool,
}

/// A navigation waiting for its fetch to complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavRequest {
    pub path: CatalogPath,
    /// Set when the history already holds this location, so nothing is pushed.
    pub from_history: bool,
}

impl NavRequest {
    pub fn new(path: CatalogPath, from_history: bool) -> Self {
        Self { path, from_history }
    }
}

/// Outcome of activating a rendered control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// An in-catalog navigation to start.
    Navigate(NavRequest),
    /// An absolute URL for the host to open externally. History is untouched.
    Open(Url),
}

/// Drives fetch → classify → extract → render and keeps the history in step
/// with what is displayed.
///
/// Hosts that await each navigation use the async event methods. Hosts that
/// run fetches concurrently build a [`NavRequest`], fetch with a clone of
/// [`Navigator::fetcher`], and apply each result with
/// [`Navigator::complete`] as it arrives; the last completion applied wins.
#[derive(Debug)]
pub struct Navigator {
    fetcher: FeedFetcher,
    settings: Arc<CatalogSettings>,
    history: History,
    display: Option<Display>,
}

impl Navigator {
    pub fn new(fetcher: FeedFetcher, settings: Arc<CatalogSettings>, history: History) -> Self {
        Self {
            fetcher,
            settings,
            history,
            display: None,
        }
    }

    pub fn fetcher(&self) -> &FeedFetcher {
        &self.fetcher
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// What is on screen; `None` until the first successful render.
    pub fn display(&self) -> Option<&Display> {
        self.display.as_ref()
    }

    pub fn root(&self) -> CatalogPath {
        CatalogPath::root(&self.settings.prefix)
    }

    // ========================================================================
    // Request builders
    // ========================================================================

    /// The path named by the location, or the catalog root.
    fn location_request(&self) -> NavRequest {
        let path = self.history.current_path().unwrap_or_else(|| self.root());
        NavRequest::new(path, true)
    }

    /// Page load: show whatever the location names, without pushing.
    pub fn initial_request(&self) -> NavRequest {
        self.location_request()
    }

    /// The location changed under us (back/forward).
    pub fn popped_request(&self) -> NavRequest {
        self.location_request()
    }

    /// A submitted search term.
    ///
    /// # Errors
    ///
    /// [`NavError::EmptyQuery`] when the term is blank.
    pub fn search_request(&self, term: &str) -> Result<NavRequest, NavError> {
        if term.trim().is_empty() {
            return Err(NavError::EmptyQuery);
        }
        Ok(NavRequest::new(
            CatalogPath::search(&self.settings.prefix, term),
            false,
        ))
    }

    /// Re-fetch whatever the location names.
    ///
    /// After a failed back/forward the location is ahead of the display, so
    /// the location is the one to render.
    pub fn reload_request(&self) -> NavRequest {
        self.location_request()
    }

    /// Single dispatch point for rendered controls.
    ///
    /// # Errors
    ///
    /// Fails when an external href cannot be resolved to a URL.
    pub fn dispatch(&self, target: &Target) -> Result<Activation, NavError> {
        match target {
            Target::Navigate(path) => Ok(Activation::Navigate(NavRequest::new(path.clone(), false))),
            Target::Open(href) => Ok(Activation::Open(self.fetcher.resolve(href)?)),
        }
    }

    /// Steps the history back, returning the navigation that follows.
    pub fn go_back(&mut self) -> Option<NavRequest> {
        self.history.back().then(|| self.popped_request())
    }

    /// Steps the history forward, returning the navigation that follows.
    pub fn go_forward(&mut self) -> Option<NavRequest> {
        self.history.forward().then(|| self.popped_request())
    }

    // ========================================================================
    // State transition
    // ========================================================================

    /// Applies a finished fetch.
    ///
    /// On success the display is replaced and, unless the request came from
    /// history, the fetched path is pushed. On failure nothing changes.
    ///
    /// # Errors
    ///
    /// [`NavError::Fetch`] carrying the fetch failure.
    pub fn complete(
        &mut self,
        request: &NavRequest,
        result: Result<FetchedFeed, FetchError>,
    ) -> Result<&Display, NavError> {
        let fetched = match result {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::warn!(path = %request.path, error = %e, "Navigation failed");
                return Err(NavError::Fetch(e));
            }
        };

        let strategy = classify(&fetched.path, &self.settings.prefix);
        let fields = extract(fetched.document, &self.settings);
        let content = render(strategy, &fields, &self.settings);
        let navigation = render_navigation(&fields.navigation);

        tracing::info!(
            path = %fetched.path,
            strategy = ?strategy,
            entries = content.rows.len(),
            from_history = request.from_history,
            "Rendered catalog view"
        );

        if !request.from_history {
            self.history.push(&fetched.path);
        }

        Ok(&*self.display.insert(Display {
            title: fields.title,
            path: fetched.path,
            content,
            navigation,
            search_visible: fields.has_search,
        }))
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Fetches `request.path` and applies the result.
    pub async fn navigate(&mut self, request: NavRequest) -> Result<&Display, NavError> {
        let result = self.fetcher.fetch(&request.path).await;
        self.complete(&request, result)
    }

    /// NavigateTo(path, from_history).
    pub async fn navigate_to(
        &mut self,
        path: CatalogPath,
        from_history: bool,
    ) -> Result<&Display, NavError> {
        self.navigate(NavRequest::new(path, from_history)).await
    }

    pub async fn initial_load(&mut self) -> Result<&Display, NavError> {
        let request = self.initial_request();
        self.navigate(request).await
    }

    pub async fn history_popped(&mut self) -> Result<&Display, NavError> {
        let request = self.popped_request();
        self.navigate(request).await
    }

    pub async fn search_submitted(&mut self, term: &str) -> Result<&Display, NavError> {
        let request = self.search_request(term)?;
        self.navigate(request).await
    }

    pub async fn reload(&mut self) -> Result<&Display, NavError> {
        let request = self.reload_request();
        self.navigate(request).await
    }

    /// Activates a rendered control.
    ///
    /// Navigation targets are fetched and applied; external targets are
    /// resolved and returned for the host to open.
    pub async fn activate(&mut self, target: &Target) -> Result<Option<Url>, NavError> {
        match self.dispatch(target)? {
            Activation::Navigate(request) => {
                self.navigate(request).await?;
                Ok(None)
            }
            Activation::Open(url) => Ok(Some(url)),
        }
    }
}
