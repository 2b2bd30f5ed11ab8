use crate::catalog::CatalogPath;
use crate::config::Config;
use crate::feed::model::FeedDocument;
use crate::feed::parser::{parse_feed, ParseError};
use futures::StreamExt;
use reqwest::redirect::Policy;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use thiserror::Error;
use url::Url;

const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB
const MAX_REDIRECTS: usize = 3;

/// Errors that can occur while fetching a catalog feed.
///
/// Callers treat every variant the same way (a failed navigation); the
/// variant only matters for logs.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Response was incomplete (received fewer bytes than Content-Length)
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
    /// The request target could not be resolved against the base URL
    #[error("Invalid request target {target}: {source}")]
    InvalidTarget {
        target: String,
        source: url::ParseError,
    },
    /// Body is not a catalog feed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

/// A successfully fetched and parsed feed.
#[derive(Debug, Clone)]
pub struct FetchedFeed {
    /// The normalized path that was requested.
    pub path: CatalogPath,
    pub document: FeedDocument,
}

/// HTTP basic credentials.
#[derive(Clone)]
struct Credentials {
    username: String,
    password: Option<SecretString>,
}

/// Fetches catalog feeds from one origin.
///
/// Cheap to clone: the underlying `reqwest::Client` is reference counted, so
/// hosts can hand a copy to every spawned fetch.
#[derive(Clone)]
pub struct FeedFetcher {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    credentials: Option<Credentials>,
}

impl std::fmt::Debug for FeedFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedFetcher")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field(
                "credentials",
                &self.credentials.as_ref().map(|c| c.username.as_str()),
            )
            .finish()
    }
}

/// Redirect policy with loop detection and limited hops.
///
/// - Limits redirects to 3 hops maximum
/// - Detects redirect loops (same URL appearing twice in chain)
///
/// `previous()` includes the originally requested URL, so it holds one more
/// entry than the number of hops already followed.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() > MAX_REDIRECTS {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev.as_str() == url.as_str()) {
            return attempt.error("Redirect loop detected");
        }

        tracing::debug!(
            from = %attempt.previous().last().map(|u| u.as_str()).unwrap_or("initial"),
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

impl FeedFetcher {
    /// Builds a fetcher from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Fails if `base_url` is not an absolute URL or the HTTP client cannot
    /// be constructed.
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.base_url).map_err(|source| FetchError::InvalidTarget {
            target: config.base_url.clone(),
            source,
        })?;
        let timeout = Duration::from_secs(config.request_timeout_secs);

        let client = reqwest::Client::builder()
            .redirect(create_redirect_policy())
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .timeout(timeout)
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let fetcher = Self::with_client(client, base_url, timeout);
        Ok(match &config.username {
            Some(username) => fetcher.with_basic_auth(
                username,
                config.password.clone().map(SecretString::from),
            ),
            None => fetcher,
        })
    }

    /// Builds a fetcher around an existing client.
    pub fn with_client(client: reqwest::Client, base_url: Url, timeout: Duration) -> Self {
        Self {
            client,
            base_url,
            timeout,
            credentials: None,
        }
    }

    /// Attaches HTTP basic credentials to every request.
    pub fn with_basic_auth(mut self, username: &str, password: Option<SecretString>) -> Self {
        self.credentials = Some(Credentials {
            username: username.to_string(),
            password,
        });
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for a catalog path: `/<normalized-path>` on the base origin.
    pub fn request_url(&self, path: &CatalogPath) -> Result<Url, FetchError> {
        let target = path.request_target();
        self.base_url
            .join(&target)
            .map_err(|source| FetchError::InvalidTarget { target, source })
    }

    /// Resolves a link href from a feed against the base URL.
    pub fn resolve(&self, href: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(href)
            .map_err(|source| FetchError::InvalidTarget {
                target: href.to_string(),
                source,
            })
    }

    /// Fetches and parses the feed at `path`.
    ///
    /// A single attempt: failures are reported, never retried.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Network`] - Connection or TLS errors
    /// - [`FetchError::Timeout`] - Request exceeded the configured timeout
    /// - [`FetchError::HttpStatus`] - Non-2xx HTTP response
    /// - [`FetchError::ResponseTooLarge`] - Response exceeded 10MB
    /// - [`FetchError::Parse`] - Body is not a well-formed `<feed>` document
    pub async fn fetch(&self, path: &CatalogPath) -> Result<FetchedFeed, FetchError> {
        let url = self.request_url(path)?;
        tracing::debug!(path = %path, url = %url, "Fetching catalog feed");

        let bytes = tokio::time::timeout(self.timeout, self.fetch_bytes(url))
            .await
            .map_err(|_| FetchError::Timeout)??;

        let document = parse_feed(&bytes)?;
        tracing::debug!(
            path = %path,
            entries = document.entries.len(),
            "Parsed catalog feed"
        );

        Ok(FetchedFeed {
            path: path.clone(),
            document,
        })
    }

    async fn fetch_bytes(&self, url: Url) -> Result<Vec<u8>, FetchError> {
        let mut request = self.client.get(url);
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(
                &credentials.username,
                credentials.password.as_ref().map(|p| p.expose_secret()),
            );
        }

        let response = request.send().await.map_err(map_request_error)?;

        // EDGE-002: Validate HTTP status before reading the body
        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        read_limited_bytes(response, MAX_FEED_SIZE).await
    }
}

fn map_request_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(e)
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    let expected_length = response.content_length();

    // Fast path: check Content-Length header
    if let Some(len) = expected_length {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_request_error)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    // EDGE-005: A truncated body would otherwise surface as a confusing parse error
    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}
