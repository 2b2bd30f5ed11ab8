use thiserror::Error;
use url::Url;

/// Errors returned when a link is not safe to hand to the system opener.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,
}

/// Validates a URL before opening it in the system browser.
///
/// SEC-004: Only `http`/`https` URLs with a host are accepted, so a catalog
/// cannot make us launch `file://` or custom-scheme handlers. Local hosts are
/// allowed since self-hosted catalogs commonly serve downloads from them.
///
/// # Examples
///
/// ```
/// use folio::util::validate_url_for_open;
///
/// assert!(validate_url_for_open("http://localhost:8000/dl/1.fb2.zip").is_ok());
/// assert!(validate_url_for_open("file:///etc/passwd").is_err());
/// assert!(validate_url_for_open("javascript:alert(1)").is_err());
/// ```
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate_url_for_open("https://books.example/b/1").is_ok());
        assert!(validate_url_for_open("http://127.0.0.1:8000/read/1").is_ok());
    }

    #[test]
    fn test_rejects_other_schemes() {
        for url in ["file:///tmp/x", "ftp://host/x", "mailto:a@b.c", "data:text/html,hi"] {
            assert!(
                matches!(
                    validate_url_for_open(url),
                    Err(UrlValidationError::UnsupportedScheme(_))
                ),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_unparseable() {
        assert!(matches!(
            validate_url_for_open("/relative/only"),
            Err(UrlValidationError::InvalidUrl(_))
        ));
    }
}
