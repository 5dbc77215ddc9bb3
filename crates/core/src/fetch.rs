//! Page fetching from URLs, files, and stdin.
//!
//! [`fetch_url`] performs one HTTP GET per call with no caching and no
//! retries. The response body is consumed inside the call, so the caller only
//! ever holds the text or the parsed [`Document`].

use std::fs;
use std::path::PathBuf;
#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::{Client, header::CONTENT_TYPE};
use url::Url;

#[cfg(feature = "fetch")]
use crate::parse::Document;
use crate::{FetchError, Result};

/// HTTP client configuration for fetching forum pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: "Mozilla/5.0 (compatible; replytree/0.1)".to_string() }
    }
}

/// Checks that `url` is absolute and uses http or https.
pub fn validate_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(FetchError::InvalidUrl(format!(
            "unsupported scheme '{}' (expected http:// or https://)",
            scheme
        ))),
    }
}

/// Returns true when a Content-Type header value names an HTML document.
#[cfg(feature = "fetch")]
fn is_html_content_type(value: &str) -> bool {
    let mime = value.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

/// Fetches HTML content from a URL.
///
/// Fails with [`FetchError::HttpStatus`] for non-2xx responses and with
/// [`FetchError::NotHtml`] when the server declares a non-HTML content type.
/// A response without a Content-Type header is accepted as HTML.
#[cfg(feature = "fetch")]
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = validate_url(url)?;

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(FetchError::HttpError)?;

    tracing::debug!(url = %parsed_url, timeout = config.timeout, "fetching page");

    let response = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout { timeout: config.timeout }
            } else {
                FetchError::HttpError(e)
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus { status: status.as_u16(), url: url.to_string() });
    }

    if let Some(value) = response.headers().get(CONTENT_TYPE) {
        let content_type = value.to_str().unwrap_or_default().to_string();
        if !is_html_content_type(&content_type) {
            return Err(FetchError::NotHtml { content_type });
        }
    }

    let content = response.text().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::Timeout { timeout: config.timeout }
        } else {
            FetchError::HttpError(e)
        }
    })?;

    tracing::debug!(url, bytes = content.len(), "fetched page");

    Ok(content)
}

/// Fetches a URL and parses the body into a [`Document`].
///
/// The document's base URL is the requested URL.
#[cfg(feature = "fetch")]
pub async fn fetch_document(url: &str, config: &FetchConfig) -> Result<Document> {
    let html = fetch_url(url, config).await?;
    Document::parse_with_url(&html, url)
}

/// Reads HTML content from a local file.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(FetchError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(FetchError::from)
    }
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(FetchError::from)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 30);
        assert!(config.user_agent.contains("replytree"));
    }

    #[cfg(feature = "fetch")]
    #[tokio::test]
    async fn test_fetch_url_invalid() {
        let config = FetchConfig::default();
        let result = fetch_url("not-a-url", &config).await;
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }

    #[cfg(feature = "fetch")]
    #[tokio::test]
    async fn test_fetch_url_rejects_non_http_scheme() {
        let config = FetchConfig::default();
        let result = fetch_url("ftp://www.v2ex.com/", &config).await;
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }

    #[test]
    fn test_fetch_file_not_found() {
        let result = fetch_file("/nonexistent/path/file.html");
        assert!(matches!(result, Err(FetchError::FileNotFound(_))));
    }

    #[test]
    fn test_fetch_file_not_utf8() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("latin1.html");
        std::fs::write(&path, [0x3c, 0x70, 0x3e, 0xe9, 0xff]).unwrap();

        let err = fetch_file(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, FetchError::IoError(_)));
        assert!(err.to_string().starts_with("I/O error"));
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://www.v2ex.com/?tab=all").is_ok());
        assert!(validate_url("http://localhost:8080/t/1").is_ok());
        assert!(validate_url("www.v2ex.com").is_err());
        assert!(validate_url("file:///etc/passwd").is_err());
    }

    #[cfg(feature = "fetch")]
    #[test]
    fn test_html_content_types() {
        assert!(is_html_content_type("text/html"));
        assert!(is_html_content_type("text/html; charset=utf-8"));
        assert!(is_html_content_type("Text/HTML;charset=UTF-8"));
        assert!(is_html_content_type("application/xhtml+xml"));
        assert!(!is_html_content_type("application/json"));
        assert!(!is_html_content_type("image/png"));
    }
}
