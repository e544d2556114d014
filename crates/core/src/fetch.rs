//! Page fetching from URLs, files, and stdin.
//!
//! This module provides functions for retrieving forum HTML from HTTP/HTTPS
//! URLs, saved pages on disk, and standard input, plus the [`PageSource`]
//! seam a [`Screen`](crate::screen::Screen) loads through.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
#[cfg(feature = "fetch")]
use std::time::Duration;
#[cfg(feature = "fetch")]
use url::Url;

#[cfg(feature = "fetch")]
use reqwest::Client;

#[cfg(feature = "fetch")]
use crate::parse::Document;
use crate::{BbsError, Result};

/// HTTP client configuration for fetching forum pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
    /// Extra request headers, e.g. a session cookie.
    pub headers: HashMap<String, String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: "Mozilla/5.0 (compatible; BandBBS-Client/1.0)".to_string(),
            headers: HashMap::new(),
        }
    }
}

/// Something a screen can load page HTML from.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Returns the body of the page at `url`.
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

/// Fetches pages over HTTP with one reusable client.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    config: FetchConfig,
}

#[cfg(feature = "fetch")]
impl HttpSource {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = build_client(&config)?;
        Ok(Self { client, config })
    }
}

#[cfg(feature = "fetch")]
#[async_trait]
impl PageSource for HttpSource {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        fetch_with_client(&self.client, url, &self.config).await
    }
}

/// Serves the same HTML for every URL.
///
/// Used to scrape saved pages offline.
#[derive(Debug, Clone)]
pub struct StaticSource {
    html: String,
}

impl StaticSource {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }
}

#[async_trait]
impl PageSource for StaticSource {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        tracing::debug!(url, bytes = self.html.len(), "serving static page");
        Ok(self.html.clone())
    }
}

/// Fetches HTML content from a URL.
///
/// Performs a GET request and returns the body as text. Redirects follow
/// reqwest's default policy. Any non-2xx status is an error.
#[cfg(feature = "fetch")]
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let client = build_client(config)?;
    fetch_with_client(&client, url, config).await
}

/// Fetches a page and parses it, remembering the URL as the document base.
#[cfg(feature = "fetch")]
pub async fn fetch_document(url: &str, config: &FetchConfig) -> Result<Document> {
    let html = fetch_url(url, config).await?;
    let base = Url::parse(url).map_err(|e| BbsError::InvalidUrl(e.to_string()))?;
    Document::parse_with_base(&html, base)
}

#[cfg(feature = "fetch")]
fn build_client(config: &FetchConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(BbsError::HttpError)
}

#[cfg(feature = "fetch")]
async fn fetch_with_client(client: &Client, url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = Url::parse(url).map_err(|e| BbsError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed_url.scheme(), "http" | "https") {
        return Err(BbsError::InvalidUrl(format!(
            "URL must use http:// or https://, got {}",
            parsed_url.scheme()
        )));
    }

    tracing::debug!(url, "fetching page");

    let mut request = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .header("Accept-Language", "zh-CN,zh;q=0.9,en;q=0.8");

    for (name, value) in &config.headers {
        request = request.header(name.as_str(), value.as_str());
    }

    let response = request.send().await.map_err(|e| {
        if e.is_timeout() { BbsError::Timeout { timeout: config.timeout } } else { BbsError::HttpError(e) }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(BbsError::HttpStatus { status: status.as_u16(), url: url.to_string() });
    }

    let content = response.text().await?;
    tracing::debug!(url, bytes = content.len(), "fetched page");

    Ok(content)
}

/// Reads HTML content from a local file, such as a saved forum page.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(BbsError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(BbsError::from)
    }
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(BbsError::from)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 30);
        assert!(config.user_agent.contains("BandBBS"));
        assert!(config.headers.is_empty());
    }

    #[cfg(feature = "fetch")]
    #[tokio::test]
    async fn test_fetch_url_invalid() {
        let result = fetch_url("not-a-url", &FetchConfig::default()).await;
        assert!(matches!(result, Err(BbsError::InvalidUrl(_))));
    }

    #[cfg(feature = "fetch")]
    #[tokio::test]
    async fn test_fetch_url_rejects_other_schemes() {
        let result = fetch_url("ftp://www.bandbbs.cn/", &FetchConfig::default()).await;
        assert!(matches!(result, Err(BbsError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_static_source_ignores_url() {
        let source = StaticSource::new("<h2>General</h2>");
        assert_eq!(source.fetch_page("https://a/").await.unwrap(), "<h2>General</h2>");
        assert_eq!(source.fetch_page("https://b/").await.unwrap(), "<h2>General</h2>");
    }

    #[test]
    fn test_fetch_file_not_found() {
        let result = fetch_file("/nonexistent/path/file.html");
        assert!(matches!(result, Err(BbsError::FileNotFound(_))));
    }

    #[test]
    fn test_fetch_file_reads_saved_page() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("home.html");
        fs::write(&path, "<html></html>").unwrap();

        assert_eq!(fetch_file(path.to_str().unwrap()).unwrap(), "<html></html>");
    }
}
