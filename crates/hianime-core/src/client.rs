//! HTTP client for hianime
//!
//! Thin wrapper around `reqwest` that sets the site's default headers,
//! resolves paths against the configured base origin and maps non-success
//! statuses to typed errors. Every request is attempted exactly once.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, ORIGIN, REFERER};
use serde::de::DeserializeOwned;

use crate::error::{HianimeError, Result};

/// Desktop browser User-Agent used for page and AJAX requests
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Mobile browser User-Agent handed to players along with each stream
pub const PLAYBACK_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 10; K) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";

/// Known domains serving the same site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SiteDomain {
    /// https://hianime.to
    #[default]
    Hianime,
    /// https://aniwatchtv.to
    Aniwatch,
}

impl SiteDomain {
    /// Base origin of the domain, without trailing slash
    pub fn base_url(self) -> &'static str {
        match self {
            SiteDomain::Hianime => "https://hianime.to",
            SiteDomain::Aniwatch => "https://aniwatchtv.to",
        }
    }
}

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Site origin all relative paths resolve against (default: https://hianime.to)
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// User-Agent for page requests (default: desktop Chrome)
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_domain(SiteDomain::default())
    }
}

impl ClientConfig {
    /// Default configuration pointed at one of the known domains
    pub fn for_domain(domain: SiteDomain) -> Self {
        Self {
            base_url: domain.base_url().to_string(),
            timeout_secs: 30,
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Default configuration pointed at a custom origin (mirrors, test servers)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// HTTP client wrapper for hianime
///
/// Handles all HTTP communication, including:
/// - Proper headers (User-Agent, Accept-Language)
/// - Status checking (404 and other non-2xx responses become errors)
/// - Referer/Origin headers for third-party embed pages
pub struct HianimeClient {
    client: reqwest::Client,
    base_url: String,
}

impl HianimeClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(HianimeError::InvalidUrl(format!(
                "base URL must be absolute: {:?}",
                config.base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent)
            .cookie_store(true)
            .default_headers(headers)
            .build()
            .map_err(HianimeError::HttpError)?;

        Ok(Self { client, base_url })
    }

    /// Site origin used for relative paths and anti-hotlinking headers
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch a page from the site
    ///
    /// # Arguments
    /// * `path` - Path on the site (e.g., "/search?keyword=naruto")
    ///
    /// # Errors
    /// - `HttpError` - Network errors
    /// - `NotFound` - Server returned 404
    /// - `Status` - Any other non-success status
    pub async fn fetch(&self, path: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        self.fetch_url(&url).await
    }

    /// Fetch an absolute URL
    pub async fn fetch_url(&self, url: &str) -> Result<String> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(HianimeError::HttpError)?;
        Self::read_body(response, url).await
    }

    /// Fetch an AJAX endpoint and decode its JSON body
    ///
    /// # Errors
    /// Besides the `fetch` errors, `JsonError` when the body is not the expected JSON.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!("GET {} (json)", url);
        let response = self
            .client
            .get(url)
            .header("X-Requested-With", "XMLHttpRequest")
            .header(REFERER, self.base_url.as_str())
            .send()
            .await
            .map_err(HianimeError::HttpError)?;
        let body = Self::read_body(response, url).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch a third-party embed page
    ///
    /// Embed hosts reject requests that don't look like they come from the
    /// site, so Referer and Origin are set to the base origin.
    pub async fn fetch_embed(&self, url: &str) -> Result<String> {
        tracing::debug!("GET {} (embed)", url);
        let response = self
            .client
            .get(url)
            .header(REFERER, self.base_url.as_str())
            .header(ORIGIN, self.base_url.as_str())
            .send()
            .await
            .map_err(HianimeError::HttpError)?;
        Self::read_body(response, url).await
    }

    async fn read_body(response: reqwest::Response, url: &str) -> Result<String> {
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(HianimeError::NotFound(url.to_string()));
        }

        if !status.is_success() {
            return Err(HianimeError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(HianimeError::HttpError)
    }
}
