use std::collections::HashMap;
use std::time::Duration;

use argus_core::ScrapeError;
use url::Url;

/// Supplies raw HTML for a URL when the reader navigates.
pub trait PageLoader {
    fn load(&self, url: &str) -> Result<String, ScrapeError>;
}

/// In-memory page set for tests and fixtures.
///
/// Keys are normalized through [`Url`] where possible, so
/// `https://shop.test` and `https://shop.test/` refer to the same page.
#[derive(Debug, Clone, Default)]
pub struct StaticPages {
    pages: HashMap<String, String>,
}

impl StaticPages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page, replacing any previous content for the URL.
    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(normalize(url), html.to_string());
        self
    }
}

fn normalize(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| url.to_string())
}

impl PageLoader for StaticPages {
    fn load(&self, url: &str) -> Result<String, ScrapeError> {
        self.pages
            .get(&normalize(url))
            .cloned()
            .ok_or_else(|| ScrapeError::Navigation(format!("no page registered for {url}")))
    }
}

/// Blocking HTTP page loader with configurable User-Agent and timeout.
#[derive(Clone)]
pub struct HttpLoader {
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpLoader {
    pub fn new() -> Result<Self, ScrapeError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, ScrapeError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("Argus/0.2 (entity scraper)")
            .timeout(timeout)
            .build()
            .map_err(|e| ScrapeError::Navigation(e.to_string()))?;
        Ok(Self {
            client,
            timeout_secs: timeout.as_secs(),
        })
    }
}

impl PageLoader for HttpLoader {
    fn load(&self, url: &str) -> Result<String, ScrapeError> {
        tracing::info!("fetching {url}");
        let response = self.client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                ScrapeError::Navigation(format!(
                    "request to {url} timed out after {}s",
                    self.timeout_secs
                ))
            } else if e.is_connect() {
                ScrapeError::Navigation(format!("connection to {url} failed: {e}"))
            } else {
                ScrapeError::Navigation(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Navigation(format!(
                "HTTP {} for {url}",
                status.as_u16()
            )));
        }

        response
            .text()
            .map_err(|e| ScrapeError::Navigation(format!("failed to read response body: {e}")))
    }
}
