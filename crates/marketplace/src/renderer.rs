//! Rendered-page retrieval capability.
//!
//! The agent core never talks HTTP or drives a browser directly; it asks a
//! [`PageRenderer`] for a page that has reached a stable loaded state and
//! extracts fields from the returned [`RenderedPage`] by CSS selector.

use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tokio::sync::Mutex;
use tracing::{debug, instrument};
use url::Url;

use crate::error::RenderError;
use crate::retry::Retry;

/// Default per-field wait budget for a page to reach readiness.
pub const DEFAULT_FIELD_WAIT: Duration = Duration::from_secs(10);

/// Polling attempts within one wait budget.
const POLL_ATTEMPTS: u32 = 3;
/// Base delay of the polling backoff schedule (doubles per attempt).
const POLL_BASE_DELAY: Duration = Duration::from_millis(500);

/// A page snapshot that has reached its ready state.
///
/// Field extraction parses the document on demand; `scraper`'s DOM is not
/// `Send`, so holding a parsed document across an await point is off the
/// table anyway.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    html: String,
}

impl RenderedPage {
    /// Wrap raw rendered HTML.
    #[must_use]
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    /// The raw HTML of the snapshot.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Whether at least one element matches `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Selector`] when `selector` is not valid CSS.
    pub fn has(&self, selector: &str) -> Result<bool, RenderError> {
        let sel = parse_selector(selector)?;
        let doc = Html::parse_document(&self.html);
        Ok(doc.select(&sel).next().is_some())
    }

    /// Trimmed text content of the first element matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Selector`] when `selector` is not valid CSS.
    pub fn first_text(&self, selector: &str) -> Result<Option<String>, RenderError> {
        let sel = parse_selector(selector)?;
        let doc = Html::parse_document(&self.html);
        Ok(doc.select(&sel).next().map(|el| {
            el.text().collect::<String>().trim().to_string()
        }))
    }

    /// Value of `attr` on the first element matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Selector`] when `selector` is not valid CSS.
    pub fn first_attr(&self, selector: &str, attr: &str) -> Result<Option<String>, RenderError> {
        let sel = parse_selector(selector)?;
        let doc = Html::parse_document(&self.html);
        Ok(doc
            .select(&sel)
            .next()
            .and_then(|el| el.value().attr(attr).map(ToString::to_string)))
    }

    /// Values of `attr` on every element matching `selector`, in page order.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Selector`] when `selector` is not valid CSS.
    pub fn all_attrs(&self, selector: &str, attr: &str) -> Result<Vec<String>, RenderError> {
        let sel = parse_selector(selector)?;
        let doc = Html::parse_document(&self.html);
        Ok(doc
            .select(&sel)
            .filter_map(|el| el.value().attr(attr).map(ToString::to_string))
            .collect())
    }
}

pub(crate) fn parse_selector(selector: &str) -> Result<Selector, RenderError> {
    Selector::parse(selector).map_err(|e| RenderError::Selector(e.to_string()))
}

/// Capability to load a URL and wait until it has rendered.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Load `url` and return the page once `ready_selector` matches, waiting
    /// no longer than `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Timeout`] when the selector never matches
    /// within the budget, [`RenderError::Gone`] for a 404, or the underlying
    /// transport error.
    async fn render(
        &self,
        url: &Url,
        ready_selector: &str,
        timeout: Duration,
    ) -> Result<RenderedPage, RenderError>;
}

/// Polling HTTP renderer.
///
/// Re-fetches the page with exponential backoff until the ready selector
/// matches, instead of sleeping a fixed interval and hoping. The rendering
/// session is single-tenant: one async mutex serializes all renders, so
/// concurrent requests cannot corrupt each other's page state.
pub struct HttpRenderer {
    client: reqwest::Client,
    gate: Mutex<()>,
}

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 scout/0.1";

impl HttpRenderer {
    /// Create a renderer with its own HTTP client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be constructed, which indicates a
    /// broken TLS backend rather than anything recoverable.
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            gate: Mutex::new(()),
        }
    }

    async fn fetch(&self, url: &Url) -> Result<RenderedPage, RenderError> {
        let response = self.client.get(url.clone()).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(RenderError::Gone {
                url: url.to_string(),
            });
        }
        let body = response.error_for_status()?.text().await?;
        Ok(RenderedPage::new(body))
    }
}

impl Default for HttpRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    #[instrument(skip(self), fields(url = %url))]
    async fn render(
        &self,
        url: &Url,
        ready_selector: &str,
        timeout: Duration,
    ) -> Result<RenderedPage, RenderError> {
        let _session = self.gate.lock().await;

        let poll = Retry::new(POLL_ATTEMPTS, POLL_BASE_DELAY);
        let attempt_loop = poll.run_when(
            move || async move {
                let page = self.fetch(url).await?;
                if page.has(ready_selector)? {
                    debug!(selector = ready_selector, "page ready");
                    Ok(page)
                } else {
                    Err(RenderError::NotReady {
                        selector: ready_selector.to_string(),
                    })
                }
            },
            // Pages that are gone or selectors that cannot parse will not
            // improve with another fetch.
            |err| !matches!(err, RenderError::Gone { .. } | RenderError::Selector(_)),
        );

        match tokio::time::timeout(timeout, attempt_loop).await {
            Ok(Ok(page)) => Ok(page),
            Ok(Err(RenderError::NotReady { selector })) => Err(RenderError::Timeout {
                selector,
                waited_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(RenderError::Timeout {
                selector: ready_selector.to_string(),
                waited_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <h1 data-testid="name">Nintendo Switch</h1>
        <div data-testid="gallery">
            <img src="https://img.example/1.jpg">
            <img src="https://img.example/2.jpg">
        </div>
    </body></html>"#;

    #[test]
    fn test_has_matching_selector() {
        let page = RenderedPage::new(PAGE);
        assert!(page.has(r#"[data-testid="name"]"#).expect("valid selector"));
        assert!(!page.has(r#"[data-testid="price"]"#).expect("valid selector"));
    }

    #[test]
    fn test_first_text_trims() {
        let page = RenderedPage::new("<p id=\"x\">  hello  </p>");
        let text = page.first_text("#x").expect("valid selector");
        assert_eq!(text.as_deref(), Some("hello"));
    }

    #[test]
    fn test_first_attr_and_all_attrs() {
        let page = RenderedPage::new(PAGE);
        let first = page
            .first_attr(r#"[data-testid="gallery"] img"#, "src")
            .expect("valid selector");
        assert_eq!(first.as_deref(), Some("https://img.example/1.jpg"));

        let all = page
            .all_attrs(r#"[data-testid="gallery"] img"#, "src")
            .expect("valid selector");
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        let page = RenderedPage::new(PAGE);
        assert!(matches!(page.has("[[["), Err(RenderError::Selector(_))));
    }

    #[test]
    fn test_http_renderer_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpRenderer>();
    }
}
