//! Error types for the marketplace retrieval layer.

use thiserror::Error;

use scout_core::ItemId;

/// Errors from the rendered-page retrieval capability.
#[derive(Debug, Error)]
pub enum RenderError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The page returned 404 - the resource no longer exists.
    #[error("page gone: {url}")]
    Gone {
        /// URL that returned 404.
        url: String,
    },

    /// The ready selector never matched within the wait budget.
    #[error("element `{selector}` did not render within {waited_ms}ms")]
    Timeout {
        /// Selector that was waited on.
        selector: String,
        /// Total wait budget that elapsed.
        waited_ms: u64,
    },

    /// The ready selector does not match yet (retried internally; only
    /// escapes when attempts are exhausted before the budget elapses).
    #[error("element `{selector}` not present yet")]
    NotReady {
        /// Selector that did not match.
        selector: String,
    },

    /// A CSS selector failed to parse.
    #[error("invalid selector: {0}")]
    Selector(String),
}

/// Errors from retrieving marketplace data.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The rendering collaborator failed.
    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    /// The listing no longer exists (delisted or sold and removed).
    #[error("listing {0} no longer exists")]
    Delisted(ItemId),

    /// A required field never rendered on the detail page.
    #[error("listing {id} is missing required field `{field}`")]
    MissingField {
        /// The listing being fetched.
        id: ItemId,
        /// The field that never rendered.
        field: &'static str,
    },

    /// Every selected listing failed to enrich; there is nothing to
    /// recommend, so the batch as a whole fails.
    #[error("all {attempted} selected listings failed to enrich")]
    AllItemsFailed {
        /// How many detail fetches were attempted.
        attempted: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieval_error_display() {
        let err = RetrievalError::Delisted(ItemId::new("m42"));
        assert_eq!(err.to_string(), "listing m42 no longer exists");

        let err = RetrievalError::MissingField {
            id: ItemId::new("m42"),
            field: "price",
        };
        assert_eq!(err.to_string(), "listing m42 is missing required field `price`");
    }

    #[test]
    fn test_render_error_display() {
        let err = RenderError::Timeout {
            selector: "[data-testid=\"name\"]".to_string(),
            waited_ms: 10_000,
        };
        assert_eq!(
            err.to_string(),
            "element `[data-testid=\"name\"]` did not render within 10000ms"
        );
    }
}
