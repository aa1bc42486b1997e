//! Anthropic Messages API client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::ScoutConfig;

use super::error::{ApiErrorResponse, LlmError};
use super::types::{ChatRequest, ChatResponse, Message, Tool, ToolChoice};
use super::LlmChat;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Messages API client.
///
/// Cheap to clone; the HTTP client and model name live behind an `Arc`.
#[derive(Clone)]
pub struct ClaudeClient {
    inner: Arc<ClaudeClientInner>,
}

struct ClaudeClientInner {
    client: reqwest::Client,
    model: String,
}

impl ClaudeClient {
    /// Create a new client from the agent configuration.
    ///
    /// # Panics
    ///
    /// Panics if the API key contains invalid header characters.
    #[must_use]
    pub fn new(config: &ScoutConfig) -> Self {
        let api_key = config.api_key.expose_secret();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key).expect("Invalid API key for header"),
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(ClaudeClientInner {
                client,
                model: config.model.clone(),
            }),
        }
    }

    /// Handle a response, mapping error statuses to typed errors.
    async fn handle_response(response: reqwest::Response) -> Result<ChatResponse, LlmError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| LlmError::Parse(format!("Failed to parse response: {e}")))
        } else {
            Err(Self::handle_error_status(status, response).await)
        }
    }

    /// Handle an error status code.
    async fn handle_error_status(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> LlmError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return LlmError::RateLimited(retry_after);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return LlmError::Unauthorized("Invalid API key".to_string());
        }

        match response.text().await {
            Ok(body) => {
                if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                    LlmError::Api {
                        error_type: api_error.error.error_type,
                        message: api_error.error.message,
                    }
                } else {
                    LlmError::Api {
                        error_type: "unknown".to_string(),
                        message: body,
                    }
                }
            }
            Err(e) => LlmError::Http(e),
        }
    }
}

#[async_trait]
impl LlmChat for ClaudeClient {
    #[instrument(skip(self, messages, tools), fields(model = %self.inner.model))]
    async fn chat(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
        tools: Option<Vec<Tool>>,
        tool_choice: Option<ToolChoice>,
    ) -> Result<ChatResponse, LlmError> {
        let request = ChatRequest {
            model: self.inner.model.clone(),
            max_tokens: DEFAULT_MAX_TOKENS,
            messages,
            system,
            tools,
            tool_choice,
        };

        let response = self
            .inner
            .client
            .post(ANTHROPIC_API_URL)
            .json(&request)
            .send()
            .await?;

        Self::handle_response(response).await
    }
}
