//! Types for the Anthropic Messages API.

use serde::{Deserialize, Serialize};

/// A message in a conversation with the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender ("user" or "assistant").
    pub role: String,
    /// The content of the message.
    pub content: MessageContent,
}

impl Message {
    /// A plain-text user message.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Text(text.into()),
        }
    }

    /// A plain-text assistant message.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: MessageContent::Text(text.into()),
        }
    }
}

/// Content of a message - either plain text or a list of content blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Simple text content.
    Text(String),
    /// Multiple content blocks (for tool use).
    Blocks(Vec<ContentBlock>),
}

/// A content block within a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    /// Text content.
    #[serde(rename = "text")]
    Text {
        /// The text content.
        text: String,
    },
    /// Tool use request from the model.
    #[serde(rename = "tool_use")]
    ToolUse {
        /// Unique ID for this tool use.
        id: String,
        /// Name of the tool to use.
        name: String,
        /// Input parameters for the tool.
        input: serde_json::Value,
    },
    /// Result of a tool invocation.
    #[serde(rename = "tool_result")]
    ToolResult {
        /// ID of the tool use this is responding to.
        tool_use_id: String,
        /// Result content from the tool.
        content: String,
        /// Whether the tool execution failed.
        #[serde(skip_serializing_if = "Option::is_none")]
        is_error: Option<bool>,
    },
}

/// A tool definition for the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    /// Name of the tool.
    pub name: String,
    /// Description of what the tool does.
    pub description: String,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: serde_json::Value,
}

/// Constraint on how the model may answer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ToolChoice {
    /// The model decides whether to call a tool.
    #[serde(rename = "auto")]
    Auto,
    /// The model must call the named tool.
    #[serde(rename = "tool")]
    Tool {
        /// Name of the forced tool.
        name: String,
    },
}

/// Request body for the Messages API.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model to use (e.g., "claude-sonnet-4-20250514").
    pub model: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Conversation messages.
    pub messages: Vec<Message>,
    /// System prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Available tools.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    /// Forced/auto tool selection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
}

/// Response from the Messages API.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Unique response ID.
    pub id: String,
    /// Model that generated the response.
    pub model: String,
    /// Reason the response stopped.
    pub stop_reason: Option<StopReason>,
    /// Response content blocks.
    pub content: Vec<ContentBlock>,
    /// Token usage information.
    pub usage: Usage,
}

impl ChatResponse {
    /// Input payload of the first `tool_use` block invoking `tool_name`.
    #[must_use]
    pub fn tool_input(&self, tool_name: &str) -> Option<&serde_json::Value> {
        self.content.iter().find_map(|block| match block {
            ContentBlock::ToolUse { name, input, .. } if name == tool_name => Some(input),
            _ => None,
        })
    }

    /// Concatenated text blocks, `None` when the response carries no text.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n");
        if text.trim().is_empty() { None } else { Some(text) }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of response.
    EndTurn,
    /// Max tokens reached.
    MaxTokens,
    /// Stop sequence encountered.
    StopSequence,
    /// Tool use requested.
    ToolUse,
}

/// Token usage information.
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    /// Number of input tokens.
    pub input_tokens: u32,
    /// Number of output tokens.
    pub output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(content: Vec<ContentBlock>) -> ChatResponse {
        ChatResponse {
            id: "msg_test".to_string(),
            model: "test-model".to_string(),
            stop_reason: Some(StopReason::EndTurn),
            content,
            usage: Usage {
                input_tokens: 1,
                output_tokens: 1,
            },
        }
    }

    #[test]
    fn test_tool_choice_serialization() {
        let forced = ToolChoice::Tool {
            name: "plan_search".to_string(),
        };
        let json = serde_json::to_string(&forced).expect("serialize");
        assert_eq!(json, r#"{"type":"tool","name":"plan_search"}"#);

        let auto = serde_json::to_string(&ToolChoice::Auto).expect("serialize");
        assert_eq!(auto, r#"{"type":"auto"}"#);
    }

    #[test]
    fn test_tool_input_finds_named_tool() {
        let resp = response(vec![
            ContentBlock::Text {
                text: "picking now".to_string(),
            },
            ContentBlock::ToolUse {
                id: "tu_1".to_string(),
                name: "plan_search".to_string(),
                input: serde_json::json!({"keywords": ["iPhone"]}),
            },
        ]);
        let input = resp.tool_input("plan_search").expect("tool input");
        assert_eq!(input["keywords"][0], "iPhone");
        assert!(resp.tool_input("pick_top_items").is_none());
    }

    #[test]
    fn test_text_concatenates_blocks() {
        let resp = response(vec![
            ContentBlock::Text {
                text: "line one".to_string(),
            },
            ContentBlock::Text {
                text: "line two".to_string(),
            },
        ]);
        assert_eq!(resp.text().expect("text"), "line one\nline two");
    }

    #[test]
    fn test_text_none_when_only_tool_use() {
        let resp = response(vec![ContentBlock::ToolUse {
            id: "tu_1".to_string(),
            name: "plan_search".to_string(),
            input: serde_json::json!({}),
        }]);
        assert!(resp.text().is_none());
    }

    #[test]
    fn test_stop_reason_deserialization() {
        let reason: StopReason = serde_json::from_str("\"tool_use\"").expect("deserialize");
        assert_eq!(reason, StopReason::ToolUse);
    }

    #[test]
    fn test_message_content_text_serialization() {
        let msg = Message::user("Hello");
        let json = serde_json::to_string(&msg).expect("serialize");
        assert_eq!(json, r#"{"role":"user","content":"Hello"}"#);
    }
}
