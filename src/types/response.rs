use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::Usage;

/// Role the service assigns to the messages it generates.
pub const ASSISTANT_ROLE: &str = "assistant";

/// Lifecycle status of a response.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    /// Generation finished.
    Completed,
    /// Generation stopped early; see `incomplete_details`.
    Incomplete,
    /// Generation failed; see `error`.
    Failed,
    /// Generation is still running.
    InProgress,
    /// The response was cancelled.
    Cancelled,
    /// The response is waiting to run.
    Queued,
    /// A status this client does not know about.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseStatus::Completed => write!(f, "completed"),
            ResponseStatus::Incomplete => write!(f, "incomplete"),
            ResponseStatus::Failed => write!(f, "failed"),
            ResponseStatus::InProgress => write!(f, "in_progress"),
            ResponseStatus::Cancelled => write!(f, "cancelled"),
            ResponseStatus::Queued => write!(f, "queued"),
            ResponseStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Why a response is incomplete.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncompleteDetails {
    /// Reason string, e.g. `max_output_tokens`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Error attached to a failed response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseError {
    /// Machine-readable code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
}

/// One content part of an output message.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputContent {
    /// Content type, e.g. `output_text`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,

    /// The generated text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}

impl OutputContent {
    /// Create an `output_text` part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            r#type: Some("output_text".to_string()),
            text: text.into(),
        }
    }
}

/// One item of a response's output.
///
/// Messages carry a role and content; other item kinds (reasoning, tool
/// calls) may have neither.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputItem {
    /// Item type, e.g. `message` or `reasoning`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,

    /// Item id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Item status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Author of the item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Ordered content parts.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: Vec<OutputContent>,
}

impl OutputItem {
    /// Create a message item with the given role and content.
    pub fn message(role: impl Into<String>, content: Vec<OutputContent>) -> Self {
        Self {
            r#type: Some("message".to_string()),
            id: None,
            status: Some("completed".to_string()),
            role: Some(role.into()),
            content,
        }
    }

    /// Returns true for an assistant message with at least one content part.
    pub fn is_assistant_message(&self) -> bool {
        self.role.as_deref() == Some(ASSISTANT_ROLE) && !self.content.is_empty()
    }

    /// Concatenated text of all content parts.
    pub fn text(&self) -> String {
        self.content.iter().map(|c| c.text.as_str()).collect()
    }
}

/// A reply from `POST /responses`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Response {
    /// Unique id; pass it back as `previous_response_id` to continue.
    pub id: String,

    /// Object type, always `response`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,

    /// Unix timestamp of creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,

    /// Lifecycle status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ResponseStatus>,

    /// Set when `status` is `incomplete`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incomplete_details: Option<IncompleteDetails>,

    /// Set when `status` is `failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,

    /// The model that answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Generated output items, in order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub output: Vec<OutputItem>,

    /// Token usage.  Failed and incomplete responses may send `null`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub usage: Usage,
}

impl Response {
    /// Create a completed response.
    pub fn new(id: impl Into<String>, output: Vec<OutputItem>, usage: Usage) -> Self {
        Self {
            id: id.into(),
            object: Some("response".to_string()),
            created_at: None,
            status: Some(ResponseStatus::Completed),
            incomplete_details: None,
            error: None,
            model: None,
            output,
            usage,
        }
    }

    /// The first assistant message that has content, if any.
    pub fn assistant_message(&self) -> Option<&OutputItem> {
        self.output.iter().find(|item| item.is_assistant_message())
    }

    /// Text of the first assistant message that has content.
    ///
    /// `None` means the reply has no usable assistant output.
    pub fn assistant_text(&self) -> Option<String> {
        self.assistant_message().map(OutputItem::text)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_full_response() {
        let json = json!({
            "id": "resp_67ccd2bed1ec8190",
            "object": "response",
            "created_at": 1741476542,
            "status": "completed",
            "error": null,
            "incomplete_details": null,
            "model": "gpt-4o-mini-2024-07-18",
            "output": [
                {
                    "type": "message",
                    "id": "msg_67ccd2bf17f0",
                    "status": "completed",
                    "role": "assistant",
                    "content": [
                        {
                            "type": "output_text",
                            "text": "In a peaceful grove beneath a silver moon...",
                            "annotations": []
                        }
                    ]
                }
            ],
            "parallel_tool_calls": true,
            "usage": {
                "input_tokens": 36,
                "output_tokens": 87,
                "total_tokens": 123
            }
        });

        let response: Response = serde_json::from_value(json).unwrap();
        assert_eq!(response.id, "resp_67ccd2bed1ec8190");
        assert_eq!(response.status, Some(ResponseStatus::Completed));
        assert_eq!(response.usage.input_tokens, 36);
        assert_eq!(
            response.assistant_text().as_deref(),
            Some("In a peaceful grove beneath a silver moon...")
        );
    }

    #[test]
    fn reasoning_items_are_skipped() {
        let json = json!({
            "id": "resp_2",
            "output": [
                {"type": "reasoning", "id": "rs_1", "summary": []},
                {"type": "message", "role": "assistant", "content": [{"type": "output_text", "text": "42"}]}
            ],
            "usage": {"input_tokens": 5, "output_tokens": 3}
        });

        let response: Response = serde_json::from_value(json).unwrap();
        assert_eq!(response.assistant_text().as_deref(), Some("42"));
    }

    #[test]
    fn assistant_without_content_is_not_usable() {
        let response = Response::new(
            "resp_3",
            vec![
                OutputItem::message("assistant", vec![]),
                OutputItem::message("user", vec![OutputContent::text("echo")]),
            ],
            Usage::new(1, 0),
        );
        assert!(response.assistant_text().is_none());
    }

    #[test]
    fn multiple_parts_are_concatenated() {
        let response = Response::new(
            "resp_4",
            vec![OutputItem::message(
                "assistant",
                vec![OutputContent::text("Hello, "), OutputContent::text("world")],
            )],
            Usage::default(),
        );
        assert_eq!(response.assistant_text().as_deref(), Some("Hello, world"));
    }

    #[test]
    fn unknown_status_is_tolerated() {
        let response: Response =
            serde_json::from_value(json!({"id": "resp_5", "status": "archived"})).unwrap();
        assert_eq!(response.status, Some(ResponseStatus::Unknown));
        assert!(response.output.is_empty());
    }
}
