use serde::{Deserialize, Serialize};

/// Body of a `POST /responses` request.
///
/// `previous_response_id` chains the request onto an earlier reply so the
/// service keeps the conversation context.  It is omitted entirely when there
/// is no earlier reply; the service treats an empty string as a malformed
/// reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseRequest {
    /// The model to answer with.
    pub model: String,

    /// Id of the reply this request continues.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_response_id: Option<String>,

    /// Upper bound on generated tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,

    /// The user's prompt.
    pub input: String,
}

impl ResponseRequest {
    /// Create a request that starts a new conversation.
    pub fn new(model: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            previous_response_id: None,
            max_output_tokens: None,
            input: input.into(),
        }
    }

    /// Chain onto the reply with the given id.  Empty ids are dropped.
    pub fn with_previous_response_id(mut self, id: Option<String>) -> Self {
        self.previous_response_id = id.filter(|id| !id.is_empty());
        self
    }

    /// Set the maximum number of generated tokens.
    pub fn with_max_output_tokens(mut self, max_output_tokens: Option<u32>) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn first_turn_omits_previous_id() {
        let request = ResponseRequest::new("gpt-4o-mini", "hello");
        assert_eq!(
            to_value(&request).unwrap(),
            json!({"model": "gpt-4o-mini", "input": "hello"})
        );
    }

    #[test]
    fn chained_turn_sends_previous_id() {
        let request = ResponseRequest::new("gpt-4o-mini", "and then?")
            .with_previous_response_id(Some("resp_1".to_string()))
            .with_max_output_tokens(Some(256));
        assert_eq!(
            to_value(&request).unwrap(),
            json!({
                "model": "gpt-4o-mini",
                "previous_response_id": "resp_1",
                "max_output_tokens": 256,
                "input": "and then?"
            })
        );
    }

    #[test]
    fn empty_previous_id_is_omitted() {
        let request =
            ResponseRequest::new("gpt-4o-mini", "hi").with_previous_response_id(Some(String::new()));
        assert!(request.previous_response_id.is_none());
        assert!(to_value(&request).unwrap().get("previous_response_id").is_none());
    }
}
