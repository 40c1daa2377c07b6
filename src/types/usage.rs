use serde::{Deserialize, Serialize};

/// Token usage reported by the service for one response.
///
/// Counts are taken verbatim from the reply; nothing is recomputed locally.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    /// The number of input tokens which were used.
    #[serde(default)]
    pub input_tokens: u64,

    /// The number of output tokens which were used.
    #[serde(default)]
    pub output_tokens: u64,

    /// The total reported by the service, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
}

impl Usage {
    /// Create a new `Usage` with the given input and output tokens.
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn usage_minimal() {
        let usage = Usage::new(50, 100);
        let json = to_value(usage).unwrap();

        assert_eq!(
            json,
            json!({
                "input_tokens": 50,
                "output_tokens": 100
            })
        );
    }

    #[test]
    fn usage_ignores_detail_objects() {
        let json = json!({
            "input_tokens": 36,
            "input_tokens_details": {"cached_tokens": 0},
            "output_tokens": 87,
            "output_tokens_details": {"reasoning_tokens": 0},
            "total_tokens": 123
        });

        let usage: Usage = serde_json::from_value(json).unwrap();
        assert_eq!(usage.input_tokens, 36);
        assert_eq!(usage.output_tokens, 87);
        assert_eq!(usage.total_tokens, Some(123));
    }
}
