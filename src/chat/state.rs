//! Running state of one conversation.

use std::time::Duration;

use crate::types::Response;

/// What the session remembers between turns.
///
/// The state changes in exactly two ways: [`update`](Self::update) after a
/// successful, well-formed reply, and [`clear`](Self::clear) when a new
/// conversation starts.  A failed turn never touches it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationState {
    has_reply: bool,
    previous_response_id: Option<String>,
    previous_response_text: String,
    last_input_tokens: u64,
    last_output_tokens: u64,
    total_input_tokens: u64,
    total_output_tokens: u64,
    last_elapsed: Duration,
}

impl ConversationState {
    /// An empty state: no thread, no reply, zero counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted reply.
    ///
    /// `text` is the assistant text that was shown to the user; it is kept
    /// for `/write`.
    pub fn update(&mut self, response: &Response, text: String, elapsed: Duration) {
        let usage = response.usage;
        self.has_reply = true;
        self.previous_response_id = Some(response.id.clone()).filter(|id| !id.is_empty());
        self.previous_response_text = text;
        self.last_input_tokens = usage.input_tokens;
        self.last_output_tokens = usage.output_tokens;
        self.total_input_tokens = self.total_input_tokens.saturating_add(usage.input_tokens);
        self.total_output_tokens = self.total_output_tokens.saturating_add(usage.output_tokens);
        self.last_elapsed = elapsed;
    }

    /// Forget everything and start a new conversation.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Id to chain the next request onto.
    pub fn previous_response_id(&self) -> Option<&str> {
        self.previous_response_id.as_deref()
    }

    /// Text of the last accepted reply.  Empty before the first one.
    pub fn previous_response_text(&self) -> &str {
        &self.previous_response_text
    }

    /// Returns true once a reply has been accepted, even an empty one.
    pub fn has_previous_response(&self) -> bool {
        self.has_reply
    }

    /// Input tokens of the last turn.
    pub fn last_input_tokens(&self) -> u64 {
        self.last_input_tokens
    }

    /// Output tokens of the last turn.
    pub fn last_output_tokens(&self) -> u64 {
        self.last_output_tokens
    }

    /// Input tokens since the conversation started.
    pub fn total_input_tokens(&self) -> u64 {
        self.total_input_tokens
    }

    /// Output tokens since the conversation started.
    pub fn total_output_tokens(&self) -> u64 {
        self.total_output_tokens
    }

    /// Round-trip time of the last turn.
    pub fn last_elapsed(&self) -> Duration {
        self.last_elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OutputContent, OutputItem, Usage};

    fn reply(id: &str, input: u64, output: u64) -> Response {
        Response::new(
            id,
            vec![OutputItem::message(
                "assistant",
                vec![OutputContent::text("ok")],
            )],
            Usage::new(input, output),
        )
    }

    #[test]
    fn new_state_is_empty() {
        let state = ConversationState::new();
        assert!(state.previous_response_id().is_none());
        assert!(!state.has_previous_response());
        assert_eq!(state.total_input_tokens(), 0);
        assert_eq!(state.last_elapsed(), Duration::ZERO);
    }

    #[test]
    fn update_records_turn() {
        let mut state = ConversationState::new();
        state.update(&reply("r1", 5, 3), "hi".to_string(), Duration::from_millis(250));
        assert_eq!(state.previous_response_id(), Some("r1"));
        assert_eq!(state.previous_response_text(), "hi");
        assert_eq!(state.last_input_tokens(), 5);
        assert_eq!(state.last_output_tokens(), 3);
        assert_eq!(state.total_input_tokens(), 5);
        assert_eq!(state.total_output_tokens(), 3);
        assert_eq!(state.last_elapsed(), Duration::from_millis(250));
    }

    #[test]
    fn empty_reply_text_still_counts_as_reply() {
        let mut state = ConversationState::new();
        state.update(&reply("r1", 5, 0), String::new(), Duration::ZERO);
        assert!(state.has_previous_response());
        assert_eq!(state.previous_response_text(), "");
        state.clear();
        assert!(!state.has_previous_response());
    }

    #[test]
    fn totals_are_monotonic() {
        let mut state = ConversationState::new();
        let mut previous = 0;
        for (i, tokens) in [7, 0, 12, 1].into_iter().enumerate() {
            state.update(&reply(&format!("r{i}"), tokens, tokens), "x".to_string(), Duration::ZERO);
            assert!(state.total_input_tokens() >= previous);
            assert!(state.total_input_tokens() >= state.last_input_tokens());
            assert!(state.total_output_tokens() >= state.last_output_tokens());
            previous = state.total_input_tokens();
        }
        assert_eq!(state.total_input_tokens(), 20);
        assert_eq!(state.previous_response_id(), Some("r3"));
    }

    #[test]
    fn clear_is_idempotent() {
        let mut state = ConversationState::new();
        state.update(&reply("r1", 5, 3), "hi".to_string(), Duration::from_secs(1));
        state.clear();
        assert_eq!(state, ConversationState::default());
        state.clear();
        assert_eq!(state, ConversationState::default());
    }
}
