use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("chainchat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("chainchat.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("chainchat.client.request_duration_seconds");

pub(crate) static CHAT_TURNS: Counter = Counter::new("chainchat.chat.turns");
pub(crate) static CHAT_TURN_FAILURES: Counter = Counter::new("chainchat.chat.turn_failures");
pub(crate) static CHAT_EMPTY_REPLIES: Counter = Counter::new("chainchat.chat.empty_replies");
pub(crate) static CHAT_COMMANDS: Counter = Counter::new("chainchat.chat.commands");
pub(crate) static CHAT_FILES_INCLUDED: Counter = Counter::new("chainchat.chat.files_included");
pub(crate) static CHAT_FILES_WRITTEN: Counter = Counter::new("chainchat.chat.files_written");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&CHAT_TURNS);
    collector.register_counter(&CHAT_TURN_FAILURES);
    collector.register_counter(&CHAT_EMPTY_REPLIES);
    collector.register_counter(&CHAT_COMMANDS);
    collector.register_counter(&CHAT_FILES_INCLUDED);
    collector.register_counter(&CHAT_FILES_WRITTEN);
}
