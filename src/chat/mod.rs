//! Chat application module for interactive conversations.
//!
//! This module provides the REPL chat interface built on top of the
//! chainchat client.  It supports:
//!
//! - Conversation chaining through `previous_response_id`
//! - Token and cost accounting per conversation
//! - Slash commands for session control, file inclusion, and saving replies
//! - A busy indicator while a request is outstanding
//!
//! # Architecture
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`commands`]: Slash command parsing
//! - [`state`]: Running conversation state
//! - [`session`]: Command execution and request/reply turns
//! - [`spinner`]: The busy indicator
//! - [`repl`]: The input loop

mod commands;
mod config;
mod render;
mod repl;
mod session;
mod spinner;
mod state;

pub use commands::{COMMAND_PREFIX, ChatCommand, help_text, model_switch_usage, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use render::{PlainTextRenderer, Renderer};
pub use repl::{EditorReader, LineReader, ReadLine, run};
pub use session::{ChatSession, CommandOutcome, TurnOutcome};
pub use spinner::{BusyIndicator, SPINNER_INTERVAL};
pub use state::ConversationState;
