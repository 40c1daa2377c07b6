//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the chat session without sending messages
//! to the service.  Command names are case-sensitive.

use std::path::PathBuf;

/// Prefix that marks a line as a command.
pub const COMMAND_PREFIX: char = '/';

/// Flag to `/write` selecting code-block-only mode.
pub const CODE_FLAG: &str = "-code";

const INCLUDE_USAGE: &str = "Usage: /include <file-path> <query>";
const MODEL_SWITCH_USAGE: &str = "Usage: /model switch <model-name>";
const WRITE_USAGE: &str = "Usage: /write [-code] <file-path>";

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Exit the chat application.
    Exit,

    /// Start a new conversation.
    New,

    /// Show token consumption and cost for the conversation.
    Session,

    /// Display help information.
    Help,

    /// Send a query with a file's contents attached.
    Include {
        /// File to attach.
        path: PathBuf,
        /// The question to ask about it.
        query: String,
    },

    /// Show the current model and its pricing.
    ModelInfo,

    /// List models, or switch to the named one.
    ModelSwitch(Option<String>),

    /// Save the last reply, or only its first code block, to a file.
    Write {
        /// Destination file; overwritten.
        path: PathBuf,
        /// Write only the extracted code block.
        code_only: bool,
    },

    /// Malformed arguments to a known command.
    Invalid(String),

    /// A command name nobody recognizes, including the prefix.
    Unknown(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input starts with `/`, or `None` if it
/// should be sent to the service as a prompt.
///
/// # Examples
///
/// ```
/// # use chainchat::chat::{ChatCommand, parse_command};
/// assert_eq!(parse_command("/exit"), Some(ChatCommand::Exit));
/// assert_eq!(
///     parse_command("/model switch gpt-4o"),
///     Some(ChatCommand::ModelSwitch(Some("gpt-4o".to_string())))
/// );
/// assert!(parse_command("Hello there").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();
    if !input.starts_with(COMMAND_PREFIX) {
        return None;
    }

    let parts: Vec<&str> = input.split_whitespace().collect();
    let command = parts[0];
    let args = &parts[1..];

    let result = match command {
        "/exit" => ChatCommand::Exit,
        "/new" => ChatCommand::New,
        "/session" => ChatCommand::Session,
        "/help" => ChatCommand::Help,
        "/include" => parse_include(args),
        "/model" => parse_model(args),
        "/write" => parse_write(args),
        _ => ChatCommand::Unknown(command.to_string()),
    };

    Some(result)
}

fn parse_include(args: &[&str]) -> ChatCommand {
    match args {
        [path, query @ ..] if !query.is_empty() => ChatCommand::Include {
            path: PathBuf::from(*path),
            query: query.join(" "),
        },
        _ => ChatCommand::Invalid(INCLUDE_USAGE.to_string()),
    }
}

fn parse_model(args: &[&str]) -> ChatCommand {
    match args {
        ["switch"] => ChatCommand::ModelSwitch(None),
        ["switch", name] => ChatCommand::ModelSwitch(Some(name.to_string())),
        ["switch", ..] => ChatCommand::Invalid(MODEL_SWITCH_USAGE.to_string()),
        _ => ChatCommand::ModelInfo,
    }
}

fn parse_write(args: &[&str]) -> ChatCommand {
    match args {
        [flag, path] if *flag == CODE_FLAG => ChatCommand::Write {
            path: PathBuf::from(*path),
            code_only: true,
        },
        [path] if *path != CODE_FLAG => ChatCommand::Write {
            path: PathBuf::from(*path),
            code_only: false,
        },
        _ => ChatCommand::Invalid(WRITE_USAGE.to_string()),
    }
}

/// Usage line for `/model switch`.
pub fn model_switch_usage() -> &'static str {
    MODEL_SWITCH_USAGE
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Usage:
  Type your message and press Enter to get a response.
  /new                     Start a new conversation
  /include <file> <query>  Send a query with a file's contents attached
  /session                 Show token consumption for the conversation
  /model info              Show the current model and its pricing
  /model switch [<name>]   List models, or switch to one (starts a new conversation)
  /write [-code] <file>    Save the last response (or its first code block) to a file
  /help                    Show this help message
  /exit                    Exit the program"#
}
