//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.  Credentials never come from the
//! command line; see [`OpenAi::new`](crate::OpenAi::new).

use std::path::PathBuf;
use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::catalog::DEFAULT_MODEL;

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u32 = 120;

/// Command-line arguments for the chainchat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to use for chat.
    #[arrrg(optional, "Model to use (default: gpt-4o-mini)", "MODEL")]
    pub model: Option<String>,

    /// Override the API base URL.
    #[arrrg(optional, "API base URL (default: $OPENAI_BASE_URL or the public endpoint)", "URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 120)", "SECONDS")]
    pub timeout_secs: Option<u32>,

    /// Maximum tokens per response.
    #[arrrg(optional, "Max output tokens per response (default: service default)", "TOKENS")]
    pub max_output_tokens: Option<u32>,

    /// Append requests and replies to this file as JSON lines.
    #[arrrg(optional, "Log requests and replies to FILE as JSON lines", "FILE")]
    pub log_file: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Disable the busy indicator.
    #[arrrg(flag, "Disable the busy indicator")]
    pub no_spinner: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Name of the model selected at startup.
    pub model: String,

    /// API base URL override.
    pub base_url: Option<String>,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Maximum tokens per response.
    pub max_output_tokens: Option<u32>,

    /// JSON-lines log of requests and replies.
    pub log_file: Option<PathBuf>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Whether to show the busy indicator while waiting for a reply.
    pub show_spinner: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: gpt-4o-mini
    /// - Timeout: 120 seconds
    /// - Color: enabled
    /// - Busy indicator: enabled
    pub fn new() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS as u64),
            max_output_tokens: None,
            log_file: None,
            use_color: true,
            show_spinner: true,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum tokens per response.
    pub fn with_max_output_tokens(mut self, max_output_tokens: Option<u32>) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Disables the busy indicator.
    pub fn without_spinner(mut self) -> Self {
        self.show_spinner = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let timeout_secs = args
            .timeout_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        ChatConfig {
            model: args.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: args.base_url,
            timeout: Duration::from_secs(timeout_secs as u64),
            max_output_tokens: args.max_output_tokens,
            log_file: args.log_file.map(PathBuf::from),
            use_color: !args.no_color,
            show_spinner: !args.no_spinner,
        }
    }
}
