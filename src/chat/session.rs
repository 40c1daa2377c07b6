//! Core chat session management.
//!
//! [`ChatSession`] owns the conversation state and the selected model, runs
//! local commands, and carries out one request/reply turn at a time.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::catalog::ModelCatalog;
use crate::chat::commands::{ChatCommand, help_text, model_switch_usage};
use crate::chat::render::Renderer;
use crate::chat::spinner::{BusyIndicator, SPINNER_INTERVAL};
use crate::chat::state::ConversationState;
use crate::client::CompletionService;
use crate::codeblock::extract_code_block;
use crate::error::{Error, Result};
use crate::observability::{
    CHAT_COMMANDS, CHAT_EMPTY_REPLIES, CHAT_FILES_INCLUDED, CHAT_FILES_WRITTEN, CHAT_TURN_FAILURES,
    CHAT_TURNS,
};
use crate::types::{Model, ResponseRequest};

/// How often a pending request checks for a user interrupt.
const INTERRUPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// What the loop should do after a command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command was handled locally; nothing is sent.
    Handled,
    /// Send this input to the service as the next prompt.
    Forward(String),
    /// Leave the chat.
    Exit,
}

/// How a turn that reached the service ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The reply was shown and recorded.
    Replied,
    /// The reply had no assistant output; nothing was recorded.
    NoAssistantOutput,
}

/// A chat session that manages conversation state and service interactions.
pub struct ChatSession<S: CompletionService> {
    service: S,
    catalog: ModelCatalog,
    model: Model,
    state: ConversationState,
    max_output_tokens: Option<u32>,
    show_spinner: bool,
    displayed_elapsed: Duration,
}

impl<S: CompletionService> ChatSession<S> {
    /// Creates a new session answering with `model_name`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `model_name` is not in `catalog`.
    pub fn new(service: S, catalog: ModelCatalog, model_name: &str) -> Result<Self> {
        let model = catalog.get(model_name).cloned().ok_or_else(|| {
            Error::validation(
                format!(
                    "unknown model {model_name}; available models: {}",
                    catalog.names().join(", ")
                ),
                Some("model".to_string()),
            )
        })?;
        Ok(Self {
            service,
            catalog,
            model,
            state: ConversationState::new(),
            max_output_tokens: None,
            show_spinner: false,
            displayed_elapsed: Duration::ZERO,
        })
    }

    /// Limit the tokens generated per reply.
    pub fn with_max_output_tokens(mut self, max_output_tokens: Option<u32>) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Show a busy indicator on stdout while waiting for replies.
    pub fn with_spinner(mut self, show_spinner: bool) -> Self {
        self.show_spinner = show_spinner;
        self
    }

    /// The currently selected model.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The models this session may switch between.
    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// The running conversation state.
    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Round-trip time to show in the prompt; zero after a local command.
    pub fn displayed_elapsed(&self) -> Duration {
        self.displayed_elapsed
    }

    /// The input prompt, showing the model and last round-trip time.
    pub fn prompt(&self) -> String {
        format!(
            "{} ({:.1}s) > ",
            self.model,
            self.displayed_elapsed.as_secs_f64()
        )
    }

    /// Runs a local command.
    pub fn execute(&mut self, command: ChatCommand, renderer: &mut dyn Renderer) -> CommandOutcome {
        CHAT_COMMANDS.click();
        let outcome = match command {
            ChatCommand::Exit => CommandOutcome::Exit,
            ChatCommand::New => {
                self.state.clear();
                renderer.print_info("Started a new conversation.");
                CommandOutcome::Handled
            }
            ChatCommand::Session => {
                self.print_session(renderer);
                CommandOutcome::Handled
            }
            ChatCommand::Help => {
                renderer.print_info(help_text());
                CommandOutcome::Handled
            }
            ChatCommand::Include { path, query } => self.include(&path, &query, renderer),
            ChatCommand::ModelInfo => {
                renderer.print_info(&format!(
                    "Current model: {} (input token cost: ${:.2}/M, output token cost: ${:.2}/M)",
                    self.model,
                    self.model.input_cost_per_million(),
                    self.model.output_cost_per_million()
                ));
                CommandOutcome::Handled
            }
            ChatCommand::ModelSwitch(name) => {
                self.switch_model(name.as_deref(), renderer);
                CommandOutcome::Handled
            }
            ChatCommand::Write { path, code_only } => {
                self.write_response(&path, code_only, renderer);
                CommandOutcome::Handled
            }
            ChatCommand::Invalid(message) => {
                renderer.print_error(&message);
                CommandOutcome::Handled
            }
            ChatCommand::Unknown(name) => {
                renderer.print_error(&format!("Unknown command: {name}"));
                CommandOutcome::Handled
            }
        };
        if outcome == CommandOutcome::Handled {
            self.displayed_elapsed = Duration::ZERO;
        }
        outcome
    }

    /// Sends `input` to the service and renders the reply.
    ///
    /// The conversation state is updated only when the reply carries
    /// assistant output.  Setting `interrupted` while the request is pending
    /// abandons it.
    ///
    /// # Errors
    ///
    /// Returns the service failure, or [`Error::Abort`] on interrupt.  The
    /// conversation state is unchanged in either case.
    pub async fn send(
        &mut self,
        input: &str,
        renderer: &mut dyn Renderer,
        interrupted: Arc<AtomicBool>,
    ) -> Result<TurnOutcome> {
        CHAT_TURNS.click();
        let request = ResponseRequest::new(self.model.name(), input)
            .with_previous_response_id(self.state.previous_response_id().map(String::from))
            .with_max_output_tokens(self.max_output_tokens);

        let indicator = self
            .show_spinner
            .then(|| BusyIndicator::start(io::stdout(), SPINNER_INTERVAL));
        let start = Instant::now();
        let result = tokio::select! {
            result = self.service.complete(&request) => result,
            _ = wait_for_interrupt(&interrupted) => Err(Error::abort("interrupted by user")),
        };
        let elapsed = start.elapsed();
        if let Some(indicator) = indicator {
            indicator.stop().await;
        }

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                CHAT_TURN_FAILURES.click();
                return Err(err);
            }
        };

        let Some(text) = response.assistant_text() else {
            CHAT_EMPTY_REPLIES.click();
            renderer.print_notice("No assistant output in response.");
            return Ok(TurnOutcome::NoAssistantOutput);
        };

        renderer.print_text(&text);
        renderer.finish_response();
        if let Some(block) = extract_code_block(&text) {
            renderer.print_notice(&format!(
                "Code block detected (language: {}, {} lines). Use /write -code <file> to save it.",
                block.language_label(),
                block.line_count()
            ));
        }

        self.state.update(&response, text, elapsed);
        self.displayed_elapsed = elapsed;
        renderer.print_notice(&format!(
            "in: {}, out: {} tokens; server response time: {:.2?}",
            self.state.last_input_tokens(),
            self.state.last_output_tokens(),
            elapsed
        ));
        Ok(TurnOutcome::Replied)
    }

    fn print_session(&self, renderer: &mut dyn Renderer) {
        let input = self.state.total_input_tokens();
        let output = self.state.total_output_tokens();
        renderer.print_info(&format!(
            "Session token consumption: [in: {}; out: {}], [in: ${:.2}; out: ${:.2}]",
            input,
            output,
            self.model.input_cost(input),
            self.model.output_cost(output)
        ));
    }

    fn include(&mut self, path: &Path, query: &str, renderer: &mut dyn Renderer) -> CommandOutcome {
        match fs::read(path) {
            Ok(contents) => {
                CHAT_FILES_INCLUDED.click();
                CommandOutcome::Forward(format!(
                    "{}\n--- INPUT FILE START ---\n{}\n--- INPUT FILE END ---",
                    query.trim(),
                    String::from_utf8_lossy(&contents)
                ))
            }
            Err(err) => {
                renderer.print_error(&format!("Error reading file {}: {}", path.display(), err));
                CommandOutcome::Handled
            }
        }
    }

    fn switch_model(&mut self, name: Option<&str>, renderer: &mut dyn Renderer) {
        let Some(name) = name else {
            renderer.print_info(model_switch_usage());
            renderer.print_info(&format!(
                "Available models: {}",
                self.catalog.names().join(", ")
            ));
            return;
        };
        match self.catalog.get(name) {
            Some(model) => {
                self.model = model.clone();
                self.state.clear();
                renderer.print_info(&format!(
                    "Switched to model: {name}. Started a new conversation."
                ));
            }
            None => {
                renderer.print_error(&format!(
                    "Invalid model name: {name}. Available models: {}",
                    self.catalog.names().join(", ")
                ));
            }
        }
    }

    fn write_response(&self, path: &Path, code_only: bool, renderer: &mut dyn Renderer) {
        if !self.state.has_previous_response() {
            renderer.print_error("No response to write yet.");
            return;
        }
        let text = self.state.previous_response_text();
        let (contents, block) = if code_only {
            match extract_code_block(text) {
                Some(block) => (block.body.clone(), Some(block)),
                None => {
                    renderer.print_error("No code block found in the last response.");
                    return;
                }
            }
        } else {
            (text.to_string(), None)
        };

        if let Err(err) = fs::write(path, contents) {
            renderer.print_error(&format!("Error writing file {}: {}", path.display(), err));
            return;
        }
        CHAT_FILES_WRITTEN.click();
        match block {
            Some(block) => renderer.print_info(&format!(
                "Code block written to {} (language: {}, {} lines).",
                path.display(),
                block.language_label(),
                block.line_count()
            )),
            None => renderer.print_info(&format!("Response written to {}.", path.display())),
        }
    }
}

async fn wait_for_interrupt(interrupted: &AtomicBool) {
    while !interrupted.load(Ordering::Relaxed) {
        tokio::time::sleep(INTERRUPT_POLL_INTERVAL).await;
    }
}
