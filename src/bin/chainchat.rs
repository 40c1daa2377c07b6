//! Interactive chat against the OpenAI Responses API.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage with default settings
//! chainchat
//!
//! # Pick a model from the catalog
//! chainchat --model gpt-4o
//!
//! # Keep a JSON-lines record of every request and reply
//! chainchat --log-file chat.jsonl
//!
//! # Disable colors and the busy indicator (useful for piping output)
//! chainchat --no-color --no-spinner
//! ```
//!
//! The API key is read from `OPENAI_API_KEY`, which may also be set in a
//! `.env` file in the working directory.
//!
//! # Commands
//!
//! - `/exit` - Exit the application
//! - `/new` - Start a new conversation
//! - `/session` - Show token consumption and cost
//! - `/include <file> <query>` - Send a file along with a query
//! - `/model info` - Show the current model and its pricing
//! - `/model switch [name]` - Switch model, or list the catalog
//! - `/write [-code] <file>` - Save the last reply or its code block
//! - `/help` - Show available commands

use std::io::IsTerminal;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use tokio_util::sync::CancellationToken;

use chainchat::chat::{
    ChatArgs, ChatConfig, ChatSession, EditorReader, PlainTextRenderer, Renderer, run,
};
use chainchat::{JsonLinesLogger, ModelCatalog, OpenAi};

/// Main entry point for the chainchat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is fine; the key may already be in the environment.
    let _ = dotenvy::dotenv();

    let (args, _) = ChatArgs::from_command_line_relaxed("chainchat [OPTIONS]");
    let config = ChatConfig::from(args);

    let mut client = OpenAi::with_options(None, config.base_url.clone(), Some(config.timeout))?;
    if let Some(path) = config.log_file.as_ref() {
        client = client.with_logger(Arc::new(JsonLinesLogger::create(path)?));
    }

    let show_spinner = config.show_spinner && std::io::stdout().is_terminal();
    let mut session = ChatSession::new(client, ModelCatalog::builtin(), &config.model)?
        .with_max_output_tokens(config.max_output_tokens)
        .with_spinner(show_spinner);
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut reader = EditorReader::spawn()?;

    // Ctrl+C abandons the pending request.
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    // SIGTERM and SIGHUP end the chat, at the prompt or mid-request.
    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_termination(shutdown.clone())?);

    renderer.print_info(&format!("chainchat (model: {})", session.model()));
    renderer.print_info("Type /help for commands, /exit to quit\n");

    run(
        &mut session,
        &mut reader,
        &mut renderer,
        interrupted,
        shutdown,
    )
    .await?;

    println!("Goodbye!");
    Ok(())
}

/// Install termination handlers and return a future that cancels `shutdown`
/// when one fires.
#[cfg(unix)]
fn cancel_on_termination(
    shutdown: CancellationToken,
) -> std::io::Result<impl std::future::Future<Output = ()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate())?;
    let mut hangup = signal(SignalKind::hangup())?;
    Ok(async move {
        tokio::select! {
            _ = terminate.recv() => {}
            _ = hangup.recv() => {}
        }
        shutdown.cancel();
    })
}

#[cfg(not(unix))]
fn cancel_on_termination(
    shutdown: CancellationToken,
) -> std::io::Result<impl std::future::Future<Output = ()>> {
    Ok(async move {
        std::future::pending::<()>().await;
        shutdown.cancel();
    })
}
