//! The read-dispatch-send loop.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::chat::commands::parse_command;
use crate::chat::render::Renderer;
use crate::chat::session::{ChatSession, CommandOutcome};
use crate::client::CompletionService;
use crate::error::{Error, Result};

/// One result of asking the user for a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadLine {
    /// A line of input, without its terminator.
    Line(String),
    /// The user pressed Ctrl-C at the prompt.
    Interrupted,
    /// Input ended (Ctrl-D or closed stdin).
    Eof,
}

/// A source of input lines with optional history.
#[async_trait::async_trait]
pub trait LineReader: Send {
    /// Show `prompt` and read one line.
    ///
    /// The returned future may be dropped before it completes; the reader
    /// must stay usable or fail cleanly afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error when the terminal cannot be read; the loop treats
    /// this as unrecoverable.
    async fn read_line(&mut self, prompt: &str) -> Result<ReadLine>;

    /// Remember a submitted line.
    fn add_history(&mut self, _line: &str) {}
}

enum EditorRequest {
    Read(String, oneshot::Sender<Result<ReadLine>>),
    History(String),
}

/// A rustyline editor driven from its own thread.
///
/// Reading a line blocks, so the editor lives on a dedicated thread and the
/// chat loop awaits its answers.  This lets a termination request end the
/// loop while the prompt is showing.  The thread exits once the reader is
/// dropped and any outstanding read returns.
pub struct EditorReader {
    requests: mpsc::Sender<EditorRequest>,
}

impl EditorReader {
    /// Start the editor thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be started or the editor cannot
    /// attach to the terminal.
    pub fn spawn() -> Result<Self> {
        let (requests, inbox) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        thread::Builder::new()
            .name("chainchat-input".to_string())
            .spawn(move || {
                let mut editor = match DefaultEditor::new() {
                    Ok(editor) => {
                        let _ = ready_tx.send(Ok(()));
                        editor
                    }
                    Err(err) => {
                        let _ = ready_tx.send(Err(readline_error(err)));
                        return;
                    }
                };
                for request in inbox {
                    match request {
                        EditorRequest::Read(prompt, reply) => {
                            let _ = reply.send(read_from(&mut editor, &prompt));
                        }
                        EditorRequest::History(line) => {
                            let _ = editor.add_history_entry(line.as_str());
                        }
                    }
                }
            })
            .map_err(|err| Error::io("failed to start input thread", err))?;
        ready_rx.recv().map_err(|_| input_closed())??;
        Ok(Self { requests })
    }
}

#[async_trait::async_trait]
impl LineReader for EditorReader {
    async fn read_line(&mut self, prompt: &str) -> Result<ReadLine> {
        let (reply, answer) = oneshot::channel();
        self.requests
            .send(EditorRequest::Read(prompt.to_string(), reply))
            .map_err(|_| input_closed())?;
        answer.await.map_err(|_| input_closed())?
    }

    fn add_history(&mut self, line: &str) {
        let _ = self
            .requests
            .send(EditorRequest::History(line.to_string()));
    }
}

fn read_from(editor: &mut DefaultEditor, prompt: &str) -> Result<ReadLine> {
    match editor.readline(prompt) {
        Ok(line) => Ok(ReadLine::Line(line)),
        Err(ReadlineError::Interrupted) => Ok(ReadLine::Interrupted),
        Err(ReadlineError::Eof) => Ok(ReadLine::Eof),
        Err(err) => Err(readline_error(err)),
    }
}

fn readline_error(err: ReadlineError) -> Error {
    match err {
        ReadlineError::Io(err) => Error::io("failed to read input", err),
        err => Error::io("failed to read input", io::Error::other(err.to_string())),
    }
}

fn input_closed() -> Error {
    Error::io(
        "failed to read input",
        io::Error::new(io::ErrorKind::BrokenPipe, "input thread exited"),
    )
}

/// Runs the chat until the user exits or `shutdown` is cancelled.
///
/// Blank lines re-prompt.  Command lines are executed locally, except that
/// `/include` forwards its rewritten input.  Everything else is sent to the
/// service.  Service failures are rendered and the loop continues.
///
/// Cancelling `shutdown` ends the loop at the prompt.  During a request it
/// sets `interrupted`, waits for the turn to abort, then ends the loop.
///
/// # Errors
///
/// Returns an error only when reading input fails.
pub async fn run<S, L>(
    session: &mut ChatSession<S>,
    reader: &mut L,
    renderer: &mut dyn Renderer,
    interrupted: Arc<AtomicBool>,
    shutdown: CancellationToken,
) -> Result<()>
where
    S: CompletionService,
    L: LineReader + ?Sized,
{
    loop {
        interrupted.store(false, Ordering::Relaxed);

        let prompt = session.prompt();
        let read = tokio::select! {
            biased;
            _ = shutdown.cancelled() => return Ok(()),
            read = reader.read_line(&prompt) => read?,
        };
        let line = match read {
            ReadLine::Line(line) => line,
            ReadLine::Interrupted | ReadLine::Eof => return Ok(()),
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        reader.add_history(line);

        let input = match parse_command(line) {
            Some(command) => match session.execute(command, renderer) {
                CommandOutcome::Handled => continue,
                CommandOutcome::Forward(input) => input,
                CommandOutcome::Exit => return Ok(()),
            },
            None => line.to_string(),
        };

        let result = {
            let turn = session.send(&input, renderer, interrupted.clone());
            tokio::pin!(turn);
            tokio::select! {
                result = &mut turn => result,
                _ = shutdown.cancelled() => {
                    interrupted.store(true, Ordering::Relaxed);
                    let _ = turn.await;
                    return Ok(());
                }
            }
        };
        if let Err(err) = result {
            renderer.print_error(&err.to_string());
        }
    }
}
