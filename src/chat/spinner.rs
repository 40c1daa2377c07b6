//! Busy indicator shown while a request is outstanding.

use std::io::Write;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Time between frames.
pub const SPINNER_INTERVAL: Duration = Duration::from_millis(100);

const FRAMES: [char; 4] = ['-', '\\', '|', '/'];

/// A rotating glyph drawn by a background task.
///
/// [`start`](Self::start) and [`stop`](Self::stop) come in pairs.  `stop`
/// waits for the task to exit, and the task erases its frame before exiting,
/// so nothing it draws can land after `stop` returns.
pub struct BusyIndicator<W> {
    cancel: CancellationToken,
    handle: JoinHandle<W>,
}

impl<W: Write + Send + 'static> BusyIndicator<W> {
    /// Start drawing to `out` every `interval`.
    pub fn start(out: W, interval: Duration) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            let mut out = out;
            let mut ticker = tokio::time::interval(interval);
            let mut frame = 0;
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let _ = write!(out, "\r{}", FRAMES[frame]);
                        let _ = out.flush();
                        frame = (frame + 1) % FRAMES.len();
                    }
                }
            }
            let _ = write!(out, "\r \r");
            let _ = out.flush();
            out
        });
        Self { cancel, handle }
    }

    /// Stop drawing and wait until the frame is erased.
    ///
    /// Returns the writer, or `None` if the drawing task panicked.
    pub async fn stop(self) -> Option<W> {
        self.cancel.cancel();
        self.handle.await.ok()
    }
}
