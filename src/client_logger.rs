//! Logging trait for client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows callers to
//! capture every request and reply passing through the [`OpenAi`] client, and
//! [`JsonLinesLogger`], which appends them to a file one JSON object per line.
//!
//! [`OpenAi`]: crate::OpenAi

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use serde_json::{Value, json};

use crate::error::{Error, Result};
use crate::types::{Response, ResponseRequest};

/// A trait for logging client operations.
///
/// Implementations must be cheap and must not fail; a logger that cannot
/// record an event drops it.
pub trait ClientLogger: Send + Sync {
    /// Log a request just before it is sent.
    fn log_request(&self, request: &ResponseRequest);

    /// Log a successfully parsed reply.
    fn log_response(&self, response: &Response);

    /// Log a failed request.
    fn log_error(&self, error: &Error);
}

/// Appends one JSON object per event to a file.
///
/// Events look like `{"request": {...}}`, `{"response": {...}}`, or
/// `{"error": "..."}`.
pub struct JsonLinesLogger {
    file: Mutex<File>,
}

impl JsonLinesLogger {
    /// Open `path` for appending, creating it if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| Error::io(format!("failed to open log file {}", path.display()), err))?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    fn write_event(&self, event: Value) {
        let Ok(mut file) = self.file.lock() else {
            return;
        };
        let _ = writeln!(file, "{event}");
    }
}

impl ClientLogger for JsonLinesLogger {
    fn log_request(&self, request: &ResponseRequest) {
        if let Ok(value) = serde_json::to_value(request) {
            self.write_event(json!({ "request": value }));
        }
    }

    fn log_response(&self, response: &Response) {
        if let Ok(value) = serde_json::to_value(response) {
            self.write_event(json!({ "response": value }));
        }
    }

    fn log_error(&self, error: &Error) {
        self.write_event(json!({ "error": error.to_string() }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OutputContent, OutputItem, Usage};

    #[test]
    fn writes_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.jsonl");
        let logger = JsonLinesLogger::create(&path).unwrap();

        logger.log_request(&ResponseRequest::new("gpt-4o-mini", "hello"));
        logger.log_response(&Response::new(
            "resp_1",
            vec![OutputItem::message(
                "assistant",
                vec![OutputContent::text("hi")],
            )],
            Usage::new(5, 3),
        ));
        logger.log_error(&Error::incomplete(None));

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<Value> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["request"]["input"], "hello");
        assert_eq!(lines[1]["response"]["id"], "resp_1");
        assert_eq!(lines[2]["error"], "Incomplete response");
    }

    #[test]
    fn appends_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.jsonl");
        std::fs::write(&path, "{\"earlier\":true}\n").unwrap();

        let logger = JsonLinesLogger::create(&path).unwrap();
        logger.log_error(&Error::abort("interrupted"));

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}
