// Public modules
pub mod catalog;
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod codeblock;
pub mod error;
pub mod observability;
pub mod types;

// Re-exports
pub use catalog::{DEFAULT_MODEL, ModelCatalog};
pub use client::{CompletionService, OpenAi};
pub use client_logger::{ClientLogger, JsonLinesLogger};
pub use codeblock::{CodeBlock, extract_code_block};
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use types::*;
