// Public modules
pub mod model;
pub mod response;
pub mod response_request;
pub mod usage;

// Re-exports
pub use model::{Model, TOKENS_PER_MILLION};
pub use response::{
    ASSISTANT_ROLE, IncompleteDetails, OutputContent, OutputItem, Response, ResponseError,
    ResponseStatus,
};
pub use response_request::ResponseRequest;
pub use usage::Usage;
