use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, header};
use serde::Deserialize;

use crate::client_logger::ClientLogger;
use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::types::{Response, ResponseRequest, ResponseStatus};

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Something that turns a request into a reply.
///
/// The chat session only talks to the network through this trait, so tests
/// and alternative transports can stand in for [`OpenAi`].
#[async_trait::async_trait]
pub trait CompletionService: Send + Sync {
    /// Send `request` and wait for the complete reply.
    ///
    /// # Errors
    ///
    /// - [`Error::BadRequest`] when the service rejects the request.
    /// - [`Error::Incomplete`] when the service could not finish generating.
    /// - [`Error::Connection`], [`Error::Timeout`], or [`Error::HttpClient`]
    ///   when the network fails.
    /// - [`Error::Api`] for any other failure status.
    async fn complete(&self, request: &ResponseRequest) -> Result<Response>;
}

#[async_trait::async_trait]
impl<T: CompletionService + ?Sized> CompletionService for Arc<T> {
    async fn complete(&self, request: &ResponseRequest) -> Result<Response> {
        (**self).complete(request).await
    }
}

/// Client for the OpenAI Responses API.
#[derive(Clone)]
pub struct OpenAi {
    client: ReqwestClient,
    headers: HeaderMap,
    base_url: String,
    timeout: Duration,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl OpenAi {
    /// Create a new client.
    ///
    /// The API key can be provided directly or read from the `OPENAI_API_KEY`
    /// environment variable.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_options(api_key, None, None)
    }

    /// Create a new client with custom settings.
    ///
    /// The base URL falls back to `OPENAI_BASE_URL`, then to the public
    /// endpoint.
    pub fn with_options(
        api_key: Option<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = match api_key {
            Some(key) => key,
            None => env::var(API_KEY_ENV).map_err(|_| {
                Error::authentication(format!(
                    "API key not provided and {API_KEY_ENV} environment variable not set"
                ))
            })?,
        };
        if api_key.trim().is_empty() {
            return Err(Error::authentication(format!("{API_KEY_ENV} is empty")));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| Error::authentication("API key contains invalid header characters"))?;
        bearer.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, bearer);

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        let base_url = base_url
            .or_else(|| env::var(BASE_URL_ENV).ok())
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            client,
            headers,
            base_url: normalize_base_url(base_url),
            timeout,
            logger: None,
        })
    }

    /// Attach a logger that sees every request, reply, and failure.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn request_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    async fn send_request(&self, request: &ResponseRequest) -> Result<Response> {
        let url = format!("{}responses", self.base_url);

        let response = self
            .client
            .post(&url)
            .headers(self.headers.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status_code = response.status().as_u16();
        let success = response.status().is_success();
        let body = response.text().await.map_err(|e| self.request_error(e))?;

        if success {
            parse_response_body(status_code, &body)
        } else {
            Err(classify_error_response(status_code, &body))
        }
    }
}

#[async_trait::async_trait]
impl CompletionService for OpenAi {
    async fn complete(&self, request: &ResponseRequest) -> Result<Response> {
        CLIENT_REQUESTS.click();
        if let Some(logger) = &self.logger {
            logger.log_request(request);
        }

        let start = Instant::now();
        let result = self.send_request(request).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

        match &result {
            Ok(response) => {
                if let Some(logger) = &self.logger {
                    logger.log_response(response);
                }
            }
            Err(err) => {
                CLIENT_REQUEST_ERRORS.click();
                if let Some(logger) = &self.logger {
                    logger.log_error(err);
                }
            }
        }
        result
    }
}

impl fmt::Debug for OpenAi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAi")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("logger", &self.logger.is_some())
            .finish_non_exhaustive()
    }
}

fn normalize_base_url(mut base_url: String) -> String {
    if !base_url.ends_with('/') {
        base_url.push('/');
    }
    base_url
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: Option<ErrorField>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Detail(ErrorDetail),
    Message(String),
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    error_type: Option<String>,
    message: Option<String>,
    param: Option<String>,
}

/// Map a non-success status and its body onto an [`Error`].
fn classify_error_response(status_code: u16, body: &str) -> Error {
    let parsed = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.error);
    let (error_type, message, param) = match parsed {
        Some(ErrorField::Detail(detail)) => (
            detail.error_type,
            detail.message.unwrap_or_else(|| body.to_string()),
            detail.param,
        ),
        Some(ErrorField::Message(message)) => (None, message, None),
        None => (None, body.to_string(), None),
    };

    match status_code {
        400 => Error::bad_request(message, param),
        408 => Error::timeout(message, None),
        _ => Error::api(status_code, error_type, message),
    }
}

/// Parse a success body, surfacing incomplete and failed responses as errors.
fn parse_response_body(status_code: u16, body: &str) -> Result<Response> {
    let response: Response = serde_json::from_str(body).map_err(|e| {
        Error::serialization(
            format!("Failed to parse response: {}", e),
            Some(Box::new(e)),
        )
    })?;

    match response.status {
        Some(ResponseStatus::Incomplete) => Err(Error::incomplete(
            response.incomplete_details.and_then(|details| details.reason),
        )),
        Some(ResponseStatus::Failed) => {
            let error = response.error.unwrap_or_default();
            let message = if error.message.is_empty() {
                "response failed".to_string()
            } else {
                error.message
            };
            Err(Error::api(status_code, error.code, message))
        }
        _ => Ok(response),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_uses_nested_message() {
        let body = r#"{"error": {"message": "Invalid model 'gpt-9'", "type": "invalid_request_error", "param": "model", "code": null}}"#;
        let err = classify_error_response(400, body);
        assert!(err.is_client_rejected());
        assert_eq!(
            err.to_string(),
            "Bad request: Invalid model 'gpt-9' (parameter: model)"
        );
    }

    #[test]
    fn bad_request_accepts_string_error() {
        let err = classify_error_response(400, r#"{"error": "input must not be empty"}"#);
        assert!(err.is_client_rejected());
        assert_eq!(err.to_string(), "Bad request: input must not be empty");
    }

    #[test]
    fn unparseable_body_becomes_message() {
        let err = classify_error_response(502, "<html>Bad Gateway</html>");
        assert!(err.is_server_error());
        assert_eq!(err.status_code(), Some(502));
        assert!(err.to_string().contains("Bad Gateway"));
    }

    #[test]
    fn request_timeout_is_transport() {
        let err = classify_error_response(408, "");
        assert!(err.is_timeout());
        assert!(err.is_transport());
    }

    #[test]
    fn unclassified_statuses_are_server_errors() {
        for status in [401, 403, 404, 429, 500, 503] {
            let err = classify_error_response(status, r#"{"error": {"message": "nope"}}"#);
            assert!(err.is_server_error(), "status {status}");
            assert_eq!(err.status_code(), Some(status));
        }
    }

    #[test]
    fn completed_body_parses() {
        let body = r#"{"id": "resp_1", "status": "completed", "output": [{"type": "message", "role": "assistant", "content": [{"type": "output_text", "text": "hi"}]}], "usage": {"input_tokens": 5, "output_tokens": 3}}"#;
        let response = parse_response_body(200, body).unwrap();
        assert_eq!(response.id, "resp_1");
        assert_eq!(response.assistant_text().as_deref(), Some("hi"));
    }

    #[test]
    fn failed_body_with_null_usage_is_a_server_error() {
        let body = r#"{"id": "resp_3", "status": "failed", "error": {"code": "server_error", "message": "The model crashed"}, "output": [], "usage": null}"#;
        let err = parse_response_body(200, body).unwrap_err();
        assert!(err.is_server_error(), "{err}");
        assert!(err.to_string().contains("The model crashed"));
    }

    #[test]
    fn incomplete_body_with_null_usage_is_incomplete() {
        let body = r#"{"id": "resp_4", "status": "incomplete", "incomplete_details": {"reason": "content_filter"}, "output": null, "usage": null}"#;
        let err = parse_response_body(200, body).unwrap_err();
        assert!(err.is_incomplete(), "{err}");
        assert_eq!(err.to_string(), "Incomplete response: content_filter");
    }

    #[test]
    fn incomplete_body_is_an_error() {
        let body = r#"{"id": "resp_2", "status": "incomplete", "incomplete_details": {"reason": "max_output_tokens"}, "output": []}"#;
        let err = parse_response_body(200, body).unwrap_err();
        assert!(err.is_incomplete());
        assert_eq!(err.to_string(), "Incomplete response: max_output_tokens");
    }

    #[test]
    fn failed_body_is_a_server_error() {
        let body = r#"{"id": "resp_3", "status": "failed", "error": {"code": "server_error", "message": "The model crashed"}}"#;
        let err = parse_response_body(200, body).unwrap_err();
        assert!(err.is_server_error());
        assert!(err.to_string().contains("The model crashed"));
    }

    #[test]
    fn garbage_body_is_serialization_error() {
        let err = parse_response_body(200, "not json").unwrap_err();
        assert!(matches!(err, Error::Serialization { .. }));
    }

    #[test]
    fn explicit_options_are_used() {
        let client = OpenAi::with_options(
            Some("sk-test".to_string()),
            Some("http://localhost:8080/v1".to_string()),
            Some(Duration::from_secs(5)),
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/v1/");
        assert_eq!(client.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = OpenAi::with_options(Some("  ".to_string()), None, None).unwrap_err();
        assert!(err.is_authentication());
    }

    #[test]
    fn key_with_newline_is_rejected() {
        let err = OpenAi::with_options(Some("sk-\ntest".to_string()), None, None).unwrap_err();
        assert!(err.is_authentication());
    }

    #[test]
    fn debug_hides_credentials() {
        let client = OpenAi::new(Some("sk-secret".to_string())).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("sk-secret"));
    }
}
