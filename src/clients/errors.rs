//! HTTP-specific error types for the GitHub API SDK.
//!
//! This module contains one error type per failure GitHub can report, plus
//! the local request validation error and the unifying [`HttpError`].
//!
//! # Error Handling
//!
//! - [`HttpResponseError`]: Generic non-2xx response with the parsed [`ErrorResponse`]
//! - [`AcceptedError`]: `202 Accepted` from an endpoint that computes results asynchronously
//! - [`RateLimitError`]: The primary rate limit is exhausted
//! - [`AbuseRateLimitError`]: A secondary (abuse) rate limit was triggered
//! - [`PreconditionNotMetError`]: A documented condition such as "Branch not protected"
//! - [`RedirectionError`]: A `301`/`302` that was not followed
//! - [`DecodeError`]: A 2xx body that did not decode into the requested type
//! - [`InvalidHttpRequestError`]: The request failed validation before sending
//! - [`HttpError`]: Unified error type encompassing all of the above
//!
//! Every variant produced after a response was received carries that
//! response; [`HttpError::response`] returns it.
//!
//! # Example
//!
//! ```rust,ignore
//! use github_api::clients::HttpError;
//!
//! match client.send(request).await {
//!     Ok(response) => println!("Success: {}", response.code),
//!     Err(HttpError::RateLimit(e)) => {
//!         println!("Out of requests until {}", e.rate.reset);
//!     }
//!     Err(HttpError::AbuseRateLimit(e)) => {
//!         println!("Slow down, retry after {:?}", e.retry_after);
//!     }
//!     Err(HttpError::Response(e)) => {
//!         println!("API error {}: {}", e.code, e.error.message);
//!     }
//!     Err(e) => println!("Request failed: {e}"),
//! }
//! ```

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::clients::http_response::HttpResponse;
use crate::clients::rate_limit::Rate;

/// Error payload GitHub returns with 4xx and 5xx responses.
///
/// ```json
/// {
///   "message": "Validation Failed",
///   "errors": [{"resource": "Issue", "field": "title", "code": "missing_field"}],
///   "documentation_url": "https://docs.github.com/rest/issues/issues#create-an-issue"
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorResponse {
    /// Human readable error message.
    #[serde(default)]
    pub message: String,
    /// Per-field validation errors.
    #[serde(default)]
    pub errors: Vec<FieldError>,
    /// Link to the documentation of the failing endpoint.
    #[serde(default)]
    pub documentation_url: Option<String>,
    /// Present when the resource was blocked.
    #[serde(default)]
    pub block: Option<ErrorBlock>,
}

impl ErrorResponse {
    /// Parses an error body, falling back to the canonical status text when
    /// the body is not a JSON error object.
    #[must_use]
    pub fn from_body(code: u16, body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_else(|_| Self {
            message: canonical_reason(code),
            ..Self::default()
        })
    }
}

fn canonical_reason(code: u16) -> String {
    reqwest::StatusCode::from_u16(code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .map_or_else(|| format!("HTTP {code}"), ToString::to_string)
}

/// Details about a blocked resource.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBlock {
    /// Why the resource was blocked, e.g. `dmca`.
    #[serde(default)]
    pub reason: Option<String>,
    /// When the block was put in place.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Page describing the block.
    #[serde(default)]
    pub html_url: Option<String>,
}

/// A single validation error.
///
/// GitHub usually sends objects, but some endpoints send bare strings; those
/// end up in `message` with the other fields empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawFieldError")]
pub struct FieldError {
    /// Resource the error applies to, e.g. `Issue`.
    pub resource: Option<String>,
    /// Field the error applies to.
    pub field: Option<String>,
    /// Machine readable code such as `missing_field` or `already_exists`.
    pub code: Option<String>,
    /// Free form message, used by the `custom` code.
    pub message: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFieldError {
    Text(String),
    Detailed {
        #[serde(default)]
        resource: Option<String>,
        #[serde(default)]
        field: Option<String>,
        #[serde(default)]
        code: Option<String>,
        #[serde(default)]
        message: Option<String>,
    },
}

impl From<RawFieldError> for FieldError {
    fn from(raw: RawFieldError) -> Self {
        match raw {
            RawFieldError::Text(message) => Self {
                message: Some(message),
                ..Self::default()
            },
            RawFieldError::Detailed {
                resource,
                field,
                code,
                message,
            } => Self {
                resource,
                field,
                code,
                message,
            },
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.resource, &self.field, &self.code) {
            (Some(resource), Some(field), Some(code)) => {
                write!(f, "{code} error caused by {field} field on {resource} resource")
            }
            _ => f.write_str(self.message.as_deref().unwrap_or("unknown error")),
        }
    }
}

/// Error returned for a non-successful response no other variant describes.
#[derive(Debug, Error)]
#[error("{code} {}", .error.message)]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The parsed error body.
    pub error: ErrorResponse,
    /// Reference ID for error reporting (from `X-GitHub-Request-Id`).
    pub error_reference: Option<String>,
    /// The response that produced this error.
    pub response: Box<HttpResponse>,
}

/// Error returned when an endpoint answers `202 Accepted` while it computes
/// results in the background.
///
/// Repeat the request later to get the data.
#[derive(Debug, Error)]
#[error("job scheduled on GitHub side; try again later")]
pub struct AcceptedError {
    /// The undecoded body of the `202` response.
    pub raw_body: Vec<u8>,
    /// The `202` response.
    pub response: Box<HttpResponse>,
}

/// Error returned when the primary rate limit is exhausted.
///
/// `response` is `None` when the client refused to send the request because
/// the last known rate for its category was already exhausted.
#[derive(Debug, Error)]
#[error("{message} [rate limit resets at {}]", .rate.reset)]
pub struct RateLimitError {
    /// The exhausted rate.
    pub rate: Rate,
    /// Message from the server, or a local description.
    pub message: String,
    /// The response that reported the limit, if a request was sent.
    pub response: Option<Box<HttpResponse>>,
}

/// Error returned when a secondary (abuse) rate limit was triggered.
///
/// This is never stored; it only describes the call that hit it.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct AbuseRateLimitError {
    /// How long to wait before retrying, when the server said so.
    pub retry_after: Option<Duration>,
    /// Message from the server.
    pub message: String,
    /// The response that reported the limit.
    pub response: Box<HttpResponse>,
}

/// Documented conditions GitHub reports through a fixed error message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PreconditionKind {
    /// Branch protection was requested on an unprotected branch.
    BranchNotProtected,
}

impl PreconditionKind {
    /// All known kinds, in matching order.
    pub const ALL: &'static [Self] = &[Self::BranchNotProtected];

    /// The exact `message` GitHub sends for this condition.
    #[must_use]
    pub const fn documented_message(self) -> &'static str {
        match self {
            Self::BranchNotProtected => "Branch not protected",
        }
    }

    /// Returns the kind whose documented message equals `message` exactly.
    #[must_use]
    pub fn from_message(message: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.documented_message() == message)
    }
}

impl fmt::Display for PreconditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.documented_message())
    }
}

/// Error returned when the server reports a documented precondition.
#[derive(Debug, Error)]
#[error("precondition not met: {kind}")]
pub struct PreconditionNotMetError {
    /// Which condition was reported.
    pub kind: PreconditionKind,
    /// The response carrying the condition.
    pub response: Box<HttpResponse>,
}

/// Error returned for a `301`/`302` that was not followed.
#[derive(Debug, Error)]
#[error("unexpected redirect ({code}) to {}", .location.as_deref().unwrap_or("<no location>"))]
pub struct RedirectionError {
    /// The redirect status code.
    pub code: u16,
    /// The `Location` the server pointed at.
    pub location: Option<String>,
    /// The redirect response.
    pub response: Box<HttpResponse>,
}

/// Error returned when a 2xx body does not decode into the requested type.
#[derive(Debug, Error)]
#[error("failed to decode response body: {source}")]
pub struct DecodeError {
    /// The decoding failure.
    #[source]
    pub source: serde_json::Error,
    /// The response whose body failed to decode.
    pub response: Box<HttpResponse>,
}

/// Error returned when an HTTP request fails validation.
///
/// Nothing is sent when this error is returned.
///
/// # Example
///
/// ```rust
/// use github_api::clients::InvalidHttpRequestError;
///
/// let error = InvalidHttpRequestError::EmptyPath;
/// assert_eq!(error.to_string(), "Request path cannot be empty.");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The request path is empty.
    #[error("Request path cannot be empty.")]
    EmptyPath,

    /// A path, path segment or query value contains a control character.
    #[error("Invalid control character in {value:?}.")]
    ControlCharacter {
        /// The offending value, with control characters escaped.
        value: String,
    },

    /// A path segment is `.` or `..`, which URL resolution would collapse.
    #[error("Invalid path segment {value:?}.")]
    DotSegment {
        /// The value containing the segment.
        value: String,
    },

    /// A header name or value cannot be sent.
    #[error("Invalid header {name}.")]
    InvalidHeader {
        /// The header name.
        name: String,
    },

    /// The request URL cannot be built.
    #[error("Invalid request URL {url}: {reason}")]
    InvalidUrl {
        /// The path or URL that failed to resolve.
        url: String,
        /// Why resolution failed.
        reason: String,
    },

    /// The body or query options could not be serialized.
    #[error("Failed to serialize request: {reason}")]
    Serialization {
        /// The serializer's message.
        reason: String,
    },
}

/// Unified error type for all HTTP-related errors.
///
/// # Example
///
/// ```rust,ignore
/// use github_api::clients::HttpError;
///
/// let result = client.send(request).await;
/// match result {
///     Ok(response) => { /* handle success */ }
///     Err(HttpError::PreconditionNotMet(e)) => { /* e.g. branch not protected */ }
///     Err(e) => { /* everything else */ }
/// }
/// ```
#[derive(Debug, Error)]
pub enum HttpError {
    /// A non-2xx response with no more specific meaning.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// `202 Accepted` from an async endpoint.
    #[error(transparent)]
    Accepted(#[from] AcceptedError),

    /// The primary rate limit is exhausted.
    #[error(transparent)]
    RateLimit(#[from] RateLimitError),

    /// A secondary rate limit was triggered.
    #[error(transparent)]
    AbuseRateLimit(#[from] AbuseRateLimitError),

    /// A documented precondition was reported.
    #[error(transparent)]
    PreconditionNotMet(#[from] PreconditionNotMetError),

    /// A redirect was not followed.
    #[error(transparent)]
    Redirect(#[from] RedirectionError),

    /// A 2xx body did not decode.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The caller cancelled the request.
    #[error("Request cancelled")]
    Cancelled,
}

impl HttpError {
    /// Returns the response this error was built from, if one was received.
    #[must_use]
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            Self::Response(e) => Some(&e.response),
            Self::Accepted(e) => Some(&e.response),
            Self::RateLimit(e) => e.response.as_deref(),
            Self::AbuseRateLimit(e) => Some(&e.response),
            Self::PreconditionNotMet(e) => Some(&e.response),
            Self::Redirect(e) => Some(&e.response),
            Self::Decode(e) => Some(&e.response),
            Self::InvalidRequest(_) | Self::Network(_) | Self::Cancelled => None,
        }
    }

    /// Returns the status code of the received response, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.response().map(|response| response.code)
    }
}
