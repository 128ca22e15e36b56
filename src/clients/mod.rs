//! HTTP client types for GitHub API communication.
//!
//! This module provides the transport layer every endpoint wrapper builds
//! on: request construction, execution, pagination, rate limit tracking and
//! error classification.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: The async HTTP client for API communication
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: The response envelope with pagination and rate limit
//! - [`ApiResponse`]: Decoded data plus its envelope
//! - [`PageLinks`]: Cursors parsed from the `Link` header
//! - [`RateLimiter`]: Last-seen primary rate limit per category
//! - [`ErrorClassifier`]: Maps non-successful responses to [`HttpError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use github_api::{GitHubConfig, Credentials};
//! use github_api::clients::{HttpClient, HttpRequest, HttpMethod, ListOptions};
//!
//! let config = GitHubConfig::builder()
//!     .credentials(Credentials::token("ghp_example")?)
//!     .build()?;
//! let client = HttpClient::new(&config)?;
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "orgs/rust-lang/repos")
//!     .query_options(&ListOptions { page: Some(2), per_page: Some(50) })
//!     .build()?;
//!
//! let response = client.execute::<Vec<serde_json::Value>>(request).await?;
//! println!("next page: {}", response.next_page());
//! println!("core rate: {:?}", client.rate_limit("core"));
//! ```
//!
//! # Retry Behavior
//!
//! The client never retries and never sleeps. Rate limit errors carry the
//! reset time or `Retry-After` delay so the caller can decide when to try
//! again. The only automatic follow-up request is a single redirect hop for
//! requests built with [`RedirectPolicy::FollowOnce`].

mod api_response;
mod classify;
mod errors;
mod http_client;
mod http_request;
mod http_response;
mod pagination;
mod rate_limit;

pub use api_response::ApiResponse;
pub use classify::{ErrorClassifier, GitHubErrorClassifier};
pub use errors::{
    AbuseRateLimitError, AcceptedError, DecodeError, ErrorBlock, ErrorResponse, FieldError,
    HttpError, HttpResponseError, InvalidHttpRequestError, PreconditionKind,
    PreconditionNotMetError, RateLimitError, RedirectionError,
};
pub use http_client::{HttpClient, PreparedRequest, SDK_VERSION};
pub use http_request::{
    escape_path_segment, escape_path_segments, Conditional, CursorListOptions, HttpMethod,
    HttpRequest, HttpRequestBuilder, ListOptions, MediaTypes, RedirectPolicy,
};
pub use http_response::HttpResponse;
pub use pagination::PageLinks;
pub use rate_limit::{Rate, RateLimitCategory, RateLimiter};
