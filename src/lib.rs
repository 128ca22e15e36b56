//! # GitHub API Rust SDK
//!
//! The transport core of a GitHub REST API client: everything an endpoint
//! wrapper needs to build a request, send it, read pagination and rate limit
//! information, and turn failures into typed errors.
//!
//! ## Overview
//!
//! This SDK provides:
//! - Type-safe configuration via [`GitHubConfig`] and [`GitHubConfigBuilder`]
//! - Validated newtypes for credentials, base URL and API version
//! - Request construction with ordered preview media types, conditional
//!   validators and safe path escaping
//! - `Link` header pagination with page numbers, page tokens and cursors
//! - Per-category primary rate limit tracking, shared safely between tasks
//! - A typed error taxonomy: rate limits, secondary limits, async `202`
//!   jobs, documented preconditions, redirects
//!
//! ## Quick Start
//!
//! ```rust
//! use github_api::{GitHubConfig, Credentials, ApiVersion};
//! use github_api::clients::HttpClient;
//!
//! // Create configuration using the builder pattern
//! let config = GitHubConfig::builder()
//!     .credentials(Credentials::token("ghp_example").unwrap())
//!     .api_version(ApiVersion::latest())
//!     .user_agent_prefix("release-bot/2.1")
//!     .build()
//!     .unwrap();
//!
//! let client = HttpClient::new(&config).unwrap();
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use github_api::clients::{HttpClient, HttpError, HttpMethod, HttpRequest, ListOptions};
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "orgs/rust-lang/repos")
//!     .query_options(&ListOptions { page: Some(2), per_page: Some(50) })
//!     .build()?;
//!
//! match client.execute::<Vec<serde_json::Value>>(request).await {
//!     Ok(response) => {
//!         println!("{} repos, next page {}", response.data().map_or(0, Vec::len), response.next_page());
//!     }
//!     Err(HttpError::RateLimit(e)) => println!("rate limited until {}", e.rate.reset),
//!     Err(e) => println!("request failed: {e}"),
//! }
//! ```
//!
//! ## Endpoint Wrappers
//!
//! ```rust,ignore
//! use github_api::clients::RedirectPolicy;
//! use github_api::rest::Repositories;
//!
//! let repos = Repositories::new(&client);
//! let branch = repos.get_branch("o", "r", "main", RedirectPolicy::FollowOnce).await?;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: the rate limiter belongs to the client that uses it
//! - **Fail-fast validation**: newtypes and requests validate on construction
//! - **Thread-safe**: the client is `Send + Sync` and can be shared by tasks
//! - **No hidden retries**: the caller decides when to try again

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use auth::Credentials;
pub use config::{AccessToken, ApiVersion, BaseUrl, GitHubConfig, GitHubConfigBuilder};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    ApiResponse, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder,
    HttpResponse, InvalidHttpRequestError,
};
