//! HTTP client for GitHub API communication.
//!
//! This module provides the [`HttpClient`] type, which turns an
//! [`HttpRequest`] into a wire request, sends it, records the reported rate
//! limit and maps the outcome to a success or a typed [`HttpError`].

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::clients::api_response::ApiResponse;
use crate::clients::classify::{ErrorClassifier, GitHubErrorClassifier};
use crate::clients::errors::{HttpError, InvalidHttpRequestError, RateLimitError};
use crate::clients::http_request::{HttpMethod, HttpRequest, MediaTypes, RedirectPolicy};
use crate::clients::http_response::HttpResponse;
use crate::clients::rate_limit::{Rate, RateLimitCategory, RateLimiter};
use crate::config::{BaseUrl, GitHubConfig};
use crate::error::ConfigError;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A request resolved against the base URL with its final headers, ready to
/// be sent.
///
/// Produced by [`HttpClient::prepare`]; useful to inspect exactly what
/// would go over the wire.
#[derive(Clone, Debug)]
pub struct PreparedRequest {
    /// The request method.
    pub method: HttpMethod,
    /// The absolute URL, including the query string.
    pub url: Url,
    /// Every header that will be sent.
    pub headers: HeaderMap,
    /// The encoded JSON body.
    pub body: Option<Vec<u8>>,
    /// Per-request timeout.
    pub timeout: Option<Duration>,
}

/// HTTP client for making requests to the GitHub API.
///
/// The client handles:
/// - URL resolution against the configured [`BaseUrl`]
/// - Default headers: `User-Agent`, `X-GitHub-Api-Version`, `Authorization`
/// - Primary rate limit bookkeeping through its [`RateLimiter`]
/// - Error classification through an [`ErrorClassifier`]
/// - At most one redirect hop, when the request asks for it
///
/// It never retries or sleeps on its own.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use github_api::{GitHubConfig, Credentials};
/// use github_api::clients::{HttpClient, HttpRequest, HttpMethod};
///
/// let config = GitHubConfig::builder()
///     .credentials(Credentials::token("ghp_example")?)
///     .build()?;
/// let client = HttpClient::new(&config)?;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "repos/rust-lang/rust")
///     .build()?;
/// let response = client.send(request).await?;
/// println!("{}", response.text());
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Base URL every request path is resolved against.
    base_url: BaseUrl,
    /// Headers included in all requests.
    default_headers: HeaderMap,
    /// Last-seen primary rate limits.
    rate_limiter: Arc<RateLimiter>,
    /// Maps non-successful responses to errors.
    classifier: Arc<dyn ErrorClassifier>,
    /// Refuse requests whose category is known to be exhausted.
    rate_limit_precheck: bool,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the given configuration.
    ///
    /// The underlying transport never follows redirects on its own.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the user agent or credentials cannot be
    /// sent as headers, or if the TLS backend fails to initialize.
    ///
    /// # Example
    ///
    /// ```rust
    /// use github_api::GitHubConfig;
    /// use github_api::clients::HttpClient;
    ///
    /// let config = GitHubConfig::builder().build().unwrap();
    /// let client = HttpClient::new(&config).unwrap();
    /// assert_eq!(client.base_url().as_ref(), "https://api.github.com/");
    /// ```
    pub fn new(config: &GitHubConfig) -> Result<Self, ConfigError> {
        let user_agent = config.user_agent_prefix().map_or_else(
            || format!("github-api-rust v{SDK_VERSION}"),
            |prefix| format!("{prefix} | github-api-rust v{SDK_VERSION}"),
        );

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            reqwest::header::USER_AGENT,
            HeaderValue::from_str(&user_agent).map_err(|_| ConfigError::InvalidUserAgent {
                prefix: config.user_agent_prefix().unwrap_or_default().to_string(),
            })?,
        );
        default_headers.insert(
            HeaderName::from_static("x-github-api-version"),
            HeaderValue::from_str(&config.api_version().to_string()).map_err(|_| {
                ConfigError::InvalidApiVersion {
                    version: config.api_version().to_string(),
                }
            })?,
        );
        if let Some(authorization) = config.credentials().authorization_header() {
            let mut value = HeaderValue::from_str(&authorization)
                .map_err(|_| ConfigError::InvalidCredentials)?;
            value.set_sensitive(true);
            default_headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .redirect(reqwest::redirect::Policy::none());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ConfigError::Transport {
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: config.base_url().clone(),
            default_headers,
            rate_limiter: Arc::new(RateLimiter::new()),
            classifier: Arc::new(GitHubErrorClassifier),
            rate_limit_precheck: config.rate_limit_precheck(),
        })
    }

    /// Replaces the error classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: impl ErrorClassifier + 'static) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    /// Replaces the rate limiter, e.g. to share one between clients using
    /// the same credentials.
    #[must_use]
    pub fn with_rate_limiter(mut self, rate_limiter: Arc<RateLimiter>) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// Returns the rate limiter shared by all requests of this client.
    #[must_use]
    pub const fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.rate_limiter
    }

    /// Returns the last primary rate limit seen for `resource`
    /// (e.g. `core`, `search`).
    #[must_use]
    pub fn rate_limit(&self, resource: &str) -> Option<Rate> {
        self.rate_limiter.snapshot(resource)
    }

    /// Returns the last primary rate limit seen for every category.
    #[must_use]
    pub fn rate_limits(&self) -> HashMap<String, Rate> {
        self.rate_limiter.snapshots()
    }

    /// Resolves a request into its wire form without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation,
    /// the path does not resolve below the base URL, a header cannot be
    /// encoded or the body cannot be serialized.
    pub fn prepare(&self, request: &HttpRequest) -> Result<PreparedRequest, InvalidHttpRequestError> {
        request.verify()?;

        let url = self.resolve(&request.path, &request.query)?;

        let mut headers = self.default_headers.clone();
        let accept = request
            .media_types
            .header_value()
            .unwrap_or_else(|| MediaTypes::DEFAULT.to_string());
        headers.insert(reqwest::header::ACCEPT, header_value("Accept", &accept)?);

        if request.body.is_some() {
            headers.insert(
                reqwest::header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
        }
        if let Some(etag) = &request.conditional.etag {
            headers.insert(
                reqwest::header::IF_NONE_MATCH,
                header_value("If-None-Match", etag)?,
            );
        }
        if let Some(last_modified) = &request.conditional.last_modified {
            headers.insert(
                reqwest::header::IF_MODIFIED_SINCE,
                header_value("If-Modified-Since", last_modified)?,
            );
        }
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                let name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
                    InvalidHttpRequestError::InvalidHeader { name: key.clone() }
                })?;
                headers.insert(name, header_value(key, value)?);
            }
        }

        let body = request
            .body
            .as_ref()
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| InvalidHttpRequestError::Serialization {
                reason: e.to_string(),
            })?;

        Ok(PreparedRequest {
            method: request.http_method,
            url,
            headers,
            body,
            timeout: request.timeout,
        })
    }

    /// Sends a request and returns the raw response envelope.
    ///
    /// `2xx` and `304 Not Modified` are successes. Everything else, including
    /// `202 Accepted` on a request marked
    /// [`async_accepted`](crate::clients::HttpRequestBuilder::async_accepted),
    /// is handed to the error classifier.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - The request's rate limit category is known to be exhausted (`RateLimit`)
    /// - Network error occurs (`Network`)
    /// - The response is classified as an error (any other variant)
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let request = HttpRequest::builder(HttpMethod::Get, "repos/o/r/branches/main")
    ///     .conditional(Conditional::etag(cached_etag))
    ///     .build()?;
    ///
    /// let response = client.send(request).await?;
    /// if response.is_not_modified() {
    ///     // reuse the cached body
    /// }
    /// ```
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let category = RateLimitCategory::for_request(request.http_method, &request.path);

        if self.rate_limit_precheck {
            if let Some(rate) = self.rate_limiter.exhausted(category.as_str(), Utc::now()) {
                tracing::warn!(
                    resource = %rate.resource,
                    reset = %rate.reset,
                    "Primary rate limit still exhausted, not sending request"
                );
                return Err(RateLimitError {
                    message: format!(
                        "API rate limit of {} still exceeded until {}, not making remote request.",
                        rate.limit, rate.reset
                    ),
                    rate,
                    response: None,
                }
                .into());
            }
        }

        let mut prepared = self.prepare(&request)?;
        let mut response = self.dispatch(&prepared, category).await?;

        if response.is_redirect() && request.redirect_policy == RedirectPolicy::FollowOnce {
            if let Some(location) = response.location() {
                let target = prepared.url.join(location).map_err(|e| {
                    InvalidHttpRequestError::InvalidUrl {
                        url: location.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                tracing::debug!(
                    status = response.code,
                    from = %prepared.url,
                    to = %target,
                    "Following redirect"
                );
                prepared.url = target;
                response = self.dispatch(&prepared, category).await?;
            }
        }

        let accepted_job = response.code == 202 && request.async_accepted;
        if (response.is_success() && !accepted_job) || response.is_not_modified() {
            return Ok(response);
        }

        Err(self.classifier.classify(response, request.async_accepted))
    }

    /// Sends a request and decodes a successful body into `T`.
    ///
    /// `data` is `None` for `204`, `304` and empty bodies.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`send`](Self::send), plus
    /// [`HttpError::Decode`] when the body does not decode into `T`.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
    ) -> Result<ApiResponse<T>, HttpError> {
        let response = self.send(request).await?;
        ApiResponse::from_http_response(response)
    }

    /// Sends a request, giving up as soon as `cancel` completes.
    ///
    /// Dropping the future returned by [`send`](Self::send) also aborts the
    /// request; this variant is for callers holding a cancellation signal
    /// such as a shutdown channel.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Cancelled`] if `cancel` completes first,
    /// otherwise the same errors as [`send`](Self::send).
    pub async fn send_with_cancellation<C>(
        &self,
        request: HttpRequest,
        cancel: C,
    ) -> Result<HttpResponse, HttpError>
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            () = cancel => {
                tracing::debug!("Request cancelled by caller");
                Err(HttpError::Cancelled)
            }
            result = self.send(request) => result,
        }
    }

    /// Resolves a relative path and query parameters against the base URL.
    fn resolve(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Url, InvalidHttpRequestError> {
        let relative = path.trim_start_matches('/');
        let invalid = |reason: String| InvalidHttpRequestError::InvalidUrl {
            url: path.to_string(),
            reason,
        };

        let mut url = self
            .base_url
            .url()
            .join(relative)
            .map_err(|e| invalid(e.to_string()))?;
        if !url.as_str().starts_with(self.base_url.as_ref()) {
            return Err(invalid("path resolves outside the base URL".to_string()));
        }

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }

    /// Sends one prepared request and records the reported rate limit.
    async fn dispatch(
        &self,
        prepared: &PreparedRequest,
        category: RateLimitCategory,
    ) -> Result<HttpResponse, HttpError> {
        let mut builder = self
            .client
            .request(prepared.method.as_reqwest(), prepared.url.clone())
            .headers(prepared.headers.clone());
        if let Some(body) = &prepared.body {
            builder = builder.body(body.clone());
        }
        if let Some(timeout) = prepared.timeout {
            builder = builder.timeout(timeout);
        }

        tracing::debug!(method = %prepared.method, url = %prepared.url, "Sending GitHub API request");

        let res = builder.send().await?;
        let code = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body = res.bytes().await?.to_vec();

        let response = HttpResponse::with_default_resource(code, headers, body, category.as_str());
        if let Some(rate) = &response.rate {
            self.rate_limiter.update(rate);
        }

        tracing::debug!(
            status = code,
            request_id = response.request_id().unwrap_or_default(),
            "Received GitHub API response"
        );

        Ok(response)
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(headers: &HeaderMap) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, InvalidHttpRequestError> {
    HeaderValue::from_str(value).map_err(|_| InvalidHttpRequestError::InvalidHeader {
        name: name.to_string(),
    })
}
