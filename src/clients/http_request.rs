//! HTTP request types for the GitHub API SDK.
//!
//! This module provides the [`HttpRequest`] type and its builder for
//! constructing requests to the GitHub REST API, along with the option types
//! that shape them: preview media types, conditional-request validators,
//! redirect policy and list options.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::clients::errors::InvalidHttpRequestError;

/// HTTP methods used by the GitHub REST API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP PATCH method for partial updates.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    pub(crate) fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Patch => write!(f, "PATCH"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// An ordered set of media types for the `Accept` header.
///
/// Tokens keep the order they were added in and duplicates are ignored, so
/// the resulting header value is reproducible: `["A", "B"]` is always sent as
/// `A, B`.
///
/// # Example
///
/// ```rust
/// use github_api::clients::MediaTypes;
///
/// let media = MediaTypes::new()
///     .with("application/vnd.github.squirrel-girl-preview")
///     .with("application/vnd.github.mockingbird-preview")
///     .with("application/vnd.github.squirrel-girl-preview");
///
/// assert_eq!(
///     media.header_value().as_deref(),
///     Some("application/vnd.github.squirrel-girl-preview, application/vnd.github.mockingbird-preview")
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MediaTypes(Vec<String>);

impl MediaTypes {
    /// The media type sent when no preview is requested.
    pub const DEFAULT: &'static str = "application/vnd.github+json";

    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds a media type unless it is already present.
    #[must_use]
    pub fn with(mut self, media_type: impl Into<String>) -> Self {
        self.insert(media_type);
        self
    }

    /// Adds a media type unless it is already present.
    pub fn insert(&mut self, media_type: impl Into<String>) {
        let media_type = media_type.into();
        if !self.0.contains(&media_type) {
            self.0.push(media_type);
        }
    }

    /// Returns `true` if no media type was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the media types in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns the joined header value, or `None` when empty.
    #[must_use]
    pub fn header_value(&self) -> Option<String> {
        (!self.0.is_empty()).then(|| self.0.join(", "))
    }
}

impl<S: Into<String>> FromIterator<S> for MediaTypes {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut media = Self::new();
        for media_type in iter {
            media.insert(media_type);
        }
        media
    }
}

/// Validators from an earlier response, used to make a conditional request.
///
/// A request carrying them may be answered with `304 Not Modified`, in which
/// case the caller reuses the body it cached alongside the validators.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Conditional {
    /// Sent as `If-None-Match`.
    pub etag: Option<String>,
    /// Sent as `If-Modified-Since`.
    pub last_modified: Option<String>,
}

impl Conditional {
    /// Validator from an `ETag` header.
    #[must_use]
    pub fn etag(etag: impl Into<String>) -> Self {
        Self {
            etag: Some(etag.into()),
            last_modified: None,
        }
    }

    /// Validator from a `Last-Modified` header.
    #[must_use]
    pub fn last_modified(last_modified: impl Into<String>) -> Self {
        Self {
            etag: None,
            last_modified: Some(last_modified.into()),
        }
    }
}

/// What to do when the server answers `301` or `302`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RedirectPolicy {
    /// Treat the redirect as an error.
    #[default]
    NoRedirect,
    /// Re-issue the request once against `Location`; a second redirect is an
    /// error.
    FollowOnce,
}

/// Offset pagination options.
///
/// `None` and zero fields are left out of the query string so the server
/// default applies.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ListOptions {
    /// Page to fetch, starting at 1.
    #[serde(skip_serializing_if = "is_unset")]
    pub page: Option<u32>,
    /// Results per page (GitHub caps this at 100).
    #[serde(skip_serializing_if = "is_unset")]
    pub per_page: Option<u32>,
}

impl ListOptions {
    /// Options for the given page with the server's default page size.
    #[must_use]
    pub const fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: None,
        }
    }
}

/// Cursor pagination options.
///
/// Endpoints paginated this way take the `after`/`before` values returned in
/// the previous response's `Link` header.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CursorListOptions {
    /// Results per page.
    #[serde(skip_serializing_if = "is_unset")]
    pub per_page: Option<u32>,
    /// Fetch results after this cursor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    /// Fetch results before this cursor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_unset(value: &Option<u32>) -> bool {
    matches!(value, None | Some(0))
}

/// Escapes a single user-controlled path segment.
///
/// Every reserved character is escaped, including `/`, so a branch named
/// `feature/login` stays one segment.
///
/// # Errors
///
/// Returns [`InvalidHttpRequestError::ControlCharacter`] if the segment
/// contains a control character, or [`InvalidHttpRequestError::DotSegment`]
/// if it is `.` or `..`.
///
/// # Example
///
/// ```rust
/// use github_api::clients::escape_path_segment;
///
/// assert_eq!(escape_path_segment("feature/login").unwrap(), "feature%2Flogin");
/// assert!(escape_path_segment("main\n").is_err());
/// assert!(escape_path_segment("..").is_err());
/// ```
pub fn escape_path_segment(segment: &str) -> Result<String, InvalidHttpRequestError> {
    reject_control_characters(segment)?;
    reject_dot_segment(segment, segment)?;
    Ok(urlencoding::encode(segment).into_owned())
}

/// Escapes a value that deliberately spans several path segments.
///
/// The value is split on `/`, each segment is escaped on its own and the
/// segments are joined again, so `heads/foo/bar` keeps its structure while
/// characters like `#` or `%` inside a segment are escaped.
///
/// # Errors
///
/// Returns [`InvalidHttpRequestError::ControlCharacter`] if the value
/// contains a control character, or [`InvalidHttpRequestError::DotSegment`]
/// if any segment is `.` or `..`.
///
/// # Example
///
/// ```rust
/// use github_api::clients::escape_path_segments;
///
/// assert_eq!(escape_path_segments("heads/foo#1/bar").unwrap(), "heads/foo%231/bar");
/// ```
pub fn escape_path_segments(value: &str) -> Result<String, InvalidHttpRequestError> {
    reject_control_characters(value)?;
    value
        .split('/')
        .map(|segment| {
            reject_dot_segment(segment, value)?;
            Ok(urlencoding::encode(segment).into_owned())
        })
        .collect::<Result<Vec<_>, _>>()
        .map(|segments| segments.join("/"))
}

fn reject_dot_segment(segment: &str, value: &str) -> Result<(), InvalidHttpRequestError> {
    if segment == "." || segment == ".." {
        return Err(InvalidHttpRequestError::DotSegment {
            value: value.to_string(),
        });
    }
    Ok(())
}

fn reject_control_characters(value: &str) -> Result<(), InvalidHttpRequestError> {
    if value.chars().any(char::is_control) {
        return Err(InvalidHttpRequestError::ControlCharacter {
            value: value.escape_debug().to_string(),
        });
    }
    Ok(())
}

/// An HTTP request to be sent to the GitHub API.
///
/// Use [`HttpRequest::builder`] to construct requests with the builder pattern.
///
/// # Example
///
/// ```rust
/// use github_api::clients::{HttpRequest, HttpMethod, ListOptions};
/// use serde_json::json;
///
/// // GET request with pagination
/// let get_request = HttpRequest::builder(HttpMethod::Get, "orgs/rust-lang/repos")
///     .query_options(&ListOptions { page: Some(2), per_page: Some(50) })
///     .build()
///     .unwrap();
///
/// // POST request with a JSON body
/// let post_request = HttpRequest::builder(HttpMethod::Post, "repos/o/r/issues")
///     .json(&json!({"title": "Found a bug"}))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The path relative to the API base URL; may carry a query string.
    pub path: String,
    /// The JSON request body, if any.
    pub body: Option<serde_json::Value>,
    /// Query parameters appended to the URL, in order.
    pub query: Vec<(String, String)>,
    /// Media types for the `Accept` header.
    pub media_types: MediaTypes,
    /// Validators for a conditional request.
    pub conditional: Conditional,
    /// Redirect handling for this call.
    pub redirect_policy: RedirectPolicy,
    /// Whether `202 Accepted` means "job queued, poll again later".
    pub async_accepted: bool,
    /// Additional headers to include in the request.
    pub extra_headers: Option<HashMap<String, String>>,
    /// Timeout for this request, overriding the client-wide one.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }

    /// Validates the request, ensuring it can be sent safely.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - the path is empty
    /// - the path or a query parameter contains a control character
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if self.path.trim_start_matches('/').is_empty() {
            return Err(InvalidHttpRequestError::EmptyPath);
        }

        reject_control_characters(&self.path)?;
        for (key, value) in &self.query {
            reject_control_characters(key)?;
            reject_control_characters(value)?;
        }

        Ok(())
    }
}

/// Builder for constructing [`HttpRequest`] instances.
///
/// Serialization failures in [`json`](Self::json) and
/// [`query_options`](Self::query_options) are kept and reported by
/// [`build`](Self::build), so the fluent chain stays unbroken.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    path: String,
    body: Option<serde_json::Value>,
    query: Vec<(String, String)>,
    media_types: MediaTypes,
    conditional: Conditional,
    redirect_policy: RedirectPolicy,
    async_accepted: bool,
    extra_headers: Option<HashMap<String, String>>,
    timeout: Option<Duration>,
    error: Option<InvalidHttpRequestError>,
}

impl HttpRequestBuilder {
    /// Creates a new builder with the required method and path.
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method: method,
            path: path.into(),
            body: None,
            query: Vec::new(),
            media_types: MediaTypes::new(),
            conditional: Conditional::default(),
            redirect_policy: RedirectPolicy::default(),
            async_accepted: false,
            extra_headers: None,
            timeout: None,
            error: None,
        }
    }

    /// Sets an already-built JSON body.
    #[must_use]
    pub fn body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializes `body` as the JSON request body.
    #[must_use]
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => self.body = Some(value),
            Err(e) => self.record(InvalidHttpRequestError::Serialization {
                reason: e.to_string(),
            }),
        }
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Adds every field of an options struct as query parameters.
    ///
    /// Fields skipped by `serde` (such as `None` values marked
    /// `skip_serializing_if`) are omitted.
    #[must_use]
    pub fn query_options<T: Serialize + ?Sized>(mut self, options: &T) -> Self {
        let pairs = serde_urlencoded::to_string(options)
            .map_err(|e| e.to_string())
            .and_then(|encoded| {
                serde_urlencoded::from_str::<Vec<(String, String)>>(&encoded)
                    .map_err(|e| e.to_string())
            });
        match pairs {
            Ok(pairs) => self.query.extend(pairs),
            Err(reason) => self.record(InvalidHttpRequestError::Serialization { reason }),
        }
        self
    }

    /// Adds a media type to the `Accept` header.
    #[must_use]
    pub fn media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_types.insert(media_type);
        self
    }

    /// Replaces the set of `Accept` media types.
    #[must_use]
    pub fn media_types(mut self, media_types: MediaTypes) -> Self {
        self.media_types = media_types;
        self
    }

    /// Makes the request conditional on the given validators.
    #[must_use]
    pub fn conditional(mut self, conditional: Conditional) -> Self {
        self.conditional = conditional;
        self
    }

    /// Sets how `301`/`302` answers are handled.
    #[must_use]
    pub const fn redirect_policy(mut self, policy: RedirectPolicy) -> Self {
        self.redirect_policy = policy;
        self
    }

    /// Marks the endpoint as answering `202 Accepted` while a job runs.
    #[must_use]
    pub const fn async_accepted(mut self, enabled: bool) -> Self {
        self.async_accepted = enabled;
        self
    }

    /// Adds a single extra header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Sets a timeout for this request.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn record(&mut self, error: InvalidHttpRequestError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if serializing the body or query
    /// options failed, or if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let request = HttpRequest {
            http_method: self.http_method,
            path: self.path,
            body: self.body,
            query: self.query,
            media_types: self.media_types,
            conditional: self.conditional,
            redirect_policy: self.redirect_policy,
            async_accepted: self.async_accepted,
            extra_headers: self.extra_headers,
            timeout: self.timeout,
        };
        request.verify()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Post.to_string(), "POST");
        assert_eq!(HttpMethod::Put.to_string(), "PUT");
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_builder_creates_valid_get_request() {
        let request = HttpRequest::builder(HttpMethod::Get, "repos/o/r")
            .build()
            .unwrap();

        assert_eq!(request.http_method, HttpMethod::Get);
        assert_eq!(request.path, "repos/o/r");
        assert!(request.body.is_none());
        assert!(request.query.is_empty());
        assert!(request.media_types.is_empty());
        assert_eq!(request.redirect_policy, RedirectPolicy::NoRedirect);
        assert!(!request.async_accepted);
    }

    #[test]
    fn test_builder_serializes_json_body() {
        #[derive(Serialize)]
        struct NewIssue<'a> {
            title: &'a str,
            labels: Vec<&'a str>,
        }

        let request = HttpRequest::builder(HttpMethod::Post, "repos/o/r/issues")
            .json(&NewIssue {
                title: "Crash on start",
                labels: vec!["bug"],
            })
            .build()
            .unwrap();

        assert_eq!(
            request.body,
            Some(json!({"title": "Crash on start", "labels": ["bug"]}))
        );
    }

    #[test]
    fn test_body_serialization_failure_is_local_error() {
        // Maps with non-string keys cannot be represented as JSON objects.
        let mut map = std::collections::BTreeMap::new();
        map.insert(vec![1u8], "value");

        let result = HttpRequest::builder(HttpMethod::Post, "repos/o/r/issues")
            .json(&map)
            .build();

        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::Serialization { .. })
        ));
    }

    #[test]
    fn test_list_options_omit_none_fields() {
        let request = HttpRequest::builder(HttpMethod::Get, "orgs/o/repos")
            .query_options(&ListOptions {
                page: Some(2),
                per_page: None,
            })
            .build()
            .unwrap();

        assert_eq!(request.query, vec![("page".to_string(), "2".to_string())]);

        let request = HttpRequest::builder(HttpMethod::Get, "orgs/o/repos")
            .query_options(&ListOptions::default())
            .build()
            .unwrap();
        assert!(request.query.is_empty());
    }

    #[test]
    fn test_list_options_omit_zero_fields() {
        let request = HttpRequest::builder(HttpMethod::Get, "orgs/o/repos")
            .query_options(&ListOptions {
                page: Some(0),
                per_page: Some(30),
            })
            .build()
            .unwrap();
        assert_eq!(request.query, vec![("per_page".to_string(), "30".to_string())]);

        let request = HttpRequest::builder(HttpMethod::Get, "orgs/o/audit-log")
            .query_options(&CursorListOptions {
                per_page: Some(0),
                ..CursorListOptions::default()
            })
            .build()
            .unwrap();
        assert!(request.query.is_empty());
    }

    #[test]
    fn test_cursor_options_and_extra_params_keep_order() {
        let request = HttpRequest::builder(HttpMethod::Get, "orgs/o/audit-log")
            .query_param("phrase", "action:repo.create")
            .query_options(&CursorListOptions {
                per_page: Some(100),
                after: Some("MTYx".to_string()),
                before: None,
            })
            .build()
            .unwrap();

        assert_eq!(
            request.query,
            vec![
                ("phrase".to_string(), "action:repo.create".to_string()),
                ("per_page".to_string(), "100".to_string()),
                ("after".to_string(), "MTYx".to_string()),
            ]
        );
    }

    #[test]
    fn test_media_types_keep_declaration_order() {
        let media: MediaTypes = ["B", "A", "B"].into_iter().collect();

        assert_eq!(media.header_value(), Some("B, A".to_string()));
        assert_eq!(media.iter().collect::<Vec<_>>(), vec!["B", "A"]);
        assert!(MediaTypes::new().header_value().is_none());
    }

    #[test]
    fn test_escape_path_segment_escapes_slash() {
        assert_eq!(escape_path_segment("main").unwrap(), "main");
        assert_eq!(escape_path_segment("feat/x").unwrap(), "feat%2Fx");
        assert_eq!(escape_path_segment("a b#c").unwrap(), "a%20b%23c");
    }

    #[test]
    fn test_escape_path_segments_keeps_structure() {
        assert_eq!(escape_path_segments("heads/foo/bar").unwrap(), "heads/foo/bar");
        assert_eq!(escape_path_segments("tags/v1.0 rc").unwrap(), "tags/v1.0%20rc");
        assert_eq!(escape_path_segments("heads/100%").unwrap(), "heads/100%25");
    }

    #[test]
    fn test_escape_rejects_control_characters() {
        assert!(matches!(
            escape_path_segment("b\n"),
            Err(InvalidHttpRequestError::ControlCharacter { .. })
        ));
        assert!(matches!(
            escape_path_segments("heads/\r\nfoo"),
            Err(InvalidHttpRequestError::ControlCharacter { .. })
        ));
    }

    #[test]
    fn test_escape_rejects_dot_segments() {
        for segment in [".", ".."] {
            assert!(matches!(
                escape_path_segment(segment),
                Err(InvalidHttpRequestError::DotSegment { .. })
            ));
        }
        assert!(matches!(
            escape_path_segments("heads/../../../../../user"),
            Err(InvalidHttpRequestError::DotSegment { value }) if value == "heads/../../../../../user"
        ));
        assert!(matches!(
            escape_path_segments("heads/./main"),
            Err(InvalidHttpRequestError::DotSegment { .. })
        ));
        assert_eq!(escape_path_segment("...").unwrap(), "...");
        assert_eq!(escape_path_segments("heads/v1..v2").unwrap(), "heads/v1..v2");
    }

    #[test]
    fn test_verify_rejects_control_characters_in_path() {
        let result = HttpRequest::builder(HttpMethod::Get, "repos/o/r/branches/b\n").build();

        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::ControlCharacter { .. })
        ));
    }

    #[test]
    fn test_verify_rejects_control_characters_in_query() {
        let result = HttpRequest::builder(HttpMethod::Get, "search/issues")
            .query_param("q", "bug\r\nX: y")
            .build();

        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::ControlCharacter { .. })
        ));
    }

    #[test]
    fn test_verify_rejects_empty_path() {
        assert!(matches!(
            HttpRequest::builder(HttpMethod::Get, "/").build(),
            Err(InvalidHttpRequestError::EmptyPath)
        ));
    }

    #[test]
    fn test_builder_with_all_options() {
        let request = HttpRequest::builder(HttpMethod::Get, "repos/o/r/branches/main")
            .media_type("application/vnd.github.luke-cage-preview+json")
            .conditional(Conditional::etag("\"abc\""))
            .redirect_policy(RedirectPolicy::FollowOnce)
            .async_accepted(true)
            .header("X-Custom-Header", "custom-value")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(
            request.media_types.header_value().as_deref(),
            Some("application/vnd.github.luke-cage-preview+json")
        );
        assert_eq!(request.conditional.etag.as_deref(), Some("\"abc\""));
        assert_eq!(request.redirect_policy, RedirectPolicy::FollowOnce);
        assert!(request.async_accepted);
        assert_eq!(
            request.extra_headers.unwrap().get("X-Custom-Header"),
            Some(&"custom-value".to_string())
        );
        assert_eq!(request.timeout, Some(Duration::from_secs(5)));
    }
}
