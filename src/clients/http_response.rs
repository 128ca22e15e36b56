//! HTTP response types for the GitHub API SDK.
//!
//! This module provides the [`HttpResponse`] envelope returned for every
//! executed request, whether it succeeded or not.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;

use crate::clients::pagination::PageLinks;
use crate::clients::rate_limit::Rate;

/// Header carrying GitHub's request identifier.
pub const HEADER_REQUEST_ID: &str = "x-github-request-id";
/// Header carrying the expiration time of the token used for the request.
pub const HEADER_TOKEN_EXPIRATION: &str = "github-authentication-token-expiration";

/// An HTTP response from the GitHub API.
///
/// Contains the status code, lowercased headers and raw body, plus the
/// pagination cursors from `Link` and the primary rate limit snapshot from
/// the `X-RateLimit-*` headers. Built once per executed request.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub body: Vec<u8>,
    /// Page number of the first page, 0 when absent.
    pub first_page: u32,
    /// Page number of the previous page, 0 when absent.
    pub prev_page: u32,
    /// Page number of the next page, 0 on the last page.
    pub next_page: u32,
    /// Page number of the last page, 0 when absent.
    pub last_page: u32,
    /// Opaque token for the next page.
    pub next_page_token: Option<String>,
    /// Cursor for the next page.
    pub cursor: Option<String>,
    /// `before` cursor of the previous page.
    pub before: Option<String>,
    /// `after` cursor of the next page.
    pub after: Option<String>,
    /// Primary rate limit reported with this response.
    pub rate: Option<Rate>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, parsing `Link` and `X-RateLimit-*`.
    ///
    /// The rate is attributed to `core` when the server does not name a
    /// resource; use [`with_default_resource`](Self::with_default_resource)
    /// when the request category is known.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: Vec<u8>) -> Self {
        Self::with_default_resource(code, headers, body, "core")
    }

    /// Creates a new `HttpResponse`, attributing an unnamed rate limit to
    /// `default_resource`.
    #[must_use]
    pub fn with_default_resource(
        code: u16,
        headers: HashMap<String, Vec<String>>,
        body: Vec<u8>,
        default_resource: &str,
    ) -> Self {
        let links = headers
            .get("link")
            .and_then(|values| values.first())
            .map(|link| PageLinks::parse(link))
            .unwrap_or_default();
        let rate = Rate::from_headers(&headers, default_resource);

        Self {
            code,
            headers,
            body,
            first_page: links.first_page,
            prev_page: links.prev_page,
            next_page: links.next_page,
            last_page: links.last_page,
            next_page_token: links.next_page_token,
            cursor: links.cursor,
            before: links.before,
            after: links.after,
            rate,
        }
    }

    /// Returns the first value of a header, by lowercase name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns `true` for `304 Not Modified`.
    #[must_use]
    pub const fn is_not_modified(&self) -> bool {
        self.code == 304
    }

    /// Returns `true` for `301` and `302`.
    #[must_use]
    pub const fn is_redirect(&self) -> bool {
        self.code == 301 || self.code == 302
    }

    /// Returns `true` if there is a next page by number, token or cursor.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.next_page != 0
            || self.next_page_token.is_some()
            || self.cursor.is_some()
            || self.after.is_some()
    }

    /// Returns the `X-GitHub-Request-Id` header value, if present.
    ///
    /// This ID is useful for debugging and should be included in error reports.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header(HEADER_REQUEST_ID)
    }

    /// Returns the `ETag` validator, for a later conditional request.
    #[must_use]
    pub fn etag(&self) -> Option<&str> {
        self.header("etag")
    }

    /// Returns the `Last-Modified` validator, for a later conditional request.
    #[must_use]
    pub fn last_modified(&self) -> Option<&str> {
        self.header("last-modified")
    }

    /// Returns the `Location` header value, if present.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }

    /// Returns when the token used for the request expires.
    ///
    /// Fine-grained and OAuth tokens report this through
    /// `GitHub-Authentication-Token-Expiration`, formatted either as
    /// `2026-11-01 09:30:00 UTC` or with a numeric offset such as
    /// `2026-11-01 09:30:00 -0700`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use github_api::clients::HttpResponse;
    /// use std::collections::HashMap;
    ///
    /// let mut headers = HashMap::new();
    /// headers.insert(
    ///     "github-authentication-token-expiration".to_string(),
    ///     vec!["2026-11-01 09:30:00 UTC".to_string()],
    /// );
    ///
    /// let response = HttpResponse::new(200, headers, Vec::new());
    /// assert_eq!(response.token_expiration().unwrap().to_rfc3339(), "2026-11-01T09:30:00+00:00");
    /// ```
    #[must_use]
    pub fn token_expiration(&self) -> Option<DateTime<Utc>> {
        let value = self.header(HEADER_TOKEN_EXPIRATION)?.trim();

        if let Some(naive) = value.strip_suffix(" UTC") {
            return NaiveDateTime::parse_from_str(naive, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc());
        }

        DateTime::<FixedOffset>::parse_from_str(value, "%Y-%m-%d %H:%M:%S %z")
            .ok()
            .map(|date| date.with_timezone(&Utc))
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Returns the body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
