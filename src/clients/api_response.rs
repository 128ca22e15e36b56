//! Typed response wrapper.
//!
//! [`ApiResponse<T>`] pairs the decoded body of a successful call with the
//! [`HttpResponse`] envelope it came from, so wrappers can hand out typed
//! data without losing pagination cursors, rate limit or validators.
//!
//! # Example
//!
//! ```rust,ignore
//! use github_api::clients::{ApiResponse, HttpMethod, HttpRequest, ListOptions};
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "orgs/rust-lang/repos")
//!     .query_options(&ListOptions::page(2))
//!     .build()?;
//! let response: ApiResponse<Vec<serde_json::Value>> = client.execute(request).await?;
//!
//! for repo in response.data().into_iter().flatten() {
//!     println!("{}", repo["full_name"]);
//! }
//!
//! if response.has_next_page() {
//!     println!("next page: {}", response.next_page());
//! }
//! ```

use serde::de::DeserializeOwned;

use crate::clients::errors::{DecodeError, HttpError};
use crate::clients::http_response::HttpResponse;
use crate::clients::rate_limit::Rate;

/// A decoded response together with its envelope.
///
/// `data` is `None` when there was nothing to decode: `204 No Content`,
/// `304 Not Modified`, or an empty body.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    data: Option<T>,
    response: HttpResponse,
}

impl<T> ApiResponse<T> {
    /// Creates a new `ApiResponse` from already decoded data.
    #[must_use]
    pub const fn new(data: Option<T>, response: HttpResponse) -> Self {
        Self { data, response }
    }

    /// Returns the decoded data, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Consumes the response and returns the decoded data.
    #[must_use]
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// Consumes the response and returns both parts.
    #[must_use]
    pub fn into_parts(self) -> (Option<T>, HttpResponse) {
        (self.data, self.response)
    }

    /// Returns the envelope.
    #[must_use]
    pub const fn response(&self) -> &HttpResponse {
        &self.response
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.response.code
    }

    /// Returns `true` for `304 Not Modified`.
    #[must_use]
    pub const fn is_not_modified(&self) -> bool {
        self.response.is_not_modified()
    }

    /// Returns the next page number, 0 on the last page.
    #[must_use]
    pub const fn next_page(&self) -> u32 {
        self.response.next_page
    }

    /// Returns the previous page number, 0 on the first page.
    #[must_use]
    pub const fn prev_page(&self) -> u32 {
        self.response.prev_page
    }

    /// Returns the last page number, 0 when unknown.
    #[must_use]
    pub const fn last_page(&self) -> u32 {
        self.response.last_page
    }

    /// Returns `true` if there is a next page by number, token or cursor.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.response.has_next_page()
    }

    /// Returns the primary rate limit reported with this response.
    #[must_use]
    pub const fn rate(&self) -> Option<&Rate> {
        self.response.rate.as_ref()
    }

    /// Returns the `ETag` validator for a later conditional request.
    #[must_use]
    pub fn etag(&self) -> Option<&str> {
        self.response.etag()
    }

    /// Returns the request ID from `X-GitHub-Request-Id`.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.response.request_id()
    }

    /// Transforms the data while keeping the envelope.
    pub fn map<U, F>(self, f: F) -> ApiResponse<U>
    where
        F: FnOnce(T) -> U,
    {
        ApiResponse {
            data: self.data.map(f),
            response: self.response,
        }
    }
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Decodes a successful response.
    ///
    /// Nothing is decoded for `204`, `304` or an empty body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Decode`] carrying the envelope if the body is not
    /// valid JSON for `T`.
    pub fn from_http_response(response: HttpResponse) -> Result<Self, HttpError> {
        if response.code == 204 || response.code == 304 || response.body.is_empty() {
            return Ok(Self::new(None, response));
        }

        match serde_json::from_slice(&response.body) {
            Ok(data) => Ok(Self::new(Some(data), response)),
            Err(source) => Err(DecodeError {
                source,
                response: Box::new(response),
            }
            .into()),
        }
    }
}

// Verify ApiResponse is Send + Sync when T is Send + Sync
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiResponse<String>>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Branch {
        name: String,
        protected: bool,
    }

    fn response(code: u16, body: &str) -> HttpResponse {
        HttpResponse::new(code, HashMap::new(), body.as_bytes().to_vec())
    }

    #[test]
    fn test_from_http_response_decodes_data() {
        let api: ApiResponse<Branch> =
            ApiResponse::from_http_response(response(200, r#"{"name":"main","protected":true}"#))
                .unwrap();

        assert_eq!(
            api.data(),
            Some(&Branch {
                name: "main".to_string(),
                protected: true
            })
        );
        assert_eq!(api.status(), 200);
    }

    #[test]
    fn test_no_content_and_not_modified_skip_decoding() {
        let api: ApiResponse<Branch> =
            ApiResponse::from_http_response(response(204, "")).unwrap();
        assert!(api.data().is_none());

        let api: ApiResponse<Branch> =
            ApiResponse::from_http_response(response(304, "garbage")).unwrap();
        assert!(api.data().is_none());
        assert!(api.is_not_modified());

        let api: ApiResponse<Branch> =
            ApiResponse::from_http_response(response(200, "")).unwrap();
        assert!(api.data().is_none());
    }

    #[test]
    fn test_decode_failure_keeps_envelope() {
        let result: Result<ApiResponse<Branch>, _> =
            ApiResponse::from_http_response(response(200, r#"{"name":1}"#));

        match result {
            Err(HttpError::Decode(e)) => {
                assert_eq!(e.response.code, 200);
                assert_eq!(e.response.body, br#"{"name":1}"#.to_vec());
            }
            other => panic!("expected Decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_pagination_accessors() {
        let mut headers = HashMap::new();
        headers.insert(
            "link".to_string(),
            vec![r#"<https://api.github.com/x?page=3>; rel="next", <https://api.github.com/x?page=9>; rel="last", <https://api.github.com/x?page=1>; rel="prev""#.to_string()],
        );
        let api: ApiResponse<Vec<u32>> =
            ApiResponse::from_http_response(HttpResponse::new(200, headers, b"[1,2]".to_vec()))
                .unwrap();

        assert_eq!(api.next_page(), 3);
        assert_eq!(api.prev_page(), 1);
        assert_eq!(api.last_page(), 9);
        assert!(api.has_next_page());
    }

    #[test]
    fn test_map_transforms_data_preserving_envelope() {
        let api: ApiResponse<Vec<u32>> =
            ApiResponse::from_http_response(response(200, "[1,2,3]")).unwrap();
        let count = api.map(|values| values.len());

        assert_eq!(count.data(), Some(&3));
        assert_eq!(count.response().body, b"[1,2,3]".to_vec());
    }
}
