//! Mapping of non-successful responses to typed errors.
//!
//! [`HttpClient`](crate::clients::HttpClient) hands every response it does
//! not return as a success to an [`ErrorClassifier`]. The default
//! [`GitHubErrorClassifier`] encodes GitHub's conventions for rate limits,
//! documented preconditions and redirects; a different policy can be
//! installed with
//! [`HttpClient::with_classifier`](crate::clients::HttpClient::with_classifier).

use std::fmt::Debug;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::clients::errors::{
    AbuseRateLimitError, AcceptedError, ErrorResponse, HttpError, HttpResponseError,
    PreconditionKind, PreconditionNotMetError, RateLimitError, RedirectionError,
};
use crate::clients::http_response::HttpResponse;
use crate::clients::rate_limit::{Rate, HEADER_RATE_REMAINING, HEADER_RATE_RESET};

/// Turns a response into the error it represents.
pub trait ErrorClassifier: Send + Sync + Debug {
    /// Classifies `response`.
    ///
    /// `async_accepted` is the request's flag saying that `202 Accepted`
    /// means "results are being computed".
    fn classify(&self, response: HttpResponse, async_accepted: bool) -> HttpError;
}

/// GitHub's error conventions.
///
/// Rules, first match wins:
///
/// 1. `202` on an async endpoint is [`HttpError::Accepted`].
/// 2. `403`/`429` with `Retry-After` is [`HttpError::AbuseRateLimit`].
/// 3. `403`/`429` with `X-RateLimit-Remaining: 0` and a reset time is
///    [`HttpError::RateLimit`].
/// 4. `400`/`404` whose `message` is a documented sentinel is
///    [`HttpError::PreconditionNotMet`].
/// 5. `403`/`429` whose `documentation_url` points at the secondary rate limit
///    docs is [`HttpError::AbuseRateLimit`].
/// 6. `301`/`302` is [`HttpError::Redirect`].
/// 7. Anything else is [`HttpError::Response`].
#[derive(Clone, Copy, Debug, Default)]
pub struct GitHubErrorClassifier;

const SECONDARY_LIMIT_DOC_SUFFIXES: &[&str] = &["#abuse-rate-limits", "secondary-rate-limits"];

impl ErrorClassifier for GitHubErrorClassifier {
    fn classify(&self, response: HttpResponse, async_accepted: bool) -> HttpError {
        let code = response.code;

        if code == 202 && async_accepted {
            return AcceptedError {
                raw_body: response.body.clone(),
                response: Box::new(response),
            }
            .into();
        }

        if code == 301 || code == 302 {
            return RedirectionError {
                code,
                location: response.location().map(ToString::to_string),
                response: Box::new(response),
            }
            .into();
        }

        let error = ErrorResponse::from_body(code, &response.body);
        let limited = code == 403 || code == 429;

        if limited {
            if let Some(value) = response.header("retry-after") {
                let retry_after = parse_retry_after(value, Utc::now());
                tracing::warn!(
                    status = code,
                    retry_after_secs = retry_after.map(|d| d.as_secs()),
                    "Secondary rate limit hit"
                );
                return AbuseRateLimitError {
                    retry_after,
                    message: error.message,
                    response: Box::new(response),
                }
                .into();
            }

            if let Some(rate) = exhausted_rate(&response) {
                tracing::warn!(
                    resource = %rate.resource,
                    reset = %rate.reset,
                    "Primary rate limit exhausted"
                );
                return RateLimitError {
                    rate,
                    message: error.message,
                    response: Some(Box::new(response)),
                }
                .into();
            }
        }

        if code == 400 || code == 404 {
            if let Some(kind) = PreconditionKind::from_message(&error.message) {
                return PreconditionNotMetError {
                    kind,
                    response: Box::new(response),
                }
                .into();
            }
        }

        if limited && is_secondary_limit_doc(&error) {
            let retry_after = response.rate.as_ref().map(|rate| {
                (rate.reset - Utc::now())
                    .to_std()
                    .unwrap_or(Duration::ZERO)
            });
            tracing::warn!(status = code, "Secondary rate limit hit");
            return AbuseRateLimitError {
                retry_after,
                message: error.message,
                response: Box::new(response),
            }
            .into();
        }

        HttpResponseError {
            code,
            error_reference: response.request_id().map(ToString::to_string),
            error,
            response: Box::new(response),
        }
        .into()
    }
}

/// `Retry-After` is either delay seconds or an HTTP-date. A date in the
/// past means no wait.
fn parse_retry_after(value: &str, now: DateTime<Utc>) -> Option<Duration> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    let at = DateTime::parse_from_rfc2822(value).ok()?.with_timezone(&Utc);
    Some((at - now).to_std().unwrap_or(Duration::ZERO))
}

/// The primary limit is only reported as exhausted when the reset time is
/// present; the rate is built from the headers even if the server did not
/// include the limit itself.
fn exhausted_rate(response: &HttpResponse) -> Option<Rate> {
    if response.header(HEADER_RATE_REMAINING).map(str::trim) != Some("0") {
        return None;
    }
    response.header(HEADER_RATE_RESET)?;

    response.rate.clone().or_else(|| {
        let reset_secs = response.header(HEADER_RATE_RESET)?.trim().parse().ok()?;
        Some(Rate {
            limit: 0,
            remaining: 0,
            used: 0,
            reset: DateTime::<Utc>::from_timestamp(reset_secs, 0)?,
            resource: "core".to_string(),
        })
    })
}

fn is_secondary_limit_doc(error: &ErrorResponse) -> bool {
    error.documentation_url.as_deref().is_some_and(|url| {
        SECONDARY_LIMIT_DOC_SUFFIXES
            .iter()
            .any(|suffix| url.ends_with(suffix))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn response(code: u16, headers: &[(&str, &str)], body: &str) -> HttpResponse {
        let headers = headers
            .iter()
            .map(|(k, v)| ((*k).to_string(), vec![(*v).to_string()]))
            .collect::<HashMap<_, _>>();
        HttpResponse::new(code, headers, body.as_bytes().to_vec())
    }

    fn classify(response: HttpResponse) -> HttpError {
        GitHubErrorClassifier.classify(response, false)
    }

    #[test]
    fn test_accepted_only_with_async_flag() {
        let error = GitHubErrorClassifier.classify(response(202, &[], r#"{"a":1}"#), true);
        match error {
            HttpError::Accepted(e) => assert_eq!(e.raw_body, br#"{"a":1}"#.to_vec()),
            other => panic!("expected Accepted, got {other:?}"),
        }
    }

    #[test]
    fn test_retry_after_wins_over_primary_limit_headers() {
        let error = classify(response(
            403,
            &[
                ("retry-after", "30"),
                ("x-ratelimit-limit", "5000"),
                ("x-ratelimit-remaining", "0"),
                ("x-ratelimit-reset", "1893456000"),
            ],
            r#"{"message":"You have exceeded a secondary rate limit."}"#,
        ));

        match error {
            HttpError::AbuseRateLimit(e) => {
                assert_eq!(e.retry_after, Some(Duration::from_secs(30)));
                assert_eq!(e.message, "You have exceeded a secondary rate limit.");
            }
            other => panic!("expected AbuseRateLimit, got {other:?}"),
        }
    }

    #[test]
    fn test_retry_after_http_date_is_secondary_limit() {
        let error = classify(response(
            429,
            &[
                ("retry-after", "Wed, 21 Oct 2026 07:28:00 GMT"),
                ("x-ratelimit-remaining", "0"),
                ("x-ratelimit-reset", "1893456000"),
            ],
            r#"{"message":"slow down"}"#,
        ));
        assert!(matches!(error, HttpError::AbuseRateLimit(_)));
    }

    #[test]
    fn test_parse_retry_after_forms() {
        let now = DateTime::parse_from_rfc2822("Wed, 21 Oct 2026 07:27:00 GMT")
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(parse_retry_after(" 120 ", now), Some(Duration::from_secs(120)));
        assert_eq!(
            parse_retry_after("Wed, 21 Oct 2026 07:28:00 GMT", now),
            Some(Duration::from_secs(60))
        );
        assert_eq!(
            parse_retry_after("Wed, 21 Oct 2026 07:00:00 GMT", now),
            Some(Duration::ZERO)
        );
        assert_eq!(parse_retry_after("soon", now), None);
    }

    #[test]
    fn test_unparsable_retry_after_is_still_secondary_limit() {
        let error = classify(response(403, &[("retry-after", "soon")], "{}"));
        match error {
            HttpError::AbuseRateLimit(e) => assert!(e.retry_after.is_none()),
            other => panic!("expected AbuseRateLimit, got {other:?}"),
        }
    }

    #[test]
    fn test_exhausted_primary_limit() {
        let error = classify(response(
            403,
            &[
                ("x-ratelimit-limit", "60"),
                ("x-ratelimit-remaining", "0"),
                ("x-ratelimit-reset", "1372700873"),
            ],
            r#"{"message":"API rate limit exceeded for 1.2.3.4."}"#,
        ));

        match error {
            HttpError::RateLimit(e) => {
                assert_eq!(e.rate.remaining, 0);
                assert_eq!(e.rate.limit, 60);
                assert_eq!(e.rate.reset.timestamp(), 1_372_700_873);
                assert!(e.response.is_some());
            }
            other => panic!("expected RateLimit, got {other:?}"),
        }
    }

    #[test]
    fn test_remaining_zero_without_reset_is_generic() {
        let error = classify(response(
            429,
            &[("x-ratelimit-remaining", "0")],
            r#"{"message":"Too many"}"#,
        ));
        assert!(matches!(error, HttpError::Response(e) if e.code == 429));
    }

    #[test]
    fn test_branch_not_protected_sentinel() {
        for code in [400, 404] {
            let error = classify(response(code, &[], r#"{"message":"Branch not protected"}"#));
            match error {
                HttpError::PreconditionNotMet(e) => {
                    assert_eq!(e.kind, PreconditionKind::BranchNotProtected);
                    assert_eq!(e.response.code, code);
                }
                other => panic!("expected PreconditionNotMet, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_other_400_message_is_generic() {
        let error = classify(response(400, &[], r#"{"message":"Problems parsing JSON"}"#));
        match error {
            HttpError::Response(e) => {
                assert_eq!(e.code, 400);
                assert_eq!(e.error.message, "Problems parsing JSON");
            }
            other => panic!("expected Response, got {other:?}"),
        }
    }

    #[test]
    fn test_secondary_limit_documentation_url() {
        for url in [
            "https://docs.github.com/rest/overview/resources-in-the-rest-api#abuse-rate-limits",
            "https://docs.github.com/rest/overview/rate-limits-for-the-rest-api#about-secondary-rate-limits",
        ] {
            let body = format!(r#"{{"message":"slow down","documentation_url":"{url}"}}"#);
            for code in [403, 429] {
                let error = classify(response(code, &[], &body));
                match error {
                    HttpError::AbuseRateLimit(e) => assert!(e.retry_after.is_none()),
                    other => panic!("expected AbuseRateLimit, got {other:?}"),
                }
            }
        }
    }

    #[test]
    fn test_secondary_limit_retry_after_from_reset() {
        let reset = (Utc::now() + chrono::Duration::minutes(10)).timestamp().to_string();
        let error = classify(response(
            403,
            &[
                ("x-ratelimit-limit", "5000"),
                ("x-ratelimit-remaining", "4000"),
                ("x-ratelimit-reset", &reset),
            ],
            r#"{"message":"slow down","documentation_url":"https://docs.github.com/x#secondary-rate-limits"}"#,
        ));

        match error {
            HttpError::AbuseRateLimit(e) => {
                let wait = e.retry_after.unwrap();
                assert!(wait > Duration::from_secs(500));
                assert!(wait <= Duration::from_secs(600));
            }
            other => panic!("expected AbuseRateLimit, got {other:?}"),
        }
    }

    #[test]
    fn test_redirect_carries_location() {
        let error = classify(response(
            301,
            &[("location", "https://api.github.com/repos/o/renamed")],
            "",
        ));
        match error {
            HttpError::Redirect(e) => {
                assert_eq!(e.code, 301);
                assert_eq!(e.location.as_deref(), Some("https://api.github.com/repos/o/renamed"));
            }
            other => panic!("expected Redirect, got {other:?}"),
        }
    }

    #[test]
    fn test_unparsable_body_uses_status_text() {
        let error = classify(response(
            503,
            &[("x-github-request-id", "CAFE:42")],
            "<html>unavailable</html>",
        ));
        match error {
            HttpError::Response(e) => {
                assert_eq!(e.error.message, "Service Unavailable");
                assert_eq!(e.error_reference.as_deref(), Some("CAFE:42"));
            }
            other => panic!("expected Response, got {other:?}"),
        }
    }
}
