//! Primary rate limit bookkeeping.
//!
//! GitHub reports the primary limit on every response through the
//! `X-RateLimit-*` headers, separately for each resource category (`core`,
//! `search`, `graphql`, ...). [`RateLimiter`] keeps the most recent value seen
//! for each category so callers can decide when to back off.
//!
//! Secondary (abuse) limits are not stored here; they surface once, as
//! [`AbuseRateLimitError`](crate::clients::AbuseRateLimitError), on the call
//! that hit them.

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};

use crate::clients::http_request::HttpMethod;

/// Header carrying the request quota for the current window.
pub const HEADER_RATE_LIMIT: &str = "x-ratelimit-limit";
/// Header carrying the number of requests left in the current window.
pub const HEADER_RATE_REMAINING: &str = "x-ratelimit-remaining";
/// Header carrying the number of requests made in the current window.
pub const HEADER_RATE_USED: &str = "x-ratelimit-used";
/// Header carrying the window reset time, in epoch seconds.
pub const HEADER_RATE_RESET: &str = "x-ratelimit-reset";
/// Header naming the category the limit applies to.
pub const HEADER_RATE_RESOURCE: &str = "x-ratelimit-resource";

/// A primary rate limit snapshot for one resource category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rate {
    /// Requests allowed per window.
    pub limit: u32,
    /// Requests left in the current window.
    pub remaining: u32,
    /// Requests made in the current window.
    pub used: u32,
    /// When the current window ends.
    pub reset: DateTime<Utc>,
    /// Category name, e.g. `core` or `search`.
    pub resource: String,
}

impl Rate {
    /// Parses a rate from lowercased response headers.
    ///
    /// Returns `None` unless limit, remaining and reset are all present and
    /// numeric. A missing `X-RateLimit-Resource` header falls back to
    /// `default_resource`; a missing `X-RateLimit-Used` is derived from the
    /// other two values.
    #[must_use]
    pub fn from_headers(
        headers: &HashMap<String, Vec<String>>,
        default_resource: &str,
    ) -> Option<Self> {
        let first = |name: &str| {
            headers
                .get(name)
                .and_then(|values| values.first())
                .map(|value| value.trim())
        };

        let limit: u32 = first(HEADER_RATE_LIMIT)?.parse().ok()?;
        let remaining: u32 = first(HEADER_RATE_REMAINING)?.parse().ok()?;
        let reset_secs: i64 = first(HEADER_RATE_RESET)?.parse().ok()?;
        let reset = DateTime::<Utc>::from_timestamp(reset_secs, 0)?;
        let used = first(HEADER_RATE_USED)
            .and_then(|value| value.parse().ok())
            .unwrap_or_else(|| limit.saturating_sub(remaining));
        let resource = first(HEADER_RATE_RESOURCE)
            .filter(|value| !value.is_empty())
            .unwrap_or(default_resource)
            .to_string();

        Some(Self {
            limit,
            remaining,
            used,
            reset,
            resource,
        })
    }

    /// Returns `true` when no requests are left and the window has not reset
    /// yet at `now`.
    #[must_use]
    pub fn is_exhausted_at(&self, now: DateTime<Utc>) -> bool {
        self.remaining == 0 && self.reset > now
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}/{} remaining, resets at {}",
            self.resource, self.remaining, self.limit, self.reset
        )
    }
}

/// Rate limit categories GitHub tracks separately.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RateLimitCategory {
    /// Everything without a dedicated bucket.
    Core,
    /// `/search/*` except code search.
    Search,
    /// `/search/code`.
    CodeSearch,
    /// The GraphQL endpoint.
    Graphql,
    /// `POST /app-manifests/{code}/conversions`.
    IntegrationManifest,
    /// Source imports.
    SourceImport,
    /// SARIF uploads.
    CodeScanningUpload,
    /// Self-hosted runner registration tokens.
    ActionsRunnerRegistration,
    /// SCIM provisioning.
    Scim,
    /// Dependency submission snapshots.
    DependencySnapshots,
    /// Enterprise and organization audit logs.
    AuditLog,
}

impl RateLimitCategory {
    /// Returns the name GitHub uses in `X-RateLimit-Resource`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Search => "search",
            Self::CodeSearch => "code_search",
            Self::Graphql => "graphql",
            Self::IntegrationManifest => "integration_manifest",
            Self::SourceImport => "source_import",
            Self::CodeScanningUpload => "code_scanning_upload",
            Self::ActionsRunnerRegistration => "actions_runner_registration",
            Self::Scim => "scim",
            Self::DependencySnapshots => "dependency_snapshots",
            Self::AuditLog => "audit_log",
        }
    }

    /// Derives the category a request will be counted against.
    ///
    /// `path` is relative to the API root; a leading `/` and any query
    /// string are ignored.
    #[must_use]
    pub fn for_request(method: HttpMethod, path: &str) -> Self {
        let path = path.split('?').next().unwrap_or_default();
        let path = path.trim_start_matches('/');
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["search", "code", ..] => Self::CodeSearch,
            ["search", ..] => Self::Search,
            ["graphql", ..] => Self::Graphql,
            ["scim", ..] => Self::Scim,
            ["app-manifests", _, "conversions"] if method == HttpMethod::Post => {
                Self::IntegrationManifest
            }
            ["repos", _, _, "import", ..] => Self::SourceImport,
            ["repos", _, _, "code-scanning", "sarifs"] if method == HttpMethod::Post => {
                Self::CodeScanningUpload
            }
            ["repos", _, _, "dependency-graph", "snapshots"] if method == HttpMethod::Post => {
                Self::DependencySnapshots
            }
            [.., "actions", "runners", "registration-token"] if method == HttpMethod::Post => {
                Self::ActionsRunnerRegistration
            }
            [.., "audit-log"] => Self::AuditLog,
            _ => Self::Core,
        }
    }
}

impl fmt::Display for RateLimitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last-seen primary rate limit per category.
///
/// One instance is owned by each [`HttpClient`](crate::clients::HttpClient)
/// and shared by all requests made through it. Updates are last-write-wins:
/// under concurrency the stored value reflects whichever response was
/// processed last, not the request issued last.
#[derive(Debug, Default)]
pub struct RateLimiter {
    rates: RwLock<HashMap<String, Rate>>,
}

// Verify RateLimiter is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RateLimiter>();
};

impl RateLimiter {
    /// Creates an empty rate limiter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `rate` as the latest value for its category, replacing any
    /// previous value, and returns it.
    pub fn update(&self, rate: &Rate) -> Rate {
        let mut rates = self.rates.write().unwrap_or_else(PoisonError::into_inner);
        rates.insert(rate.resource.clone(), rate.clone());
        rate.clone()
    }

    /// Returns the latest rate seen for `resource`.
    #[must_use]
    pub fn snapshot(&self, resource: &str) -> Option<Rate> {
        let rates = self.rates.read().unwrap_or_else(PoisonError::into_inner);
        rates.get(resource).cloned()
    }

    /// Returns the latest rate of every category seen so far.
    #[must_use]
    pub fn snapshots(&self) -> HashMap<String, Rate> {
        self.rates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the stored rate for `resource` if it is exhausted at `now`.
    #[must_use]
    pub fn exhausted(&self, resource: &str, now: DateTime<Utc>) -> Option<Rate> {
        self.snapshot(resource)
            .filter(|rate| rate.is_exhausted_at(now))
    }
}
