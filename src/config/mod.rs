//! Configuration types for the GitHub API SDK.
//!
//! This module provides the configuration used to construct an
//! [`HttpClient`](crate::clients::HttpClient).
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`GitHubConfig`]: The configuration struct holding all SDK settings
//! - [`GitHubConfigBuilder`]: A builder for constructing [`GitHubConfig`] instances
//! - [`AccessToken`]: A validated token newtype with masked debug output
//! - [`BaseUrl`]: A validated API base URL, always ending in `/`
//! - [`ApiVersion`]: The REST API version sent in `X-GitHub-Api-Version`
//!
//! # Example
//!
//! ```rust
//! use github_api::{GitHubConfig, Credentials, ApiVersion};
//!
//! let config = GitHubConfig::builder()
//!     .credentials(Credentials::token("ghp_example").unwrap())
//!     .api_version(ApiVersion::latest())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.base_url().as_ref(), "https://api.github.com/");
//! ```

mod newtypes;
mod version;

use std::time::Duration;

pub use newtypes::{AccessToken, BaseUrl};
pub use version::ApiVersion;

use crate::auth::Credentials;
use crate::error::ConfigError;

/// Configuration for the GitHub API SDK.
///
/// # Thread Safety
///
/// `GitHubConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
#[derive(Clone, Debug)]
pub struct GitHubConfig {
    base_url: BaseUrl,
    credentials: Credentials,
    api_version: ApiVersion,
    user_agent_prefix: Option<String>,
    timeout: Option<Duration>,
    rate_limit_precheck: bool,
}

impl GitHubConfig {
    /// Creates a new builder for constructing a `GitHubConfig`.
    #[must_use]
    pub fn builder() -> GitHubConfigBuilder {
        GitHubConfigBuilder::new()
    }

    /// Returns the base URL every relative request path is resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the configured credentials.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the API version.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the client-wide request timeout, if configured.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns whether requests are short-circuited while the primary rate
    /// limit for their category is known to be exhausted.
    #[must_use]
    pub const fn rate_limit_precheck(&self) -> bool {
        self.rate_limit_precheck
    }
}

// Verify GitHubConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GitHubConfig>();
};

/// Builder for constructing [`GitHubConfig`] instances.
///
/// # Defaults
///
/// - `base_url`: `https://api.github.com/`
/// - `credentials`: [`Credentials::Anonymous`]
/// - `api_version`: Latest known version
/// - `user_agent_prefix`: `None`
/// - `timeout`: `None` (no client-wide timeout)
/// - `rate_limit_precheck`: `true`
///
/// # Example
///
/// ```rust
/// use github_api::{GitHubConfig, BaseUrl, Credentials};
/// use std::time::Duration;
///
/// let config = GitHubConfig::builder()
///     .base_url(BaseUrl::new("https://ghe.example.com/api/v3").unwrap())
///     .credentials(Credentials::token("ghp_example").unwrap())
///     .user_agent_prefix("release-bot/2.1")
///     .timeout(Duration::from_secs(30))
///     .build()
///     .unwrap();
///
/// assert_eq!(config.base_url().as_ref(), "https://ghe.example.com/api/v3/");
/// ```
#[derive(Debug, Default)]
pub struct GitHubConfigBuilder {
    base_url: Option<BaseUrl>,
    credentials: Option<Credentials>,
    api_version: Option<ApiVersion>,
    user_agent_prefix: Option<String>,
    timeout: Option<Duration>,
    rate_limit_precheck: Option<bool>,
}

impl GitHubConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL (e.g. a GitHub Enterprise API root).
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the credentials.
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the API version.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets a timeout applied to every request made by the client.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Enables or disables the pre-request rate limit check.
    #[must_use]
    pub const fn rate_limit_precheck(mut self, enabled: bool) -> Self {
        self.rate_limit_precheck = Some(enabled);
        self
    }

    /// Builds the [`GitHubConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUserAgent`] if the user agent prefix
    /// contains control characters.
    pub fn build(self) -> Result<GitHubConfig, ConfigError> {
        if let Some(prefix) = &self.user_agent_prefix {
            if prefix.chars().any(char::is_control) {
                return Err(ConfigError::InvalidUserAgent {
                    prefix: prefix.clone(),
                });
            }
        }

        let base_url = match self.base_url {
            Some(url) => url,
            None => BaseUrl::new(BaseUrl::GITHUB)?,
        };

        Ok(GitHubConfig {
            base_url,
            credentials: self.credentials.unwrap_or_default(),
            api_version: self.api_version.unwrap_or_default(),
            user_agent_prefix: self.user_agent_prefix,
            timeout: self.timeout,
            rate_limit_precheck: self.rate_limit_precheck.unwrap_or(true),
        })
    }
}
