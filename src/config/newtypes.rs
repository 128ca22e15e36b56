//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use reqwest::Url;
use std::fmt;

/// A validated GitHub access token.
///
/// This newtype ensures the token is non-empty and masks its value in debug
/// output to prevent accidental exposure in logs.
///
/// # Example
///
/// ```rust
/// use github_api::AccessToken;
///
/// let token = AccessToken::new("ghp_example").unwrap();
/// assert_eq!(token.as_ref(), "ghp_example");
/// assert_eq!(format!("{:?}", token), "AccessToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Creates a new validated access token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAccessToken`] if the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::EmptyAccessToken);
        }
        Ok(Self(token))
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(*****)")
    }
}

/// A validated base URL for API requests.
///
/// Only `http` and `https` URLs with a host are accepted. The path is
/// normalized to end with `/` so that relative endpoint paths resolve below
/// it, which matters for GitHub Enterprise hosts served under `/api/v3/`.
///
/// # Example
///
/// ```rust
/// use github_api::BaseUrl;
///
/// let url = BaseUrl::new("https://ghe.example.com/api/v3").unwrap();
/// assert_eq!(url.as_ref(), "https://ghe.example.com/api/v3/");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// The public GitHub REST endpoint.
    pub const GITHUB: &'static str = "https://api.github.com/";

    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL does not parse, has
    /// no host, uses a scheme other than `http`/`https`, or carries a query
    /// or fragment.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = url.into();
        let raw = raw.trim();
        let invalid = || ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
        };

        let mut parsed = Url::parse(raw).map_err(|_| invalid())?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(invalid());
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(invalid());
        }

        if !parsed.path().ends_with('/') {
            let path = format!("{}/", parsed.path());
            parsed.set_path(&path);
        }

        Ok(Self(parsed))
    }

    /// Returns the parsed URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.0
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_rejects_empty_string() {
        assert!(matches!(
            AccessToken::new(""),
            Err(ConfigError::EmptyAccessToken)
        ));
        assert!(matches!(
            AccessToken::new("   "),
            Err(ConfigError::EmptyAccessToken)
        ));
    }

    #[test]
    fn test_access_token_masks_value_in_debug() {
        let token = AccessToken::new("ghp_super_secret").unwrap();
        let debug_output = format!("{token:?}");
        assert_eq!(debug_output, "AccessToken(*****)");
        assert!(!debug_output.contains("ghp_super_secret"));
    }

    #[test]
    fn test_base_url_appends_trailing_slash() {
        let url = BaseUrl::new("https://ghe.example.com/api/v3").unwrap();
        assert_eq!(url.as_ref(), "https://ghe.example.com/api/v3/");

        let url = BaseUrl::new("http://127.0.0.1:8080").unwrap();
        assert_eq!(url.as_ref(), "http://127.0.0.1:8080/");
    }

    #[test]
    fn test_base_url_keeps_existing_trailing_slash() {
        let url = BaseUrl::new("https://api.github.com/").unwrap();
        assert_eq!(url.as_ref(), "https://api.github.com/");
    }

    #[test]
    fn test_base_url_rejects_invalid() {
        assert!(BaseUrl::new("api.github.com").is_err());
        assert!(BaseUrl::new("ftp://api.github.com/").is_err());
        assert!(BaseUrl::new("https://api.github.com/?x=1").is_err());
        assert!(BaseUrl::new("").is_err());
    }

    #[test]
    fn test_base_url_public_github_constant_is_valid() {
        assert_eq!(BaseUrl::new(BaseUrl::GITHUB).unwrap().as_ref(), BaseUrl::GITHUB);
    }
}
