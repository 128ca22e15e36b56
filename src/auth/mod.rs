//! Credentials attached to outgoing GitHub API requests.
//!
//! GitHub accepts personal access tokens, installation tokens and OAuth
//! tokens as bearer credentials. Basic credentials are still accepted for a
//! few enterprise setups. Requests without credentials are allowed but get a
//! much smaller primary rate limit.
//!
//! # Example
//!
//! ```rust
//! use github_api::{AccessToken, Credentials};
//!
//! let credentials = Credentials::Token(AccessToken::new("ghp_example").unwrap());
//! assert_eq!(
//!     credentials.authorization_header().as_deref(),
//!     Some("Bearer ghp_example")
//! );
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::config::AccessToken;
use crate::error::ConfigError;

/// Authentication material for API requests.
///
/// `Debug` output never contains the secret part.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Credentials {
    /// No `Authorization` header is sent.
    #[default]
    Anonymous,
    /// Sent as `Authorization: Bearer <token>`.
    Token(AccessToken),
    /// Sent as `Authorization: Basic <base64(username:password)>`.
    Basic {
        /// Account name.
        username: String,
        /// Password or token used as password.
        password: AccessToken,
    },
}

impl Credentials {
    /// Creates token credentials from a raw string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAccessToken`] if the token is empty.
    pub fn token(token: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self::Token(AccessToken::new(token)?))
    }

    /// Creates basic credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyUsername`] or
    /// [`ConfigError::EmptyAccessToken`] if either part is empty.
    pub fn basic(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(ConfigError::EmptyUsername);
        }
        Ok(Self::Basic {
            username,
            password: AccessToken::new(password)?,
        })
    }

    /// Returns the `Authorization` header value, or `None` when anonymous.
    #[must_use]
    pub fn authorization_header(&self) -> Option<String> {
        match self {
            Self::Anonymous => None,
            Self::Token(token) => Some(format!("Bearer {}", token.as_ref())),
            Self::Basic { username, password } => {
                let encoded = STANDARD.encode(format!("{username}:{}", password.as_ref()));
                Some(format!("Basic {encoded}"))
            }
        }
    }

    /// Returns `true` when no credentials are configured.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }
}
