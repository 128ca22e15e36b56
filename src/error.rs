//! Error types for the GitHub API SDK.
//!
//! This module contains error types used throughout the SDK for configuration
//! and validation errors.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use github_api::{AccessToken, ConfigError};
//!
//! let result = AccessToken::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyAccessToken)));
//! ```

use thiserror::Error;

/// Errors that can occur during SDK configuration.
///
/// This enum represents all possible errors that can occur when creating
/// or validating configuration types. Each variant provides a clear,
/// actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Access token cannot be empty.
    #[error("Access token cannot be empty. Please provide a valid GitHub token.")]
    EmptyAccessToken,

    /// Basic credentials need a username.
    #[error("Username cannot be empty when using basic credentials.")]
    EmptyUsername,

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Expected an http or https URL (e.g., 'https://api.github.com/').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected format: 'YYYY-MM-DD' (e.g., '2022-11-28').")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// User agent prefix contains characters that cannot be sent in a header.
    #[error("Invalid user agent prefix '{prefix}'. Control characters are not allowed.")]
    InvalidUserAgent {
        /// The rejected prefix.
        prefix: String,
    },

    /// Credentials contain characters that cannot be sent in a header.
    #[error("Credentials cannot be sent in an Authorization header. Remove control characters and whitespace padding.")]
    InvalidCredentials,

    /// The underlying HTTP transport could not be initialized.
    #[error("Failed to initialize HTTP transport: {reason}")]
    Transport {
        /// Description of the initialization failure.
        reason: String,
    },
}
