//! GitHub REST API version definitions.
//!
//! This module provides the [`ApiVersion`] enum, sent with every request in
//! the `X-GitHub-Api-Version` header.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// GitHub REST API version.
///
/// GitHub names versions after their release date (`YYYY-MM-DD`). Known
/// versions get a dedicated variant; any other well-formed date is accepted
/// as [`ApiVersion::Custom`] so newer versions work without a crate release.
///
/// # Example
///
/// ```rust
/// use github_api::ApiVersion;
///
/// let version = ApiVersion::latest();
/// assert_eq!(version.to_string(), "2022-11-28");
///
/// let version: ApiVersion = "2022-11-28".parse().unwrap();
/// assert_eq!(version, ApiVersion::V2022_11_28);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// API version 2022-11-28, the first calendar-versioned release.
    V2022_11_28,
    /// Any other `YYYY-MM-DD` version string.
    Custom(String),
}

impl ApiVersion {
    /// Header used to select the version.
    pub const HEADER: &'static str = "X-GitHub-Api-Version";

    /// Returns the latest version known to this crate.
    #[must_use]
    pub const fn latest() -> Self {
        Self::V2022_11_28
    }

    /// Returns `true` for versions with a dedicated variant.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }

    fn is_valid_version_format(s: &str) -> bool {
        let parts: Vec<&str> = s.split('-').collect();
        let [year, month, day] = parts.as_slice() else {
            return false;
        };

        if year.len() != 4 || month.len() != 2 || day.len() != 2 {
            return false;
        }
        if ![year, month, day]
            .iter()
            .all(|part| part.chars().all(|c| c.is_ascii_digit()))
        {
            return false;
        }

        let month: u32 = month.parse().unwrap_or(0);
        let day: u32 = day.parse().unwrap_or(0);
        (1..=12).contains(&month) && (1..=31).contains(&day)
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::latest()
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version_str = match self {
            Self::V2022_11_28 => "2022-11-28",
            Self::Custom(s) => s,
        };
        f.write_str(version_str)
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        match s {
            "2022-11-28" => Ok(Self::V2022_11_28),
            _ if Self::is_valid_version_format(s) => Ok(Self::Custom(s.to_string())),
            _ => Err(ConfigError::InvalidApiVersion {
                version: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_version_parses_known_versions() {
        assert_eq!(
            "2022-11-28".parse::<ApiVersion>().unwrap(),
            ApiVersion::V2022_11_28
        );
        assert_eq!(
            " 2022-11-28 ".parse::<ApiVersion>().unwrap(),
            ApiVersion::V2022_11_28
        );
    }

    #[test]
    fn test_api_version_display() {
        assert_eq!(ApiVersion::V2022_11_28.to_string(), "2022-11-28");
        assert_eq!(
            ApiVersion::Custom("2026-03-10".to_string()).to_string(),
            "2026-03-10"
        );
    }

    #[test]
    fn test_api_version_parses_future_versions() {
        let version: ApiVersion = "2026-03-10".parse().unwrap();
        assert_eq!(version, ApiVersion::Custom("2026-03-10".to_string()));
        assert!(!version.is_known());
    }

    #[test]
    fn test_api_version_rejects_invalid() {
        assert!("v3".parse::<ApiVersion>().is_err());
        assert!("2022-11".parse::<ApiVersion>().is_err());
        assert!("2022-13-01".parse::<ApiVersion>().is_err());
        assert!("2022-11-00".parse::<ApiVersion>().is_err());
        assert!("22-11-28".parse::<ApiVersion>().is_err());
        assert!("2022-1a-28".parse::<ApiVersion>().is_err());
    }

    #[test]
    fn test_default_is_latest() {
        assert_eq!(ApiVersion::default(), ApiVersion::latest());
        assert!(ApiVersion::latest().is_known());
    }
}
