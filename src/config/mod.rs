//
//  bbdc-cli
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Session Configuration
//!
//! This module provides the immutable per-process session configuration for
//! the CLI. Unlike tools that persist configuration files, `bbdc` reads its
//! two settings from the environment exactly once at startup:
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `BITBUCKET_SERVER` | Base REST URL, must end with the `/rest` root segment |
//! | `BITBUCKET_API_TOKEN` | Personal access token, sent as a bearer credential |
//!
//! Missing or malformed configuration fails fast with
//! [`ApiError::Config`](crate::api::ApiError::Config) before any network call
//! is made.
//!
//! ## Example
//!
//! ```bash
//! export BITBUCKET_SERVER="https://bitbucket.example.com/bitbucket/rest"
//! export BITBUCKET_API_TOKEN="***"
//! ```

use std::env;

use url::Url;

use crate::api::ApiError;

/// Environment variable holding the base REST URL.
pub const ENV_SERVER: &str = "BITBUCKET_SERVER";

/// Environment variable holding the personal access token.
pub const ENV_TOKEN: &str = "BITBUCKET_API_TOKEN";

/// Immutable session configuration for one command invocation.
///
/// Holds the validated base REST URL and the bearer token. Constructed once
/// from the environment (or explicitly in tests) and never mutated.
///
/// # Example
///
/// ```rust,no_run
/// use bbdc_cli::config::Session;
///
/// let session = Session::from_env()?;
/// println!("talking to {}", session.base_rest());
/// # Ok::<(), bbdc_cli::api::ApiError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    base_rest: String,
    token: String,
}

impl Session {
    /// Builds a session from an explicit server URL and token.
    ///
    /// The server URL is normalized (trailing slashes stripped) and must end
    /// with `/rest`, the root segment the Data Center REST trees hang off.
    /// The token must be non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] when the URL does not parse, uses a
    /// scheme other than http/https, does not end with `/rest`, or the token
    /// is empty.
    pub fn new(server: impl Into<String>, token: impl Into<String>) -> Result<Self, ApiError> {
        let server = server.into();
        let base_rest = server.trim().trim_end_matches('/').to_string();

        let parsed = Url::parse(&base_rest).map_err(|e| {
            ApiError::Config(format!("{ENV_SERVER} is not a valid URL ({e}): {server}"))
        })?;
        if parsed.scheme() != "https" && parsed.scheme() != "http" {
            return Err(ApiError::Config(format!(
                "{ENV_SERVER} must use http or https, got scheme '{}'",
                parsed.scheme()
            )));
        }
        if !base_rest.ends_with("/rest") {
            return Err(ApiError::Config(format!(
                "{ENV_SERVER} must end with '/rest' (example: https://host/bitbucket/rest), got: {server}"
            )));
        }

        let token = token.into();
        if token.trim().is_empty() {
            return Err(ApiError::Config(format!("{ENV_TOKEN} must not be empty")));
        }

        Ok(Self {
            base_rest,
            token: token.trim().to_string(),
        })
    }

    /// Builds a session from the `BITBUCKET_SERVER` and `BITBUCKET_API_TOKEN`
    /// environment variables, failing fast before any network call.
    pub fn from_env() -> Result<Self, ApiError> {
        let server = require_env(ENV_SERVER)?;
        let token = require_env(ENV_TOKEN)?;
        Self::new(server, token)
    }

    /// The validated base REST URL, without a trailing slash.
    pub fn base_rest(&self) -> &str {
        &self.base_rest
    }

    /// The bearer token.
    pub fn token(&self) -> &str {
        &self.token
    }
}

fn require_env(name: &str) -> Result<String, ApiError> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::Config(format!(
            "Missing environment variable {name}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_rest_root() {
        let s = Session::new("https://bitbucket.example.com/bitbucket/rest", "tok").unwrap();
        assert_eq!(s.base_rest(), "https://bitbucket.example.com/bitbucket/rest");
        assert_eq!(s.token(), "tok");
    }

    #[test]
    fn test_strips_trailing_slash() {
        let s = Session::new("https://host/rest/", "tok").unwrap();
        assert_eq!(s.base_rest(), "https://host/rest");
    }

    #[test]
    fn test_rejects_missing_rest_segment() {
        let err = Session::new("https://host/bitbucket", "tok").unwrap_err();
        assert!(err.to_string().contains("/rest"));
    }

    #[test]
    fn test_rejects_bad_scheme() {
        let err = Session::new("ftp://host/rest", "tok").unwrap_err();
        assert!(err.to_string().contains("http"));
    }

    #[test]
    fn test_rejects_unparseable_url() {
        assert!(Session::new("not a url", "tok").is_err());
    }

    #[test]
    fn test_rejects_empty_token() {
        let err = Session::new("https://host/rest", "  ").unwrap_err();
        assert!(err.to_string().contains("BITBUCKET_API_TOKEN"));
    }
}
