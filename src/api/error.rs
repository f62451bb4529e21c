//
//  bbdc-cli
//  api/error.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Error Types
//!
//! Typed failures for the request dispatcher. Every error a command can hit
//! maps onto one of four kinds:
//!
//! | Kind | When | Retried |
//! |------|------|---------|
//! | [`ApiError::Config`] | Missing/malformed environment configuration | never |
//! | [`ApiError::Transport`] | DNS, connection, or timeout failure | never |
//! | [`ApiError::Http`] | Non-2xx status from the server | never |
//! | [`ApiError::Decode`] | Response body is not valid JSON | never |
//!
//! Bitbucket Data Center reports errors in a structured list:
//!
//! ```json
//! {"errors": [{"message": "...", "exceptionName": "..."}]}
//! ```
//!
//! [`ApiError::Http`] carries that whole list and its `Display` output joins
//! **all** contained messages, not just the first.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// One structured error entry from a Bitbucket error response.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerError {
    /// Human-readable message for this entry.
    #[serde(default)]
    pub message: Option<String>,

    /// Java exception class name reported by the server.
    #[serde(default, rename = "exceptionName")]
    pub exception_name: Option<String>,

    /// Additional context, e.g. the field the error applies to.
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ServerError>,
    // Some endpoints return a bare {"message": "..."} instead.
    #[serde(default)]
    message: Option<String>,
}

/// Typed failure for any API interaction.
///
/// All variants are terminal for the invoking command; no layer retries
/// automatically.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed base URL / token, reported before any network
    /// call is made.
    #[error("configuration error: {0}")]
    Config(String),

    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status. Carries the structured
    /// error entries from the response body when present.
    #[error("HTTP {status}{}", format_errors(.errors))]
    Http {
        /// HTTP status code.
        status: u16,
        /// Structured error entries from the response body.
        errors: Vec<ServerError>,
    },

    /// The response body was not valid JSON where JSON was expected.
    #[error("response was not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    /// Builds an [`ApiError::Http`] from a status code and raw response body.
    ///
    /// Extraction is best-effort: the structured `errors` list is preferred,
    /// then a bare `message` field, then the raw body text. An unparseable or
    /// empty body yields a status-only error.
    pub fn http(status: StatusCode, body: &[u8]) -> Self {
        let mut errors = match serde_json::from_slice::<ErrorBody>(body) {
            Ok(parsed) if !parsed.errors.is_empty() => parsed.errors,
            Ok(parsed) => parsed
                .message
                .map(|message| {
                    vec![ServerError {
                        message: Some(message),
                        exception_name: None,
                        context: None,
                    }]
                })
                .unwrap_or_default(),
            Err(_) => Vec::new(),
        };

        if errors.is_empty() {
            if let Ok(text) = std::str::from_utf8(body) {
                let text = text.trim();
                if !text.is_empty() {
                    errors.push(ServerError {
                        message: Some(text.to_string()),
                        exception_name: None,
                        context: None,
                    });
                }
            }
        }

        Self::Http {
            status: status.as_u16(),
            errors,
        }
    }

    /// The HTTP status code, if this is an [`ApiError::Http`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn format_errors(errors: &[ServerError]) -> String {
    let messages: Vec<&str> = errors
        .iter()
        .filter_map(|e| e.message.as_deref())
        .collect();
    if messages.is_empty() {
        String::new()
    } else {
        format!(": {}", messages.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_surfaces_all_messages() {
        let body = br#"{"errors":[{"message":"first problem","exceptionName":"com.atlassian.bitbucket.ConflictException"},{"message":"second problem"}]}"#;
        let err = ApiError::http(StatusCode::CONFLICT, body);
        let text = err.to_string();
        assert!(text.contains("HTTP 409"));
        assert!(text.contains("first problem"));
        assert!(text.contains("second problem"));
    }

    #[test]
    fn test_http_error_bare_message_field() {
        let err = ApiError::http(StatusCode::NOT_FOUND, br#"{"message":"no such repo"}"#);
        assert!(err.to_string().contains("no such repo"));
    }

    #[test]
    fn test_http_error_falls_back_to_raw_body() {
        let err = ApiError::http(StatusCode::BAD_GATEWAY, b"upstream exploded");
        assert!(err.to_string().contains("upstream exploded"));
    }

    #[test]
    fn test_http_error_empty_body_is_status_only() {
        let err = ApiError::http(StatusCode::FORBIDDEN, b"");
        assert_eq!(err.to_string(), "HTTP 403");
        assert_eq!(err.status(), Some(403));
    }
}
