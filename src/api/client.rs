//
//  bbdc-cli
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client Wrapper for the Bitbucket Data Center API
//!
//! This module provides the request dispatcher at the core of the CLI. Given
//! an HTTP method, a path relative to the configured `/rest` root, optional
//! query parameters and an optional JSON body, it issues exactly one outbound
//! request and returns the decoded JSON body or a typed [`ApiError`].
//!
//! ## Features
//!
//! - Bearer-token authorization header injection
//! - JSON serialization/deserialization
//! - Structured error extraction on non-2xx responses
//! - Empty 204-style bodies decode to an empty success marker, never a
//!   decode failure
//! - Custom `bbdc/<version>` User-Agent header
//!
//! Paths are relative to the REST root so that all three endpoint trees are
//! reachable: `api/latest/...`, `git/latest/...` (rebase) and
//! `comment-likes/latest/...` (comment reactions).
//!
//! No retries are attempted at any layer; every failure is terminal for the
//! invoking command.

use std::time::Duration;

use reqwest::{header, Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::Session;

use super::error::ApiError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The HTTP client for a single command invocation.
///
/// Holds the underlying connection pool, the validated base REST URL and the
/// bearer token. Stateless across calls: each method issues one request and
/// returns.
///
/// # Example
///
/// ```rust,no_run
/// use bbdc_cli::api::BitbucketClient;
/// use bbdc_cli::config::Session;
///
/// # async fn example() -> Result<(), bbdc_cli::api::ApiError> {
/// let session = Session::from_env()?;
/// let client = BitbucketClient::new(&session)?;
/// let pr: serde_json::Value = client
///     .get("api/latest/projects/PROJ/repos/widget/pull-requests/42")
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct BitbucketClient {
    /// The underlying HTTP client
    http: Client,
    /// Base REST URL, e.g. "https://host/bitbucket/rest"
    base_rest: String,
    /// Personal access token sent as a bearer credential
    token: String,
}

impl BitbucketClient {
    /// Creates a client from a validated session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the underlying HTTP client could
    /// not be constructed.
    pub fn new(session: &Session) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_rest: session.base_rest().to_string(),
            token: session.token().to_string(),
        })
    }

    /// The base REST URL this client targets.
    pub fn base_rest(&self) -> &str {
        &self.base_rest
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_rest, path.trim_start_matches('/'))
    }

    /// Core dispatcher: issues exactly one outbound request.
    ///
    /// On 2xx the decoded JSON body is returned; an empty body (e.g. 204 from
    /// delete/approve-style endpoints) decodes to [`Value::Null`]. On non-2xx
    /// the structured error payload is extracted into [`ApiError::Http`].
    pub async fn dispatch<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&B>,
    ) -> Result<Value, ApiError> {
        let url = self.url(path);
        let mut request = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(&self.token)
            .header(header::ACCEPT, "application/json;charset=UTF-8");

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(%method, %url, "sending request");
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(%status, len = bytes.len(), "received response");

        if !status.is_success() {
            return Err(ApiError::http(status, &bytes));
        }
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(ApiError::Decode)
    }

    /// GET a path and deserialize the response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get_query(path, &[]).await
    }

    /// GET a path with query parameters and deserialize the response.
    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, ApiError> {
        let value = self
            .dispatch(Method::GET, path, query, None::<&Value>)
            .await?;
        decode(value)
    }

    /// POST a JSON body and deserialize the response.
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let value = self.dispatch(Method::POST, path, &[], Some(body)).await?;
        decode(value)
    }

    /// POST with query parameters and no body, returning the raw JSON value.
    ///
    /// Used by decline/reopen-style endpoints that take their version token
    /// as a query parameter.
    pub async fn post_query(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Value, ApiError> {
        self.dispatch(Method::POST, path, query, None::<&Value>)
            .await
    }

    /// PUT a JSON body and deserialize the response.
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let value = self.dispatch(Method::PUT, path, &[], Some(body)).await?;
        decode(value)
    }

    /// PUT with no body, returning the raw JSON value.
    ///
    /// Used by the comment-reaction endpoint, which is addressed entirely
    /// through its path.
    pub async fn put_empty(&self, path: &str) -> Result<Value, ApiError> {
        self.dispatch(Method::PUT, path, &[], None::<&Value>).await
    }

    /// DELETE a path, treating an empty 204 body as success.
    pub async fn delete(&self, path: &str, query: &[(String, String)]) -> Result<(), ApiError> {
        self.dispatch(Method::DELETE, path, query, None::<&Value>)
            .await?;
        Ok(())
    }

    /// DELETE with a JSON body.
    ///
    /// Pull-request deletion passes its version token in the request body.
    pub async fn delete_with_body<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        self.dispatch(Method::DELETE, path, &[], Some(body)).await?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(ApiError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;

    fn session_for(server: &mockito::Server) -> Session {
        Session::new(format!("{}/rest", server.url()), "secret").unwrap()
    }

    #[tokio::test]
    async fn test_get_decodes_json_and_sends_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/api/latest/projects/PRJ")
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_body(r#"{"key":"PRJ"}"#)
            .create_async()
            .await;

        let client = BitbucketClient::new(&session_for(&server)).unwrap();
        let value: Value = client.get("api/latest/projects/PRJ").await.unwrap();

        assert_eq!(value["key"], "PRJ");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_204_body_is_success_not_decode_failure() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/rest/api/latest/things/1")
            .with_status(204)
            .create_async()
            .await;

        let client = BitbucketClient::new(&session_for(&server)).unwrap();
        client.delete("api/latest/things/1", &[]).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_2xx_carries_structured_messages() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/latest/boom")
            .with_status(409)
            .with_body(r#"{"errors":[{"message":"stale version"},{"message":"try again"}]}"#)
            .create_async()
            .await;

        let client = BitbucketClient::new(&session_for(&server)).unwrap();
        let err = client.get::<Value>("api/latest/boom").await.unwrap_err();

        assert_eq!(err.status(), Some(409));
        let text = err.to_string();
        assert!(text.contains("stale version"));
        assert!(text.contains("try again"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/latest/garbled")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = BitbucketClient::new(&session_for(&server)).unwrap();
        let err = client.get::<Value>("api/latest/garbled").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_leading_slash_in_path_is_normalized() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/api/latest/ok")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = BitbucketClient::new(&session_for(&server)).unwrap();
        let _: Value = client.get("/api/latest/ok").await.unwrap();
        mock.assert_async().await;
    }
}
