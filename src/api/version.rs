//
//  bbdc-cli
//  api/version.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Optimistic-Concurrency Version Resolution
//!
//! Mutable Bitbucket resources (pull requests, comments) carry an integer
//! `version` that must be echoed on every mutating call; the server rejects
//! stale values with a conflict. When the caller did not supply a version
//! explicitly, the helper here performs exactly one read of the resource
//! immediately before the mutating call and extracts its version field.
//!
//! The read-then-write pair is not atomic with respect to the server: a
//! concurrent writer can still bump the version in between, in which case the
//! server rejects the mutating call and the conflict is surfaced to the user.
//! The helper narrows that race but never retries.

use std::future::Future;

use serde::Deserialize;

use super::client::BitbucketClient;
use super::error::ApiError;

/// Minimal view of a versioned server resource.
///
/// Deserialization deliberately ignores everything except the version field;
/// no further schema validation is applied.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct VersionedResource {
    /// Optimistic-concurrency token stamped on the resource.
    pub version: u64,
}

/// Resolves the version to send with a mutating call.
///
/// An explicit version passes through unchanged with zero extra requests.
/// Otherwise `fetch` is invoked to perform exactly one read.
///
/// # Example
///
/// ```rust,no_run
/// use bbdc_cli::api::{version, BitbucketClient};
///
/// # async fn example(client: &BitbucketClient, explicit: Option<u64>) -> Result<(), bbdc_cli::api::ApiError> {
/// let v = version::resolve(explicit, || {
///     version::fetch(client, "api/latest/projects/PROJ/repos/widget/pull-requests/7")
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn resolve<F, Fut>(explicit: Option<u64>, fetch: F) -> Result<u64, ApiError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<u64, ApiError>>,
{
    match explicit {
        Some(version) => Ok(version),
        None => fetch().await,
    }
}

/// Reads a resource and extracts its current version field.
pub async fn fetch(client: &BitbucketClient, path: &str) -> Result<u64, ApiError> {
    let resource: VersionedResource = client.get(path).await?;
    Ok(resource.version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Session;

    #[tokio::test]
    async fn test_explicit_version_passes_through_without_fetch() {
        let resolved = resolve(Some(12), || async {
            Err(ApiError::Config("fetch should not run".into()))
        })
        .await
        .unwrap();
        assert_eq!(resolved, 12);
    }

    #[tokio::test]
    async fn test_omitted_version_issues_exactly_one_read() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/api/latest/projects/PRJ/repos/widget/pull-requests/7")
            .with_body(r#"{"id":7,"version":4,"title":"ignored"}"#)
            .expect(1)
            .create_async()
            .await;

        let session = Session::new(format!("{}/rest", server.url()), "secret").unwrap();
        let client = BitbucketClient::new(&session).unwrap();

        let resolved = resolve(None, || {
            fetch(&client, "api/latest/projects/PRJ/repos/widget/pull-requests/7")
        })
        .await
        .unwrap();

        assert_eq!(resolved, 4);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/latest/projects/PRJ/repos/widget/pull-requests/7")
            .with_status(404)
            .with_body(r#"{"errors":[{"message":"Pull request 7 does not exist"}]}"#)
            .create_async()
            .await;

        let session = Session::new(format!("{}/rest", server.url()), "secret").unwrap();
        let client = BitbucketClient::new(&session).unwrap();

        let err = resolve(None, || {
            fetch(&client, "api/latest/projects/PRJ/repos/widget/pull-requests/7")
        })
        .await
        .unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("does not exist"));
    }
}
