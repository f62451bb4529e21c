//
//  bbdc-cli
//  api/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Cursor Pagination for Bitbucket Data Center Responses
//!
//! Bitbucket Data Center list endpoints return offset-based pages:
//!
//! ```json
//! {"values": [...], "size": 25, "limit": 25, "isLastPage": false,
//!  "nextPageStart": 25, "start": 0}
//! ```
//!
//! [`PageCursor`] wraps the dispatcher for such endpoints as a restartable
//! lazy cursor: each [`next_page`](PageCursor::next_page) issues exactly one
//! request advancing the start offset, and [`collect`](PageCursor::collect)
//! gathers items up to a caller-supplied cap.
//!
//! ## Bounds
//!
//! - Stops when the server reports `isLastPage` (or omits `nextPageStart`),
//!   or when the cap is reached, whichever comes first.
//! - A cap of 0 issues zero requests.
//! - A cap falling mid-page truncates that page and issues no further
//!   request, so a small prefix never pays for full enumeration.
//!
//! ## Failure
//!
//! Any page-fetch failure propagates immediately and halts iteration.
//! Items already yielded are not rolled back; this is a read path with no
//! transactional semantics.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::client::BitbucketClient;
use super::error::ApiError;

/// One page of an offset-paginated Data Center response.
///
/// The cursor fields (`isLastPage`, `nextPageStart`, `start`) are treated as
/// opaque by the helper; item contents are never interpreted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    /// Items in the current page. May be empty.
    pub values: Vec<T>,

    /// Number of items in the current page.
    #[serde(default)]
    pub size: u32,

    /// Maximum items per page, as requested.
    #[serde(default)]
    pub limit: u32,

    /// Whether this is the final page.
    #[serde(default, rename = "isLastPage")]
    pub is_last_page: bool,

    /// Start offset for the next page; absent on the last page.
    #[serde(default, rename = "nextPageStart")]
    pub next_page_start: Option<u64>,

    /// Start offset of the current page (0-indexed).
    #[serde(default)]
    pub start: u64,
}

impl<T> PagedResponse<T> {
    /// Whether more pages are available.
    pub fn has_next(&self) -> bool {
        !self.is_last_page
    }

    /// Start offset to request the next page with, if any.
    pub fn next_start(&self) -> Option<u64> {
        self.next_page_start
    }
}

/// A restartable lazy cursor over one paged endpoint.
///
/// Construct with a path, base query and page size; then either pull pages
/// one at a time with [`next_page`](Self::next_page) or gather a bounded
/// prefix with [`collect`](Self::collect).
///
/// # Example
///
/// ```rust,no_run
/// use bbdc_cli::api::{BitbucketClient, PageCursor};
/// use serde_json::Value;
///
/// # async fn example(client: &BitbucketClient) -> Result<(), bbdc_cli::api::ApiError> {
/// let cursor = PageCursor::<Value>::new(
///     client,
///     "api/latest/projects/PROJ/repos/widget/pull-requests".to_string(),
///     vec![("state".to_string(), "OPEN".to_string())],
///     50,
/// );
/// let first_ten = cursor.collect(Some(10)).await?;
/// # Ok(())
/// # }
/// ```
pub struct PageCursor<'a, T> {
    client: &'a BitbucketClient,
    path: String,
    query: Vec<(String, String)>,
    limit: u32,
    next_start: Option<u64>,
    _marker: PhantomData<T>,
}

impl<'a, T: DeserializeOwned> PageCursor<'a, T> {
    /// Creates a cursor positioned at the first page.
    pub fn new(
        client: &'a BitbucketClient,
        path: String,
        query: Vec<(String, String)>,
        limit: u32,
    ) -> Self {
        Self {
            client,
            path,
            query,
            limit,
            next_start: Some(0),
            _marker: PhantomData,
        }
    }

    /// Fetches the next page, or `None` once the server reported completion.
    ///
    /// Issues exactly one request per `Some` result.
    pub async fn next_page(&mut self) -> Result<Option<Vec<T>>, ApiError> {
        let Some(start) = self.next_start else {
            return Ok(None);
        };

        let mut query = self.query.clone();
        query.push(("start".to_string(), start.to_string()));
        query.push(("limit".to_string(), self.limit.to_string()));

        let page: PagedResponse<T> = self.client.get_query(&self.path, &query).await?;

        // A missing nextPageStart also terminates, matching servers that
        // omit the field on the last page without setting isLastPage.
        self.next_start = if page.is_last_page {
            None
        } else {
            page.next_page_start
        };

        Ok(Some(page.values))
    }

    /// Collects items across pages, bounded by `cap` when supplied.
    ///
    /// Yields exactly `min(N, cap)` items in server order, issuing
    /// `ceil(yielded/page_size)` requests. A cap of 0 issues zero requests;
    /// a cap falling mid-page truncates without a further fetch.
    pub async fn collect(mut self, cap: Option<usize>) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        if cap == Some(0) {
            return Ok(items);
        }

        while let Some(values) = self.next_page().await? {
            items.extend(values);
            if let Some(cap) = cap {
                if items.len() >= cap {
                    items.truncate(cap);
                    break;
                }
            }
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Session;
    use mockito::Matcher;
    use serde_json::Value;

    fn page_query(start: u64, limit: u32) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("start".into(), start.to_string()),
            Matcher::UrlEncoded("limit".into(), limit.to_string()),
        ])
    }

    fn page_body(values: &[u64], is_last: bool, next_start: Option<u64>) -> String {
        serde_json::to_string(&serde_json::json!({
            "values": values,
            "size": values.len(),
            "limit": values.len(),
            "isLastPage": is_last,
            "nextPageStart": next_start,
            "start": 0,
        }))
        .unwrap()
    }

    async fn client_for(server: &mockito::Server) -> BitbucketClient {
        let session = Session::new(format!("{}/rest", server.url()), "secret").unwrap();
        BitbucketClient::new(&session).unwrap()
    }

    const PATH: &str = "/rest/api/latest/projects/PRJ/repos/widget/pull-requests";

    #[tokio::test]
    async fn test_cap_mid_page_truncates_and_stops() {
        // 5 items, page size 2, cap 3: two requests, items 1..=3 in order.
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("GET", PATH)
            .match_query(page_query(0, 2))
            .with_body(page_body(&[1, 2], false, Some(2)))
            .expect(1)
            .create_async()
            .await;
        let second = server
            .mock("GET", PATH)
            .match_query(page_query(2, 2))
            .with_body(page_body(&[3, 4], false, Some(4)))
            .expect(1)
            .create_async()
            .await;
        let third = server
            .mock("GET", PATH)
            .match_query(page_query(4, 2))
            .with_body(page_body(&[5], true, None))
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server).await;
        let cursor = PageCursor::<u64>::new(
            &client,
            "api/latest/projects/PRJ/repos/widget/pull-requests".into(),
            Vec::new(),
            2,
        );
        let items = cursor.collect(Some(3)).await.unwrap();

        assert_eq!(items, vec![1, 2, 3]);
        first.assert_async().await;
        second.assert_async().await;
        third.assert_async().await;
    }

    #[tokio::test]
    async fn test_no_cap_follows_cursor_to_last_page() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", PATH)
            .match_query(page_query(0, 2))
            .with_body(page_body(&[1, 2], false, Some(2)))
            .expect(1)
            .create_async()
            .await;
        server
            .mock("GET", PATH)
            .match_query(page_query(2, 2))
            .with_body(page_body(&[3, 4], false, Some(4)))
            .expect(1)
            .create_async()
            .await;
        server
            .mock("GET", PATH)
            .match_query(page_query(4, 2))
            .with_body(page_body(&[5], true, None))
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server).await;
        let cursor = PageCursor::<u64>::new(
            &client,
            "api/latest/projects/PRJ/repos/widget/pull-requests".into(),
            Vec::new(),
            2,
        );
        let items = cursor.collect(None).await.unwrap();
        assert_eq!(items, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_cap_zero_issues_zero_requests() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", PATH)
            .match_query(Matcher::Any)
            .with_body(page_body(&[1], true, None))
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server).await;
        let cursor = PageCursor::<u64>::new(
            &client,
            "api/latest/projects/PRJ/repos/widget/pull-requests".into(),
            Vec::new(),
            2,
        );
        let items = cursor.collect(Some(0)).await.unwrap();

        assert!(items.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_last_page_flag_on_first_page_issues_one_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", PATH)
            .match_query(page_query(0, 50))
            .with_body(page_body(&[1, 2, 3], true, None))
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server).await;
        let cursor = PageCursor::<u64>::new(
            &client,
            "api/latest/projects/PRJ/repos/widget/pull-requests".into(),
            Vec::new(),
            50,
        );
        let items = cursor.collect(Some(100)).await.unwrap();

        assert_eq!(items, vec![1, 2, 3]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_page_fetch_failure_propagates() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", PATH)
            .match_query(page_query(0, 2))
            .with_status(500)
            .with_body(r#"{"errors":[{"message":"boom"}]}"#)
            .create_async()
            .await;

        let client = client_for(&server).await;
        let cursor = PageCursor::<Value>::new(
            &client,
            "api/latest/projects/PRJ/repos/widget/pull-requests".into(),
            Vec::new(),
            2,
        );
        let err = cursor.collect(None).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_extra_query_parameters_are_preserved_per_page() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", PATH)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("state".into(), "OPEN".into()),
                Matcher::UrlEncoded("start".into(), "0".into()),
                Matcher::UrlEncoded("limit".into(), "25".into()),
            ]))
            .with_body(page_body(&[7], true, None))
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server).await;
        let cursor = PageCursor::<u64>::new(
            &client,
            "api/latest/projects/PRJ/repos/widget/pull-requests".into(),
            vec![("state".into(), "OPEN".into())],
            25,
        );
        let items = cursor.collect(None).await.unwrap();
        assert_eq!(items, vec![7]);
        mock.assert_async().await;
    }
}
