//
//  bbdc-cli
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Module
//!
//! HTTP access to the Bitbucket Data Center / Server REST API. Two thin
//! collaborating pieces make up the core:
//!
//! - [`client::BitbucketClient`]: the request dispatcher. Builds one HTTP
//!   request from method, path, query and JSON body, attaches the bearer
//!   token, and returns decoded JSON or a typed [`error::ApiError`].
//! - [`pagination::PageCursor`] and [`version::resolve`]: wrap the
//!   dispatcher for list endpoints (bounded cursor following) and mutating
//!   endpoints (read-before-write version resolution).
//!
//! [`pullrequests`] holds the wire types and endpoint paths for the
//! pull-request surface.

pub mod client;
pub mod error;
pub mod pagination;
pub mod pullrequests;
pub mod version;

pub use client::BitbucketClient;
pub use error::{ApiError, ServerError};
pub use pagination::{PageCursor, PagedResponse};
