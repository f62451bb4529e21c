//
//  bbdc-cli
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket Data Center CLI Library
//!
//! Core functionality for the `bbdc` CLI tool: a thin command-line client for
//! the Bitbucket Data Center / Server REST API covering the pull-request
//! lifecycle, reviews, comments, participants and auto-merge.
//!
//! ## Overview
//!
//! Every command is a mechanical translation from flags into one or more HTTP
//! requests against the configured server, followed by printing the JSON
//! response (raw with `--json`, or reformatted for human readability). The
//! only behavior beyond direct request construction lives in two small
//! helpers:
//!
//! - cursor pagination bounded by a caller-supplied item cap
//!   ([`api::pagination::PageCursor`])
//! - optimistic-concurrency version resolution before mutating calls
//!   ([`api::version::resolve`])
//!
//! ## Module Structure
//!
//! - [`cli`]: Command-line interface definitions using clap
//! - [`api`]: HTTP dispatcher, pagination and version helpers, wire types
//! - [`config`]: Session configuration from environment variables
//! - [`output`]: Output formatting (Table, JSON)
//! - [`util`]: Utility functions (timestamps, truncation)
//!
//! ## Configuration
//!
//! The session is sourced once from the environment at startup:
//!
//! ```bash
//! export BITBUCKET_SERVER="https://bitbucket.example.com/bitbucket/rest"
//! export BITBUCKET_API_TOKEN="***"
//! ```
//!
//! `BITBUCKET_SERVER` must end with the `/rest` API root segment; the token is
//! a personal access token sent as a bearer credential.

/// Command-line interface definitions.
///
/// Contains all CLI commands, arguments, and subcommands defined using the
/// clap derive API. Each command module handles parsing and execution of its
/// respective functionality.
pub mod cli;

/// API client for Bitbucket Data Center / Server.
///
/// Provides the request dispatcher, the typed error hierarchy, the paged
/// cursor helper, the version-resolution helper, and the wire types for the
/// pull-request endpoints.
pub mod api;

/// Session configuration.
///
/// Reads and validates the base REST URL and bearer token from the
/// environment. Configuration is immutable for the process lifetime and
/// validated before any network call.
pub mod config;

/// Output formatting for different modes.
///
/// Provides formatters for:
/// - Table format: Human-readable summaries for interactive use
/// - JSON format: Raw server responses for scripting and automation
pub mod output;

/// Utility functions and helpers.
///
/// Timestamp formatting for the server's millisecond epochs and string
/// truncation for table rendering.
pub mod util;

pub use cli::Cli;
pub use config::Session;

/// Application name constant.
pub const APP_NAME: &str = "bbdc";

/// Application version constant, derived from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// Standardized exit codes following Unix conventions, allowing scripts to
/// programmatically detect the outcome of CLI operations.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error (transport, HTTP, or decode failure).
    pub const ERROR: i32 = 1;

    /// Invalid usage or arguments.
    pub const USAGE: i32 = 2;

    /// Missing or malformed environment configuration.
    pub const CONFIG: i32 = 3;
}
