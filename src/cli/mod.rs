//
//  bbdc-cli
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod api;
mod automerge;
mod blocker;
mod comment;
mod completion;
mod doctor;
mod participant;
mod pr;
mod review;

pub use api::ApiCommand;
pub use automerge::AutoMergeCommand;
pub use blocker::BlockerCommand;
pub use comment::CommentCommand;
pub use completion::CompletionCommand;
pub use doctor::DoctorCommand;
pub use participant::ParticipantCommand;
pub use pr::PrCommand;
pub use review::ReviewCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::api::BitbucketClient;
use crate::config::Session;
use crate::output::{OutputFormat, OutputWriter};

/// Bitbucket Data Center CLI
#[derive(Parser, Debug)]
#[command(
    name = "bbdc",
    version,
    about = "Work with Bitbucket Data Center pull requests from the command line",
    long_about = "bbdc is a CLI for Bitbucket Data Center / Server.\n\n\
                  It brings pull requests, reviews, and comments to your terminal.\n\
                  Configure it with BITBUCKET_SERVER (the base REST URL, ending in /rest)\n\
                  and BITBUCKET_API_TOKEN (a personal access token).",
    after_help = "Use 'bbdc <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Project key for the operation
    #[arg(long, short = 'p', global = true, env = "BBDC_PROJECT")]
    pub project: Option<String>,

    /// Repository slug for the operation
    #[arg(long, short = 'r', global = true, env = "BBDC_REPO")]
    pub repo: Option<String>,

    /// Output the raw server response as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

impl GlobalOptions {
    /// Resolves the target repository, requiring both coordinates.
    pub fn target(&self) -> Result<(String, String)> {
        let project = self.project.clone().ok_or_else(|| {
            anyhow::anyhow!("No project specified. Use --project/-p or set BBDC_PROJECT.")
        })?;
        let repo = self.repo.clone().ok_or_else(|| {
            anyhow::anyhow!("No repository specified. Use --repo/-r or set BBDC_REPO.")
        })?;
        Ok((project, repo))
    }

    /// An output writer honoring the `--json` flag.
    pub fn output(&self) -> OutputWriter {
        OutputWriter::new(if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        })
    }
}

/// Builds the API client from the environment.
///
/// Configuration failures keep their [`crate::api::ApiError`] type in the
/// error chain so `main` can map them to a distinct exit code.
pub(crate) fn client() -> Result<BitbucketClient> {
    let session = Session::from_env()?;
    Ok(BitbucketClient::new(&session)?)
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage pull requests
    Pr(PrCommand),

    /// Approve, unapprove, or complete your review
    Review(ReviewCommand),

    /// Manage pull request comments
    Comment(CommentCommand),

    /// Manage blocker comments (review tasks)
    Blocker(BlockerCommand),

    /// Manage pull request participants
    Participant(ParticipantCommand),

    /// Manage auto-merge for a pull request
    #[command(name = "auto-merge")]
    AutoMerge(AutoMergeCommand),

    /// Make an authenticated raw API request
    Api(ApiCommand),

    /// Check that the environment is configured and the server is reachable
    Doctor(DoctorCommand),

    /// Generate shell completion scripts
    Completion(CompletionCommand),

    /// Show version information
    Version,
}
