//
//  bbdc-cli
//  cli/automerge.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::Value;

use super::GlobalOptions;
use crate::api::pullrequests as prs;

/// Manage auto-merge for a pull request
///
/// Auto-merge asks the server to merge a pull request on the author's behalf
/// once all merge checks pass.
#[derive(Args, Debug)]
pub struct AutoMergeCommand {
    #[command(subcommand)]
    pub command: AutoMergeSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AutoMergeSubcommand {
    /// Show the auto-merge request for a pull request
    Status(TargetArgs),

    /// Request auto-merge once all checks pass
    Request(TargetArgs),

    /// Cancel a pending auto-merge request
    Cancel(TargetArgs),
}

#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Pull request ID
    pub id: u64,
}

impl AutoMergeCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            AutoMergeSubcommand::Status(args) => self.status(args, global).await,
            AutoMergeSubcommand::Request(args) => self.request(args, global).await,
            AutoMergeSubcommand::Cancel(args) => self.cancel(args, global).await,
        }
    }

    async fn status(&self, args: &TargetArgs, global: &GlobalOptions) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        let raw: Value = client
            .get(&prs::auto_merge_path(&project, &repo, args.id))
            .await
            .with_context(|| {
                format!("Failed to fetch auto-merge status of pull request #{}", args.id)
            })?;

        if global.json {
            return crate::output::write_json(&raw);
        }
        match raw.get("createdDate") {
            Some(_) => output.write_info(&format!("Auto-merge is requested for PR #{}", args.id)),
            None => output.write_info(&format!("No auto-merge request for PR #{}", args.id)),
        }
        Ok(())
    }

    async fn request(&self, args: &TargetArgs, global: &GlobalOptions) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        let raw = client
            .post_query(&prs::auto_merge_path(&project, &repo, args.id), &[])
            .await
            .with_context(|| {
                format!("Failed to request auto-merge for pull request #{}", args.id)
            })?;

        if global.json {
            return crate::output::write_json(&raw);
        }
        output.write_success(&format!("Requested auto-merge for PR #{}", args.id));
        Ok(())
    }

    async fn cancel(&self, args: &TargetArgs, global: &GlobalOptions) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        client
            .delete(&prs::auto_merge_path(&project, &repo, args.id), &[])
            .await
            .with_context(|| {
                format!("Failed to cancel auto-merge for pull request #{}", args.id)
            })?;

        output.write_success(&format!("Cancelled auto-merge for PR #{}", args.id));
        Ok(())
    }
}
