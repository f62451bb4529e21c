//
//  bbdc-cli
//  cli/review.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::Value;

use super::GlobalOptions;
use crate::api::pullrequests as prs;
use crate::api::pullrequests::CompleteReviewRequest;

/// Approve, unapprove, or complete your review
#[derive(Args, Debug)]
pub struct ReviewCommand {
    #[command(subcommand)]
    pub command: ReviewSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ReviewSubcommand {
    /// Approve a pull request
    Approve(TargetArgs),

    /// Remove your approval from a pull request
    Unapprove(TargetArgs),

    /// Finish your review with a status and optional summary comment
    Complete(CompleteArgs),

    /// Discard your in-progress review
    Discard(TargetArgs),
}

#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Pull request ID
    pub id: u64,
}

#[derive(Args, Debug)]
pub struct CompleteArgs {
    /// Pull request ID
    pub id: u64,

    /// Resulting review status
    #[arg(long, short = 's', value_parser = ["approved", "unapproved", "needs-work"], default_value = "approved")]
    pub status: String,

    /// Summary comment to publish with the review
    #[arg(long, short = 'c')]
    pub comment: Option<String>,

    /// Commit hash the review covered
    #[arg(long)]
    pub last_reviewed_commit: Option<String>,
}

impl ReviewCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ReviewSubcommand::Approve(args) => self.approve(args, global).await,
            ReviewSubcommand::Unapprove(args) => self.unapprove(args, global).await,
            ReviewSubcommand::Complete(args) => self.complete(args, global).await,
            ReviewSubcommand::Discard(args) => self.discard(args, global).await,
        }
    }

    async fn approve(&self, args: &TargetArgs, global: &GlobalOptions) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        let raw = client
            .post_query(&prs::approve_path(&project, &repo, args.id), &[])
            .await
            .with_context(|| format!("Failed to approve pull request #{}", args.id))?;

        if global.json {
            return crate::output::write_json(&raw);
        }
        output.write_success(&format!("Approved PR #{}", args.id));
        Ok(())
    }

    async fn unapprove(&self, args: &TargetArgs, global: &GlobalOptions) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        client
            .delete(&prs::approve_path(&project, &repo, args.id), &[])
            .await
            .with_context(|| format!("Failed to unapprove pull request #{}", args.id))?;

        output.write_success(&format!("Removed approval from PR #{}", args.id));
        Ok(())
    }

    async fn complete(&self, args: &CompleteArgs, global: &GlobalOptions) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        let body = CompleteReviewRequest {
            participant_status: review_status(&args.status),
            comment_text: args.comment.clone(),
            last_reviewed_commit: args.last_reviewed_commit.clone(),
        };

        let raw: Value = client
            .put(&prs::review_path(&project, &repo, args.id), &body)
            .await
            .with_context(|| format!("Failed to complete review of pull request #{}", args.id))?;

        if global.json {
            return crate::output::write_json(&raw);
        }
        output.write_success(&format!(
            "Completed review of PR #{} as {}",
            args.id,
            review_status(&args.status)
        ));
        Ok(())
    }

    async fn discard(&self, args: &TargetArgs, global: &GlobalOptions) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        client
            .delete(&prs::review_path(&project, &repo, args.id), &[])
            .await
            .with_context(|| format!("Failed to discard review of pull request #{}", args.id))?;

        output.write_success(&format!("Discarded review of PR #{}", args.id));
        Ok(())
    }
}

/// Maps the CLI status value to the wire form, e.g. "needs-work" to
/// "NEEDS_WORK".
fn review_status(cli_value: &str) -> String {
    cli_value.to_uppercase().replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_status_maps_to_wire_form() {
        assert_eq!(review_status("approved"), "APPROVED");
        assert_eq!(review_status("unapproved"), "UNAPPROVED");
        assert_eq!(review_status("needs-work"), "NEEDS_WORK");
    }
}
