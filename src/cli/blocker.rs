//
//  bbdc-cli
//  cli/blocker.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::Value;

use super::GlobalOptions;
use crate::api::pullrequests as prs;
use crate::api::pullrequests::{Comment, CommentRequest};
use crate::api::PageCursor;

/// Manage blocker comments (review tasks)
#[derive(Args, Debug)]
pub struct BlockerCommand {
    #[command(subcommand)]
    pub command: BlockerSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum BlockerSubcommand {
    /// Add a blocker comment to a pull request
    Add(AddArgs),

    /// List blocker comments on a pull request
    #[command(visible_alias = "ls")]
    List(ListArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Pull request ID
    pub id: u64,

    /// Blocker text
    pub text: String,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Pull request ID
    pub id: u64,

    /// Filter by resolution state
    #[arg(long, short = 's', value_parser = ["open", "resolved"])]
    pub state: Option<String>,

    /// Page size for each request
    #[arg(long, short = 'L', default_value = "50")]
    pub limit: u32,

    /// Maximum number of blockers to list
    #[arg(long, default_value = "200")]
    pub max_items: usize,
}

impl BlockerCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            BlockerSubcommand::Add(args) => self.add(args, global).await,
            BlockerSubcommand::List(args) => self.list(args, global).await,
        }
    }

    /// Add a blocker comment
    async fn add(&self, args: &AddArgs, global: &GlobalOptions) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        let body = CommentRequest {
            text: args.text.clone(),
            severity: Some("BLOCKER".to_string()),
            parent: None,
        };

        let raw: Value = client
            .post(&prs::blocker_comments_path(&project, &repo, args.id), &body)
            .await
            .with_context(|| format!("Failed to add blocker to pull request #{}", args.id))?;
        let comment: Comment =
            serde_json::from_value(raw.clone()).context("Unexpected comment payload")?;

        if global.json {
            return crate::output::write_json(&raw);
        }
        output.write_success(&format!(
            "Added blocker #{} to PR #{}",
            comment.id, args.id
        ));
        Ok(())
    }

    /// List blocker comments
    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        let mut query = Vec::new();
        if let Some(state) = &args.state {
            query.push(("state".to_string(), state.to_uppercase()));
        }

        let cursor = PageCursor::<Value>::new(
            &client,
            prs::blocker_comments_path(&project, &repo, args.id),
            query,
            args.limit,
        );
        let values = cursor
            .collect(Some(args.max_items))
            .await
            .with_context(|| format!("Failed to list blockers on pull request #{}", args.id))?;

        let typed: Vec<Comment> = values
            .iter()
            .cloned()
            .map(serde_json::from_value)
            .collect::<Result<_, _>>()
            .context("Unexpected comment payload")?;

        output.write_list(&Value::Array(values), &typed)?;
        if typed.is_empty() && !global.json {
            output.write_info("No blockers found.");
        }
        Ok(())
    }
}
