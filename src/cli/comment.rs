//
//  bbdc-cli
//  cli/comment.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use super::GlobalOptions;
use crate::api::pullrequests as prs;
use crate::api::pullrequests::{Comment, CommentParent, CommentRequest, UpdateCommentRequest};
use crate::api::{version, PageCursor};
use crate::output::TableOutput;
use crate::util::{format_timestamp, truncate};

/// Manage pull request comments
#[derive(Args, Debug)]
pub struct CommentCommand {
    #[command(subcommand)]
    pub command: CommentSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CommentSubcommand {
    /// Add a comment to a pull request
    Add(AddArgs),

    /// View a single comment
    Get(GetArgs),

    /// List comments on a pull request
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Edit a comment
    Update(UpdateArgs),

    /// Delete a comment
    Delete(DeleteArgs),

    /// Add an emoticon reaction to a comment
    React(ReactArgs),

    /// Remove an emoticon reaction from a comment
    Unreact(ReactArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Pull request ID
    pub id: u64,

    /// Comment text
    pub text: String,

    /// Reply to an existing comment
    #[arg(long)]
    pub parent: Option<u64>,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Pull request ID
    pub id: u64,

    /// Comment ID
    pub comment_id: u64,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Pull request ID
    pub id: u64,

    /// Page size for each request
    #[arg(long, short = 'L', default_value = "50")]
    pub limit: u32,

    /// Maximum number of comments to list
    #[arg(long, default_value = "200")]
    pub max_items: usize,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Pull request ID
    pub id: u64,

    /// Comment ID
    pub comment_id: u64,

    /// Replacement text
    pub text: String,

    /// Expected current version; fetched from the server when omitted
    #[arg(long)]
    pub version: Option<u64>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Pull request ID
    pub id: u64,

    /// Comment ID
    pub comment_id: u64,

    /// Expected current version; fetched from the server when omitted
    #[arg(long)]
    pub version: Option<u64>,
}

#[derive(Args, Debug)]
pub struct ReactArgs {
    /// Pull request ID
    pub id: u64,

    /// Comment ID
    pub comment_id: u64,

    /// Emoticon name, e.g. "thumbsup"
    pub emoticon: String,
}

impl TableOutput for Comment {
    fn print_table(&self, color: bool) {
        let author = if color {
            style(self.author.label()).cyan().to_string()
        } else {
            self.author.label().to_string()
        };
        let mut tags = Vec::new();
        if self.severity.as_deref() == Some("BLOCKER") {
            tags.push(if color {
                style("[BLOCKER]").red().bold().to_string()
            } else {
                "[BLOCKER]".to_string()
            });
        }
        if let Some(state) = self.state.as_deref() {
            if state != "OPEN" {
                tags.push(format!("[{state}]"));
            }
        }
        let tags = if tags.is_empty() {
            String::new()
        } else {
            format!(" {}", tags.join(" "))
        };

        println!(
            "#{} {} ({}){}",
            self.id,
            author,
            format_timestamp(self.created_date),
            tags
        );
        println!("  {}", truncate(&self.text.replace('\n', " "), 100));
    }
}

impl CommentCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            CommentSubcommand::Add(args) => self.add(args, global).await,
            CommentSubcommand::Get(args) => self.get(args, global).await,
            CommentSubcommand::List(args) => self.list(args, global).await,
            CommentSubcommand::Update(args) => self.update(args, global).await,
            CommentSubcommand::Delete(args) => self.delete(args, global).await,
            CommentSubcommand::React(args) => self.react(args, true, global).await,
            CommentSubcommand::Unreact(args) => self.react(args, false, global).await,
        }
    }

    /// Add a comment to a pull request
    async fn add(&self, args: &AddArgs, global: &GlobalOptions) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        let body = CommentRequest {
            text: args.text.clone(),
            severity: None,
            parent: args.parent.map(|id| CommentParent { id }),
        };

        let raw: Value = client
            .post(&prs::comments_path(&project, &repo, args.id), &body)
            .await
            .with_context(|| format!("Failed to comment on pull request #{}", args.id))?;
        let comment: Comment =
            serde_json::from_value(raw.clone()).context("Unexpected comment payload")?;

        if global.json {
            return crate::output::write_json(&raw);
        }
        output.write_success(&format!(
            "Added comment #{} to PR #{}",
            comment.id, args.id
        ));
        Ok(())
    }

    /// View a single comment
    async fn get(&self, args: &GetArgs, global: &GlobalOptions) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        let raw: Value = client
            .get(&prs::comment_path(&project, &repo, args.id, args.comment_id))
            .await
            .with_context(|| format!("Failed to fetch comment #{}", args.comment_id))?;
        let comment: Comment =
            serde_json::from_value(raw.clone()).context("Unexpected comment payload")?;

        output.write(&raw, &comment)
    }

    /// List comments on a pull request
    ///
    /// The server has no flat comment listing; comments are extracted from
    /// the paged activity feed.
    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        let cursor = PageCursor::<Value>::new(
            &client,
            prs::activities_path(&project, &repo, args.id),
            Vec::new(),
            args.limit,
        );
        let activities = cursor
            .collect(Some(args.max_items))
            .await
            .with_context(|| format!("Failed to list comments on pull request #{}", args.id))?;

        let raw_comments: Vec<Value> = activities
            .into_iter()
            .filter(|a| a.get("action").and_then(Value::as_str) == Some("COMMENTED"))
            .filter_map(|mut a| a.get_mut("comment").map(Value::take))
            .collect();
        let typed: Vec<Comment> = raw_comments
            .iter()
            .cloned()
            .map(serde_json::from_value)
            .collect::<Result<_, _>>()
            .context("Unexpected comment payload")?;

        output.write_list(&Value::Array(raw_comments), &typed)?;
        if typed.is_empty() && !global.json {
            output.write_info("No comments found.");
        }
        Ok(())
    }

    /// Edit a comment
    async fn update(&self, args: &UpdateArgs, global: &GlobalOptions) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        let path = prs::comment_path(&project, &repo, args.id, args.comment_id);
        let current = version::resolve(args.version, || version::fetch(&client, &path))
            .await
            .with_context(|| format!("Failed to resolve version of comment #{}", args.comment_id))?;

        let body = UpdateCommentRequest {
            text: args.text.clone(),
            version: current,
        };
        let raw: Value = client
            .put(&path, &body)
            .await
            .with_context(|| format!("Failed to update comment #{}", args.comment_id))?;

        if global.json {
            return crate::output::write_json(&raw);
        }
        output.write_success(&format!("Updated comment #{}", args.comment_id));
        Ok(())
    }

    /// Delete a comment
    async fn delete(&self, args: &DeleteArgs, global: &GlobalOptions) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        let path = prs::comment_path(&project, &repo, args.id, args.comment_id);
        let current = version::resolve(args.version, || version::fetch(&client, &path))
            .await
            .with_context(|| format!("Failed to resolve version of comment #{}", args.comment_id))?;

        client
            .delete(&path, &[("version".to_string(), current.to_string())])
            .await
            .with_context(|| format!("Failed to delete comment #{}", args.comment_id))?;

        output.write_success(&format!("Deleted comment #{}", args.comment_id));
        Ok(())
    }

    /// Add or remove an emoticon reaction
    async fn react(&self, args: &ReactArgs, add: bool, global: &GlobalOptions) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        let path = prs::reaction_path(&project, &repo, args.id, args.comment_id, &args.emoticon);
        if add {
            let raw = client
                .put_empty(&path)
                .await
                .with_context(|| format!("Failed to react to comment #{}", args.comment_id))?;
            if global.json {
                return crate::output::write_json(&raw);
            }
            output.write_success(&format!(
                "Reacted to comment #{} with :{}:",
                args.comment_id, args.emoticon
            ));
        } else {
            client
                .delete(&path, &[])
                .await
                .with_context(|| {
                    format!("Failed to remove reaction from comment #{}", args.comment_id)
                })?;
            output.write_success(&format!(
                "Removed :{}: reaction from comment #{}",
                args.emoticon, args.comment_id
            ));
        }
        Ok(())
    }
}
