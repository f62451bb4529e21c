//
//  bbdc-cli
//  cli/participant.rs
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
use crate::api::pullrequests::{AddParticipantRequest, PrParticipant, UserName};
use crate::api::PageCursor;
use crate::output::TableOutput;

/// Manage pull request participants
#[derive(Args, Debug)]
pub struct ParticipantCommand {
    #[command(subcommand)]
    pub command: ParticipantSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ParticipantSubcommand {
    /// List participants of a pull request
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Add a user as reviewer or participant
    Add(AddArgs),

    /// Remove a user from a pull request
    Remove(RemoveArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Pull request ID
    pub id: u64,

    /// Page size for each request
    #[arg(long, short = 'L', default_value = "50")]
    pub limit: u32,

    /// Maximum number of participants to list
    #[arg(long, default_value = "200")]
    pub max_items: usize,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Pull request ID
    pub id: u64,

    /// Username to add
    pub user: String,

    /// Role to assign
    #[arg(long, value_parser = ["reviewer", "participant"], default_value = "reviewer")]
    pub role: String,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Pull request ID
    pub id: u64,

    /// User slug to remove
    pub user: String,
}

impl TableOutput for PrParticipant {
    fn print_table(&self, color: bool) {
        let status = self.status.as_deref().unwrap_or("UNAPPROVED");
        let status_styled = if color {
            match status {
                "APPROVED" => style(status).green().to_string(),
                "NEEDS_WORK" => style(status).red().to_string(),
                _ => status.to_string(),
            }
        } else {
            status.to_string()
        };

        println!(
            "{:<25} {:<12} {}",
            self.user.label(),
            self.role,
            status_styled
        );
    }
}

impl ParticipantCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ParticipantSubcommand::List(args) => self.list(args, global).await,
            ParticipantSubcommand::Add(args) => self.add(args, global).await,
            ParticipantSubcommand::Remove(args) => self.remove(args, global).await,
        }
    }

    /// List participants
    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        let cursor = PageCursor::<Value>::new(
            &client,
            prs::participants_path(&project, &repo, args.id),
            Vec::new(),
            args.limit,
        );
        let values = cursor
            .collect(Some(args.max_items))
            .await
            .with_context(|| format!("Failed to list participants of pull request #{}", args.id))?;

        let typed: Vec<PrParticipant> = values
            .iter()
            .cloned()
            .map(serde_json::from_value)
            .collect::<Result<_, _>>()
            .context("Unexpected participant payload")?;

        output.write_list(&Value::Array(values), &typed)
    }

    /// Add a reviewer or participant
    async fn add(&self, args: &AddArgs, global: &GlobalOptions) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        let body = AddParticipantRequest {
            user: UserName {
                name: args.user.clone(),
            },
            role: args.role.to_uppercase(),
        };

        let raw: Value = client
            .post(&prs::participants_path(&project, &repo, args.id), &body)
            .await
            .with_context(|| {
                format!("Failed to add {} to pull request #{}", args.user, args.id)
            })?;

        if global.json {
            return crate::output::write_json(&raw);
        }
        output.write_success(&format!(
            "Added {} to PR #{} as {}",
            args.user,
            args.id,
            args.role.to_uppercase()
        ));
        Ok(())
    }

    /// Remove a participant
    async fn remove(&self, args: &RemoveArgs, global: &GlobalOptions) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        client
            .delete(
                &prs::participant_path(&project, &repo, args.id, &args.user),
                &[],
            )
            .await
            .with_context(|| {
                format!(
                    "Failed to remove {} from pull request #{}",
                    args.user, args.id
                )
            })?;

        output.write_success(&format!("Removed {} from PR #{}", args.user, args.id));
        Ok(())
    }
}
