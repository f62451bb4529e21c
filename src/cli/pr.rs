//
//  bbdc-cli
//  cli/pr.rs
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
use crate::api::pullrequests::{
    CreatePullRequestRequest, MergePullRequestRequest, ProjectSpec, PullRequest, RefSpec,
    RepositorySpec, UpdatePullRequestRequest, UserName, UserRef, VersionRef,
};
use crate::api::{version, PageCursor};
use crate::output::{print_field, print_header, TableOutput};
use crate::util::{format_timestamp, truncate};

/// Manage pull requests
#[derive(Args, Debug)]
pub struct PrCommand {
    #[command(subcommand)]
    pub command: PrSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PrSubcommand {
    /// List pull requests
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// View a pull request
    #[command(visible_alias = "view")]
    Get(GetArgs),

    /// Create a pull request
    Create(CreateArgs),

    /// Edit a pull request's title, description, or reviewers
    #[command(visible_alias = "edit")]
    Update(UpdateArgs),

    /// Delete a pull request
    Delete(DeleteArgs),

    /// Merge a pull request
    Merge(MergeArgs),

    /// Rebase a pull request onto its target branch
    Rebase(RebaseArgs),

    /// Decline a pull request
    Decline(DeclineArgs),

    /// Reopen a declined pull request
    Reopen(ReopenArgs),

    /// View the pull request diff
    Diff(DiffArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by state
    #[arg(long, short = 's', value_parser = ["open", "merged", "declined", "all"], default_value = "open")]
    pub state: String,

    /// Filter by direction relative to the repository
    #[arg(long, value_parser = ["incoming", "outgoing"])]
    pub direction: Option<String>,

    /// Filter by target branch
    #[arg(long)]
    pub at: Option<String>,

    /// Page size for each request
    #[arg(long, short = 'L', default_value = "50")]
    pub limit: u32,

    /// Maximum number of pull requests to list
    #[arg(long, default_value = "200")]
    pub max_items: usize,

    /// Fetch every page, ignoring --max-items
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Pull request ID
    pub id: u64,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Pull request title
    #[arg(long, short = 't')]
    pub title: String,

    /// Pull request description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Source branch containing the changes
    #[arg(long, short = 'H')]
    pub from_branch: String,

    /// Target branch to merge into
    #[arg(long, short = 'B')]
    pub to_branch: String,

    /// Reviewer username (repeatable; some servers resolve the user slug)
    #[arg(long = "reviewer")]
    pub reviewers: Vec<String>,

    /// Create as a draft pull request
    #[arg(long)]
    pub draft: bool,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Pull request ID
    pub id: u64,

    /// New title
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// New description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Replacement reviewer username (repeatable)
    #[arg(long = "reviewer")]
    pub reviewers: Vec<String>,

    /// Expected current version; fetched from the server when omitted
    #[arg(long)]
    pub version: Option<u64>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Pull request ID
    pub id: u64,

    /// Expected current version; fetched from the server when omitted
    #[arg(long)]
    pub version: Option<u64>,
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Pull request ID
    pub id: u64,

    /// Custom merge commit message
    #[arg(long, short = 'm')]
    pub message: Option<String>,

    /// Merge strategy (e.g. no-ff, ff-only, squash); server default when omitted
    #[arg(long)]
    pub strategy: Option<String>,

    /// Expected current version; fetched from the server when omitted
    #[arg(long)]
    pub version: Option<u64>,
}

#[derive(Args, Debug)]
pub struct RebaseArgs {
    /// Pull request ID
    pub id: u64,

    /// Expected current version; fetched from the server when omitted
    #[arg(long)]
    pub version: Option<u64>,
}

#[derive(Args, Debug)]
pub struct DeclineArgs {
    /// Pull request ID
    pub id: u64,

    /// Expected current version; fetched from the server when omitted
    #[arg(long)]
    pub version: Option<u64>,
}

#[derive(Args, Debug)]
pub struct ReopenArgs {
    /// Pull request ID
    pub id: u64,

    /// Expected current version; fetched from the server when omitted
    #[arg(long)]
    pub version: Option<u64>,
}

#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Pull request ID
    pub id: u64,

    /// Number of context lines around each change
    #[arg(long)]
    pub context_lines: Option<u32>,
}

/// One row in the `pr list` table.
struct PrListItem {
    id: u64,
    state: String,
    title: String,
    author: String,
    source_branch: String,
    destination_branch: String,
}

impl From<&PullRequest> for PrListItem {
    fn from(pr: &PullRequest) -> Self {
        Self {
            id: pr.id,
            state: pr.state.clone(),
            title: pr.title.clone(),
            author: pr.author.user.label().to_string(),
            source_branch: pr.from_ref.display_id.clone(),
            destination_branch: pr.to_ref.display_id.clone(),
        }
    }
}

impl TableOutput for PrListItem {
    fn print_table(&self, color: bool) {
        let state_styled = if color {
            match self.state.as_str() {
                "OPEN" => style("OPEN").green().to_string(),
                "MERGED" => style("MERGED").magenta().to_string(),
                "DECLINED" => style("DECLINED").red().to_string(),
                _ => self.state.clone(),
            }
        } else {
            self.state.clone()
        };

        let title_truncated = truncate(&self.title, 45);
        let author_truncated = truncate(&self.author, 18);
        let source = truncate(&self.source_branch, 20);
        let dest = truncate(&self.destination_branch, 15);
        let branches = format!("{} → {}", source, dest);

        let id_styled = if color {
            style(format!("#{}", self.id)).cyan().to_string()
        } else {
            format!("#{}", self.id)
        };

        println!(
            "{:<7} {:<10} {:<45}  {:<18}  {}",
            id_styled, state_styled, title_truncated, author_truncated, branches
        );
    }
}

impl TableOutput for PullRequest {
    fn print_table(&self, color: bool) {
        let state_styled = if color {
            match self.state.as_str() {
                "OPEN" => style(&self.state).green().bold().to_string(),
                "MERGED" => style(&self.state).magenta().bold().to_string(),
                "DECLINED" => style(&self.state).red().bold().to_string(),
                _ => self.state.clone(),
            }
        } else {
            self.state.clone()
        };

        print_header(&format!("PR #{}: {}", self.id, self.title));
        println!();

        print_field("State", &state_styled, color);
        print_field("Version", &self.version.to_string(), color);
        print_field("Author", self.author.user.label(), color);
        print_field(
            "Branches",
            &format!("{} → {}", self.from_ref.display_id, self.to_ref.display_id),
            color,
        );
        print_field("Created", &format_timestamp(self.created_date), color);
        print_field("Updated", &format_timestamp(self.updated_date), color);

        if !self.reviewers.is_empty() {
            let reviewers: Vec<String> = self
                .reviewers
                .iter()
                .map(|r| {
                    let mark = match r.status.as_deref() {
                        Some("APPROVED") => " ✓",
                        Some("NEEDS_WORK") => " ✗",
                        _ => "",
                    };
                    format!("{}{}", r.user.label(), mark)
                })
                .collect();
            print_field("Reviewers", &reviewers.join(", "), color);
        }

        if let Some(url) = self.web_url() {
            print_field("URL", url, color);
        }

        if let Some(description) = &self.description {
            if !description.is_empty() {
                println!();
                print_header("Description");
                println!("{}", description);
            }
        }
    }
}

impl PrCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            PrSubcommand::List(args) => self.list(args, global).await,
            PrSubcommand::Get(args) => self.get(args, global).await,
            PrSubcommand::Create(args) => self.create(args, global).await,
            PrSubcommand::Update(args) => self.update(args, global).await,
            PrSubcommand::Delete(args) => self.delete(args, global).await,
            PrSubcommand::Merge(args) => self.merge(args, global).await,
            PrSubcommand::Rebase(args) => self.rebase(args, global).await,
            PrSubcommand::Decline(args) => self.decline(args, global).await,
            PrSubcommand::Reopen(args) => self.reopen(args, global).await,
            PrSubcommand::Diff(args) => self.diff(args, global).await,
        }
    }

    /// List pull requests
    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        let mut query = vec![("state".to_string(), args.state.to_uppercase())];
        if let Some(direction) = &args.direction {
            query.push(("direction".to_string(), direction.to_uppercase()));
        }
        if let Some(at) = &args.at {
            query.push(("at".to_string(), branch_ref(at)));
        }

        let cursor = PageCursor::<Value>::new(
            &client,
            prs::list_path(&project, &repo),
            query,
            args.limit,
        );
        let cap = if args.all { None } else { Some(args.max_items) };
        let values = cursor
            .collect(cap)
            .await
            .context("Failed to list pull requests")?;

        let typed: Vec<PullRequest> = values
            .iter()
            .cloned()
            .map(serde_json::from_value)
            .collect::<Result<_, _>>()
            .context("Unexpected pull request payload")?;
        let rows: Vec<PrListItem> = typed.iter().map(PrListItem::from).collect();

        output.write_list(&Value::Array(values), &rows)?;
        if rows.is_empty() && !global.json {
            output.write_info("No pull requests found.");
        }
        Ok(())
    }

    /// View a pull request
    async fn get(&self, args: &GetArgs, global: &GlobalOptions) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        let raw: Value = client
            .get(&prs::pr_path(&project, &repo, args.id))
            .await
            .with_context(|| format!("Failed to fetch pull request #{}", args.id))?;
        let pr: PullRequest =
            serde_json::from_value(raw.clone()).context("Unexpected pull request payload")?;

        output.write(&raw, &pr)
    }

    /// Create a pull request
    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        let body = CreatePullRequestRequest {
            title: args.title.clone(),
            description: args.description.clone(),
            from_ref: ref_spec(&args.from_branch, &project, &repo),
            to_ref: ref_spec(&args.to_branch, &project, &repo),
            reviewers: reviewer_refs(&args.reviewers),
            draft: args.draft.then_some(true),
        };

        let raw: Value = client
            .post(&prs::list_path(&project, &repo), &body)
            .await
            .context("Failed to create pull request")?;
        let pr: PullRequest =
            serde_json::from_value(raw.clone()).context("Unexpected pull request payload")?;

        if global.json {
            return output.write(&raw, &pr);
        }
        output.write_success(&format!("Created PR #{}: {}", pr.id, pr.title));
        if let Some(url) = pr.web_url() {
            output.write_info(url);
        }
        Ok(())
    }

    /// Edit a pull request
    async fn update(&self, args: &UpdateArgs, global: &GlobalOptions) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        let path = prs::pr_path(&project, &repo, args.id);
        let current = version::resolve(args.version, || version::fetch(&client, &path))
            .await
            .with_context(|| format!("Failed to resolve version of pull request #{}", args.id))?;

        let body = UpdatePullRequestRequest {
            version: current,
            title: args.title.clone(),
            description: args.description.clone(),
            reviewers: reviewer_refs(&args.reviewers),
        };

        let raw: Value = client
            .put(&path, &body)
            .await
            .with_context(|| format!("Failed to update pull request #{}", args.id))?;
        let pr: PullRequest =
            serde_json::from_value(raw.clone()).context("Unexpected pull request payload")?;

        if global.json {
            return output.write(&raw, &pr);
        }
        output.write_success(&format!("Updated PR #{} (now version {})", pr.id, pr.version));
        Ok(())
    }

    /// Delete a pull request
    async fn delete(&self, args: &DeleteArgs, global: &GlobalOptions) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        let path = prs::pr_path(&project, &repo, args.id);
        let current = version::resolve(args.version, || version::fetch(&client, &path))
            .await
            .with_context(|| format!("Failed to resolve version of pull request #{}", args.id))?;

        client
            .delete_with_body(&path, &VersionRef { version: current })
            .await
            .with_context(|| format!("Failed to delete pull request #{}", args.id))?;

        output.write_success(&format!("Deleted PR #{}", args.id));
        Ok(())
    }

    /// Merge a pull request
    async fn merge(&self, args: &MergeArgs, global: &GlobalOptions) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        let pr_path = prs::pr_path(&project, &repo, args.id);
        let current = version::resolve(args.version, || version::fetch(&client, &pr_path))
            .await
            .with_context(|| format!("Failed to resolve version of pull request #{}", args.id))?;

        let body = MergePullRequestRequest {
            version: current,
            message: args.message.clone(),
            strategy_id: args.strategy.clone(),
        };
        let raw: Value = client
            .post(&prs::merge_path(&project, &repo, args.id), &body)
            .await
            .with_context(|| format!("Failed to merge pull request #{}", args.id))?;

        if global.json {
            return crate::output::write_json(&raw);
        }
        output.write_success(&format!("Merged PR #{}", args.id));
        Ok(())
    }

    /// Rebase a pull request onto its target branch
    async fn rebase(&self, args: &RebaseArgs, global: &GlobalOptions) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        let pr_path = prs::pr_path(&project, &repo, args.id);
        let current = version::resolve(args.version, || version::fetch(&client, &pr_path))
            .await
            .with_context(|| format!("Failed to resolve version of pull request #{}", args.id))?;

        let raw: Value = client
            .post(
                &prs::rebase_path(&project, &repo, args.id),
                &VersionRef { version: current },
            )
            .await
            .with_context(|| format!("Failed to rebase pull request #{}", args.id))?;

        if global.json {
            return crate::output::write_json(&raw);
        }
        output.write_success(&format!("Rebased PR #{}", args.id));
        Ok(())
    }

    /// Decline a pull request
    async fn decline(&self, args: &DeclineArgs, global: &GlobalOptions) -> Result<()> {
        self.transition(
            args.id,
            args.version,
            prs::decline_path,
            "decline",
            "Declined",
            global,
        )
        .await
    }

    /// Reopen a declined pull request
    async fn reopen(&self, args: &ReopenArgs, global: &GlobalOptions) -> Result<()> {
        self.transition(
            args.id,
            args.version,
            prs::reopen_path,
            "reopen",
            "Reopened",
            global,
        )
        .await
    }

    /// Shared decline/reopen path: POST with the version as a query parameter.
    async fn transition(
        &self,
        id: u64,
        explicit_version: Option<u64>,
        path_for: fn(&str, &str, u64) -> String,
        verb: &str,
        done: &str,
        global: &GlobalOptions,
    ) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        let pr_path = prs::pr_path(&project, &repo, id);
        let current = version::resolve(explicit_version, || version::fetch(&client, &pr_path))
            .await
            .with_context(|| format!("Failed to resolve version of pull request #{}", id))?;

        let raw = client
            .post_query(
                &path_for(&project, &repo, id),
                &[("version".to_string(), current.to_string())],
            )
            .await
            .with_context(|| format!("Failed to {} pull request #{}", verb, id))?;

        if global.json {
            return crate::output::write_json(&raw);
        }
        output.write_success(&format!("{} PR #{}", done, id));
        Ok(())
    }

    /// View the pull request diff
    async fn diff(&self, args: &DiffArgs, global: &GlobalOptions) -> Result<()> {
        let (project, repo) = global.target()?;
        let client = super::client()?;
        let output = global.output();

        let mut query = Vec::new();
        if let Some(context_lines) = args.context_lines {
            query.push(("contextLines".to_string(), context_lines.to_string()));
        }

        let raw: Value = client
            .get_query(&prs::diff_path(&project, &repo, args.id), &query)
            .await
            .with_context(|| format!("Failed to fetch diff of pull request #{}", args.id))?;

        if global.json {
            return crate::output::write_json(&raw);
        }

        // Table mode summarizes the structured diff per file.
        let diffs = raw
            .get("diffs")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        if diffs.is_empty() {
            output.write_info("No changes.");
            return Ok(());
        }
        for file in &diffs {
            let path = file
                .get("destination")
                .or_else(|| file.get("source"))
                .and_then(|d| d.get("toString"))
                .and_then(Value::as_str)
                .unwrap_or("(unknown file)");
            let hunks = file
                .get("hunks")
                .and_then(Value::as_array)
                .map(|h| h.len())
                .unwrap_or(0);
            println!(
                "{:<60} {} hunk{}",
                truncate(path, 58),
                hunks,
                if hunks == 1 { "" } else { "s" }
            );
        }
        Ok(())
    }
}

/// Expands a short branch name to a full ref path; full refs pass through.
fn branch_ref(name: &str) -> String {
    if name.starts_with("refs/") {
        name.to_string()
    } else {
        format!("refs/heads/{name}")
    }
}

fn ref_spec(branch: &str, project: &str, repo: &str) -> RefSpec {
    RefSpec {
        id: branch_ref(branch),
        repository: RepositorySpec {
            slug: repo.to_string(),
            project: ProjectSpec {
                key: project.to_string(),
            },
        },
    }
}

fn reviewer_refs(names: &[String]) -> Vec<UserRef> {
    names
        .iter()
        .map(|name| UserRef {
            user: UserName { name: name.clone() },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_ref_expands_short_names() {
        assert_eq!(branch_ref("feature/widget"), "refs/heads/feature/widget");
        assert_eq!(branch_ref("refs/heads/develop"), "refs/heads/develop");
        assert_eq!(branch_ref("refs/tags/v1"), "refs/tags/v1");
    }

    #[test]
    fn test_ref_spec_carries_repository_coordinates() {
        let spec = ref_spec("develop", "PRJ", "widget");
        assert_eq!(spec.id, "refs/heads/develop");
        assert_eq!(spec.repository.slug, "widget");
        assert_eq!(spec.repository.project.key, "PRJ");
    }

    #[test]
    fn test_list_item_from_pull_request() {
        let pr: PullRequest = serde_json::from_value(serde_json::json!({
            "id": 12, "version": 1, "title": "T", "state": "OPEN",
            "fromRef": {"id": "refs/heads/a", "displayId": "a"},
            "toRef": {"id": "refs/heads/b", "displayId": "b"},
            "author": {"user": {"name": "jo", "displayName": "Jo Doe"}}
        }))
        .unwrap();
        let item = PrListItem::from(&pr);
        assert_eq!(item.id, 12);
        assert_eq!(item.author, "Jo Doe");
        assert_eq!(item.destination_branch, "b");
    }
}
