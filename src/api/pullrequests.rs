//
//  bbdc-cli
//  api/pullrequests.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket Data Center Pull Request API
//!
//! Wire types and endpoint paths for the pull-request lifecycle in Bitbucket
//! Data Center / Server. Pull requests propose merging a source branch
//! (`fromRef`) into a target branch (`toRef`), track reviewers and
//! participants, and carry an integer `version` used for optimistic
//! concurrency on every mutating call.
//!
//! ## Endpoint trees
//!
//! Most operations live under `api/latest`:
//! ```text
//! GET/POST   projects/{projectKey}/repos/{repoSlug}/pull-requests
//! GET/PUT/DELETE .../pull-requests/{id}
//! POST       .../pull-requests/{id}/merge | /decline | /reopen
//! ```
//!
//! Two operations live in sibling trees off the same `/rest` root: rebase
//! under `git/latest`, and comment reactions under `comment-likes/latest`.
//!
//! ## Notes
//!
//! - Timestamps (`createdDate`, `updatedDate`) are Unix milliseconds
//! - Branch IDs use the full ref path format: "refs/heads/branch-name"
//! - Reviewer identity uses `{"user":{"name": ...}}`; some server
//!   configurations expect a slug instead of a name

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Endpoint paths, relative to the configured /rest root
// ---------------------------------------------------------------------------

/// Path of the pull-request collection for a repository.
pub fn list_path(project: &str, repo: &str) -> String {
    format!("api/latest/projects/{project}/repos/{repo}/pull-requests")
}

/// Path of a single pull request.
pub fn pr_path(project: &str, repo: &str, id: u64) -> String {
    format!("{}/{id}", list_path(project, repo))
}

/// Path of the merge operation.
pub fn merge_path(project: &str, repo: &str, id: u64) -> String {
    format!("{}/merge", pr_path(project, repo, id))
}

/// Path of the decline operation.
pub fn decline_path(project: &str, repo: &str, id: u64) -> String {
    format!("{}/decline", pr_path(project, repo, id))
}

/// Path of the reopen operation.
pub fn reopen_path(project: &str, repo: &str, id: u64) -> String {
    format!("{}/reopen", pr_path(project, repo, id))
}

/// Path of the rebase operation, which lives in the `git/latest` tree.
pub fn rebase_path(project: &str, repo: &str, id: u64) -> String {
    format!("git/latest/projects/{project}/repos/{repo}/pull-requests/{id}/rebase")
}

/// Path of the whole-PR diff.
pub fn diff_path(project: &str, repo: &str, id: u64) -> String {
    format!("{}/diff", pr_path(project, repo, id))
}

/// Path of the current user's approval marker.
pub fn approve_path(project: &str, repo: &str, id: u64) -> String {
    format!("{}/approve", pr_path(project, repo, id))
}

/// Path of the current user's pending review.
pub fn review_path(project: &str, repo: &str, id: u64) -> String {
    format!("{}/review", pr_path(project, repo, id))
}

/// Path of the comment collection.
pub fn comments_path(project: &str, repo: &str, id: u64) -> String {
    format!("{}/comments", pr_path(project, repo, id))
}

/// Path of a single comment.
pub fn comment_path(project: &str, repo: &str, id: u64, comment_id: u64) -> String {
    format!("{}/{comment_id}", comments_path(project, repo, id))
}

/// Path of a comment reaction, which lives in the `comment-likes/latest` tree.
pub fn reaction_path(project: &str, repo: &str, id: u64, comment_id: u64, emoticon: &str) -> String {
    format!(
        "comment-likes/latest/projects/{project}/repos/{repo}/pull-requests/{id}/comments/{comment_id}/reactions/{emoticon}"
    )
}

/// Path of the activity feed (the paged source of all comments).
pub fn activities_path(project: &str, repo: &str, id: u64) -> String {
    format!("{}/activities", pr_path(project, repo, id))
}

/// Path of the blocker-comment collection.
pub fn blocker_comments_path(project: &str, repo: &str, id: u64) -> String {
    format!("{}/blocker-comments", pr_path(project, repo, id))
}

/// Path of the participant collection.
pub fn participants_path(project: &str, repo: &str, id: u64) -> String {
    format!("{}/participants", pr_path(project, repo, id))
}

/// Path of a single participant.
pub fn participant_path(project: &str, repo: &str, id: u64, user_slug: &str) -> String {
    format!("{}/{user_slug}", participants_path(project, repo, id))
}

/// Path of the auto-merge request for a pull request.
pub fn auto_merge_path(project: &str, repo: &str, id: u64) -> String {
    format!("{}/auto-merge", pr_path(project, repo, id))
}

/// Path of the authenticated user's pull-request dashboard.
pub fn dashboard_path() -> &'static str {
    "api/latest/dashboard/pull-requests"
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A pull request as returned by the server.
///
/// Only the fields the CLI renders are modeled; raw JSON output always
/// carries the complete server payload. The `version` field is the
/// optimistic-concurrency token echoed on mutating calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// Unique numeric identifier for this pull request.
    pub id: u64,

    /// Optimistic-concurrency token; stale values are rejected on writes.
    #[serde(default)]
    pub version: u64,

    /// Short summary title describing the changes.
    pub title: String,

    /// Detailed description, possibly Markdown.
    #[serde(default)]
    pub description: Option<String>,

    /// Current state: "OPEN", "MERGED", or "DECLINED".
    pub state: String,

    /// Whether the pull request is currently open for review.
    #[serde(default)]
    pub open: bool,

    /// Whether the pull request has been closed (merged or declined).
    #[serde(default)]
    pub closed: bool,

    /// Unix timestamp in milliseconds when the PR was created.
    #[serde(rename = "createdDate", default)]
    pub created_date: u64,

    /// Unix timestamp in milliseconds of the last update.
    #[serde(rename = "updatedDate", default)]
    pub updated_date: u64,

    /// Source branch reference containing the changes to merge.
    #[serde(rename = "fromRef")]
    pub from_ref: PrRef,

    /// Target branch reference where changes will be merged.
    #[serde(rename = "toRef")]
    pub to_ref: PrRef,

    /// The user who created this pull request.
    pub author: PrParticipant,

    /// Users assigned to review this pull request.
    #[serde(default)]
    pub reviewers: Vec<PrParticipant>,

    /// All users who have participated in this pull request.
    #[serde(default)]
    pub participants: Vec<PrParticipant>,

    /// Hypermedia links; `self` holds the web URL.
    #[serde(default)]
    pub links: Option<Links>,
}

impl PullRequest {
    /// The web URL of this pull request, when the server provided one.
    pub fn web_url(&self) -> Option<&str> {
        self.links
            .as_ref()
            .and_then(|l| l.self_links.first())
            .map(|h| h.href.as_str())
    }
}

/// Hypermedia links attached to a server entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Links {
    /// Self links; the first entry is the canonical web URL.
    #[serde(rename = "self", default)]
    pub self_links: Vec<Href>,
}

/// A single hyperlink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Href {
    /// Absolute URL.
    pub href: String,
}

/// Branch reference within a pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrRef {
    /// Full Git ref path, e.g. "refs/heads/feature/widget".
    pub id: String,

    /// Human-readable short name, e.g. "feature/widget".
    #[serde(rename = "displayId")]
    pub display_id: String,

    /// SHA of the latest commit on this branch, when populated.
    #[serde(rename = "latestCommit", default)]
    pub latest_commit: Option<String>,
}

/// A participant in a pull request: the author, a reviewer, or a commenter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrParticipant {
    /// The user who is participating.
    pub user: User,

    /// Role: "AUTHOR", "REVIEWER", or "PARTICIPANT".
    #[serde(default)]
    pub role: String,

    /// Whether this participant has approved the pull request.
    #[serde(default)]
    pub approved: bool,

    /// Review status: "APPROVED", "UNAPPROVED", or "NEEDS_WORK".
    #[serde(default)]
    pub status: Option<String>,
}

/// A user in Bitbucket Data Center.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Username (login name).
    pub name: String,

    /// Full display name.
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,

    /// Email address, when not hidden by privacy settings.
    #[serde(rename = "emailAddress", default)]
    pub email_address: Option<String>,

    /// URL-safe version of the username.
    #[serde(default)]
    pub slug: Option<String>,
}

impl User {
    /// The best human-readable name available for display.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// A pull-request comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Unique numeric identifier for this comment.
    pub id: u64,

    /// Optimistic-concurrency token; required on update and delete.
    #[serde(default)]
    pub version: u64,

    /// Comment text, possibly Markdown.
    pub text: String,

    /// The comment author.
    pub author: User,

    /// Unix timestamp in milliseconds when the comment was created.
    #[serde(rename = "createdDate", default)]
    pub created_date: u64,

    /// Unix timestamp in milliseconds of the last edit.
    #[serde(rename = "updatedDate", default)]
    pub updated_date: u64,

    /// Severity: "NORMAL" or "BLOCKER".
    #[serde(default)]
    pub severity: Option<String>,

    /// State for blocker comments: "OPEN" or "RESOLVED".
    #[serde(default)]
    pub state: Option<String>,
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Request body for creating a new pull request.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePullRequestRequest {
    /// Title summarizing the changes.
    pub title: String,

    /// Optional detailed description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Source branch specification.
    #[serde(rename = "fromRef")]
    pub from_ref: RefSpec,

    /// Target branch specification.
    #[serde(rename = "toRef")]
    pub to_ref: RefSpec,

    /// Users to assign as reviewers; omitted from JSON when empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reviewers: Vec<UserRef>,

    /// Draft flag, supported by newer Data Center versions. Omitted when
    /// unset so older servers never see the field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
}

/// Request body for updating an existing pull request.
///
/// The version is mandatory; omitted descriptive fields are left untouched
/// by the server.
#[derive(Debug, Clone, Serialize)]
pub struct UpdatePullRequestRequest {
    /// Current version of the pull request being updated.
    pub version: u64,

    /// New title, when changing it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// New description, when changing it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Replacement reviewer set; omitted from JSON when empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reviewers: Vec<UserRef>,
}

/// Request body for merging a pull request.
#[derive(Debug, Clone, Serialize)]
pub struct MergePullRequestRequest {
    /// Current version of the pull request; the merge fails on staleness.
    pub version: u64,

    /// Custom message for the merge commit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Merge strategy, e.g. "no-ff" or "squash". Server default when omitted.
    #[serde(rename = "strategyId", skip_serializing_if = "Option::is_none")]
    pub strategy_id: Option<String>,
}

/// Bare version payload, used by delete/rebase-style endpoints that take the
/// optimistic-concurrency token as their whole body.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VersionRef {
    /// Current version of the target resource.
    pub version: u64,
}

/// Branch reference specification for pull-request creation.
#[derive(Debug, Clone, Serialize)]
pub struct RefSpec {
    /// Full Git ref path, "refs/heads/<branch-name>".
    pub id: String,

    /// Repository containing this branch.
    pub repository: RepositorySpec,
}

/// Repository specification within a [`RefSpec`].
#[derive(Debug, Clone, Serialize)]
pub struct RepositorySpec {
    /// URL-safe repository identifier.
    pub slug: String,

    /// Project containing this repository.
    pub project: ProjectSpec,
}

/// Project specification within a [`RepositorySpec`].
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSpec {
    /// Short uppercase project key, e.g. "PROJ".
    pub key: String,
}

/// User reference for reviewer and participant bodies.
#[derive(Debug, Clone, Serialize)]
pub struct UserRef {
    /// User name specification.
    pub user: UserName,
}

/// User name wrapper matching the API's `{"user":{"name": ...}}` shape.
#[derive(Debug, Clone, Serialize)]
pub struct UserName {
    /// Username (login name).
    pub name: String,
}

/// Request body for adding a participant or reviewer.
#[derive(Debug, Clone, Serialize)]
pub struct AddParticipantRequest {
    /// The user to add.
    pub user: UserName,

    /// Role: "REVIEWER" or "PARTICIPANT".
    pub role: String,
}

/// Request body for completing the current user's review.
#[derive(Debug, Clone, Serialize)]
pub struct CompleteReviewRequest {
    /// Resulting participant status: "APPROVED", "UNAPPROVED", or
    /// "NEEDS_WORK".
    #[serde(rename = "participantStatus")]
    pub participant_status: String,

    /// Summary comment published with the review.
    #[serde(rename = "commentText", skip_serializing_if = "Option::is_none")]
    pub comment_text: Option<String>,

    /// Commit hash the review covered, when tracked.
    #[serde(rename = "lastReviewedCommit", skip_serializing_if = "Option::is_none")]
    pub last_reviewed_commit: Option<String>,
}

/// Request body for adding a comment.
#[derive(Debug, Clone, Serialize)]
pub struct CommentRequest {
    /// Comment text.
    pub text: String,

    /// Severity: "NORMAL" (default) or "BLOCKER".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    /// Parent comment when replying to a thread.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<CommentParent>,
}

/// Parent reference for threaded replies.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CommentParent {
    /// Identifier of the comment being replied to.
    pub id: u64,
}

/// Request body for editing a comment.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateCommentRequest {
    /// Replacement text.
    pub text: String,

    /// Current version of the comment being edited.
    pub version: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_relative_to_rest_root() {
        assert_eq!(
            pr_path("PRJ", "widget", 42),
            "api/latest/projects/PRJ/repos/widget/pull-requests/42"
        );
        assert_eq!(
            rebase_path("PRJ", "widget", 42),
            "git/latest/projects/PRJ/repos/widget/pull-requests/42/rebase"
        );
        assert_eq!(
            reaction_path("PRJ", "widget", 42, 7, "thumbsup"),
            "comment-likes/latest/projects/PRJ/repos/widget/pull-requests/42/comments/7/reactions/thumbsup"
        );
    }

    #[test]
    fn test_create_request_omits_empty_fields() {
        let body = CreatePullRequestRequest {
            title: "Add widget".into(),
            description: None,
            from_ref: RefSpec {
                id: "refs/heads/feature/widget".into(),
                repository: RepositorySpec {
                    slug: "widget".into(),
                    project: ProjectSpec { key: "PRJ".into() },
                },
            },
            to_ref: RefSpec {
                id: "refs/heads/develop".into(),
                repository: RepositorySpec {
                    slug: "widget".into(),
                    project: ProjectSpec { key: "PRJ".into() },
                },
            },
            reviewers: Vec::new(),
            draft: None,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("description").is_none());
        assert!(json.get("reviewers").is_none());
        assert!(json.get("draft").is_none());
        assert_eq!(json["fromRef"]["id"], "refs/heads/feature/widget");
        assert_eq!(json["toRef"]["repository"]["project"]["key"], "PRJ");
    }

    #[test]
    fn test_reviewer_shape_uses_user_name() {
        let reviewer = UserRef {
            user: UserName {
                name: "some.username".into(),
            },
        };
        let json = serde_json::to_value(&reviewer).unwrap();
        assert_eq!(json["user"]["name"], "some.username");
    }

    #[test]
    fn test_pull_request_deserializes_version_and_links() {
        let json = r#"{
            "id": 3, "version": 9, "title": "T", "state": "OPEN",
            "open": true, "closed": false,
            "createdDate": 1700000000000, "updatedDate": 1700000001000,
            "fromRef": {"id": "refs/heads/a", "displayId": "a"},
            "toRef": {"id": "refs/heads/b", "displayId": "b"},
            "author": {"user": {"name": "jo"}, "role": "AUTHOR"},
            "links": {"self": [{"href": "https://host/projects/PRJ/repos/widget/pull-requests/3"}]}
        }"#;
        let pr: PullRequest = serde_json::from_str(json).unwrap();
        assert_eq!(pr.version, 9);
        assert_eq!(pr.author.user.label(), "jo");
        assert_eq!(
            pr.web_url(),
            Some("https://host/projects/PRJ/repos/widget/pull-requests/3")
        );
    }
}
