//! GitHub access for the gate.
//!
//! The gate only ever talks to the host through [`ThreadHost`], so the
//! evaluator can run against the REST client in production and an in-memory
//! host in tests.

pub mod client;

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::GateError;
use crate::gates::Comment;

pub use client::GitHubClient;

/// Login GitHub reports for comments whose author account was deleted.
pub const GHOST_LOGIN: &str = "ghost";

/// Identifies an issue or pull request thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl std::fmt::Display for ThreadRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// Operations the gate needs from the code host.
#[async_trait]
pub trait ThreadHost: Send + Sync {
    /// Every member login of `org/team_slug`, all pages.
    async fn list_team_members(
        &self,
        org: &str,
        team_slug: &str,
    ) -> Result<Vec<String>, GateError>;

    /// Every comment on the thread in creation order, all pages.
    async fn list_issue_comments(&self, thread: &ThreadRef) -> Result<Vec<Comment>, GateError>;

    async fn create_comment(&self, thread: &ThreadRef, body: &str) -> Result<(), GateError>;
}

/// A GitHub user (subset of fields).
#[derive(Debug, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

/// An issue comment as returned by the REST API (subset of fields).
#[derive(Debug, Deserialize)]
pub struct GitHubComment {
    pub id: u64,
    pub body: Option<String>,
    pub user: Option<GitHubUser>,
}

impl From<GitHubComment> for Comment {
    fn from(c: GitHubComment) -> Self {
        Comment {
            id: c.id,
            body: c.body.unwrap_or_default(),
            author: c
                .user
                .map(|u| u.login)
                .unwrap_or_else(|| GHOST_LOGIN.to_string()),
        }
    }
}

/// Error body GitHub sends with non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct GitHubErrorBody {
    pub message: String,
}
