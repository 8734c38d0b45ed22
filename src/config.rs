//! Runtime configuration for the gate.
//!
//! Inputs arrive the way the GitHub Actions runner delivers them, as
//! `INPUT_<NAME>` environment variables, and every one of them can be
//! overridden by a CLI flag. The run context (repository, thread, actor, run
//! id) is assembled from the standard `GITHUB_*` variables plus the event
//! payload file the runner writes to `GITHUB_EVENT_PATH`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Args};
use serde::Deserialize;

use crate::errors::GateError;
use crate::gates::{CommandMatcher, GateSettings};
use crate::github::ThreadRef;
use crate::github::client::DEFAULT_API_URL;

pub const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Parse a boolean input the way the Actions toolkit does: YAML 1.2 core
/// schema spellings only.
pub fn parse_input_bool(value: &str) -> Result<bool, String> {
    match value.trim() {
        "true" | "True" | "TRUE" => Ok(true),
        "false" | "False" | "FALSE" => Ok(false),
        other => Err(format!(
            "'{}' is not a boolean. Valid values: true, True, TRUE, false, False, FALSE",
            other
        )),
    }
}

/// Action inputs.
#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Token used for all GitHub API calls
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Phrase a team member must comment to approve
    #[arg(long, env = "INPUT_APPROVE-COMMAND")]
    pub approve_command: String,

    /// Slug of the team whose members may approve
    #[arg(long, env = "INPUT_TEAM-NAME")]
    pub team_name: String,

    /// Fail the run (instead of emitting a notice) when no approval is found
    #[arg(
        long,
        env = "INPUT_FAIL-IF-APPROVAL-NOT-FOUND",
        action = ArgAction::Set,
        value_parser = parse_input_bool
    )]
    pub fail_if_approval_not_found: bool,

    /// Reply on the thread when approval is found
    #[arg(
        long,
        env = "INPUT_POST-SUCCESSFUL-APPROVAL-COMMENT",
        action = ArgAction::Set,
        value_parser = parse_input_bool
    )]
    pub post_successful_approval_comment: bool,

    /// Text of the reply posted on approval
    #[arg(long, env = "INPUT_SUCCESSFUL-APPROVAL-COMMENT")]
    pub successful_approval_comment: String,
}

/// Run context, normally supplied by the runner environment.
#[derive(Debug, Clone, Args)]
pub struct ContextArgs {
    /// Repository as owner/repo
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Path to the webhook event payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// Issue or pull request number (defaults to the one in the event payload)
    #[arg(long)]
    pub issue_number: Option<u64>,

    /// Workflow run id, used to link the run from the reminder comment
    #[arg(long, env = "GITHUB_RUN_ID")]
    pub run_id: Option<String>,

    /// Actor to mention when the event carries no comment author
    #[arg(long, env = "GITHUB_ACTOR")]
    pub actor: Option<String>,

    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    #[arg(long, env = "GITHUB_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,

    /// File that receives step outputs
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output_file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct EventUser {
    login: String,
}

#[derive(Debug, Default, Deserialize)]
struct EventComment {
    user: Option<EventUser>,
}

#[derive(Debug, Default, Deserialize)]
struct EventNumbered {
    number: u64,
}

#[derive(Debug, Default, Deserialize)]
struct EventRepository {
    html_url: Option<String>,
}

/// The parts of a webhook event payload the gate reads.
#[derive(Debug, Default, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    issue: Option<EventNumbered>,
    #[serde(default)]
    pull_request: Option<EventNumbered>,
    #[serde(default)]
    number: Option<u64>,
    #[serde(default)]
    comment: Option<EventComment>,
    #[serde(default)]
    repository: Option<EventRepository>,
}

impl EventPayload {
    pub fn load(path: &Path) -> Result<Self, GateError> {
        let load = || -> anyhow::Result<Self> {
            let text = std::fs::read_to_string(path).context("Failed to read file")?;
            serde_json::from_str(&text).context("Invalid JSON")
        };
        load().map_err(|source| GateError::EventPayload {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Thread number: issue first, then pull request, then top-level `number`.
    pub fn thread_number(&self) -> Option<u64> {
        self.issue
            .as_ref()
            .map(|i| i.number)
            .or_else(|| self.pull_request.as_ref().map(|p| p.number))
            .or(self.number)
    }

    /// Author of the comment that triggered the event.
    pub fn comment_author(&self) -> Option<&str> {
        self.comment
            .as_ref()
            .and_then(|c| c.user.as_ref())
            .map(|u| u.login.as_str())
    }

    pub fn repository_url(&self) -> Option<&str> {
        self.repository
            .as_ref()
            .and_then(|r| r.html_url.as_deref())
    }
}

/// Where the gate runs and who it answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub thread: ThreadRef,
    /// Login mentioned in every comment the gate posts.
    pub actor: String,
    pub repository_url: String,
    pub run_id: String,
}

impl RunContext {
    pub fn resolve(args: &ContextArgs) -> Result<Self, GateError> {
        let repository = args
            .repository
            .as_deref()
            .ok_or_else(|| GateError::Config("GITHUB_REPOSITORY is not set".to_string()))?;
        let (owner, repo) = split_repository(repository)?;

        let payload = match &args.event_path {
            Some(path) => EventPayload::load(path)?,
            None => EventPayload::default(),
        };

        let number = args
            .issue_number
            .or_else(|| payload.thread_number())
            .ok_or_else(|| {
                GateError::Config(
                    "could not determine the issue or pull request number from the event payload"
                        .to_string(),
                )
            })?;

        let actor = payload
            .comment_author()
            .map(str::to_string)
            .or_else(|| args.actor.clone())
            .ok_or_else(|| {
                GateError::Config(
                    "could not determine the triggering actor (no comment author and no GITHUB_ACTOR)"
                        .to_string(),
                )
            })?;

        let repository_url = payload
            .repository_url()
            .map(str::to_string)
            .unwrap_or_else(|| {
                format!("{}/{}/{}", args.server_url.trim_end_matches('/'), owner, repo)
            });

        let run_id = args
            .run_id
            .clone()
            .ok_or_else(|| GateError::Config("GITHUB_RUN_ID is not set".to_string()))?;

        Ok(Self {
            thread: ThreadRef {
                owner,
                repo,
                number,
            },
            actor,
            repository_url,
            run_id,
        })
    }

    pub fn run_url(&self) -> String {
        format!("{}/actions/runs/{}", self.repository_url, self.run_id)
    }
}

fn split_repository(repository: &str) -> Result<(String, String), GateError> {
    let parts: Vec<&str> = repository.split('/').collect();
    if parts.len() == 2 && !parts[0].is_empty() && !parts[1].is_empty() {
        Ok((parts[0].to_string(), parts[1].to_string()))
    } else {
        Err(GateError::Config(format!(
            "repository '{}' is not in owner/repo form",
            repository
        )))
    }
}

/// Everything a gate run needs, validated.
#[derive(Clone)]
pub struct Config {
    pub settings: GateSettings,
    pub context: RunContext,
    pub token: String,
    pub api_url: String,
    pub output_file: Option<PathBuf>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("settings", &self.settings)
            .field("context", &self.context)
            .field("token", &"[redacted]")
            .field("api_url", &self.api_url)
            .field("output_file", &self.output_file)
            .finish()
    }
}

impl Config {
    pub fn from_args(inputs: InputArgs, context: ContextArgs) -> Result<Self, GateError> {
        if inputs.token.trim().is_empty() {
            return Err(GateError::Config("token must not be empty".to_string()));
        }
        if inputs.team_name.trim().is_empty() {
            return Err(GateError::Config("team-name must not be empty".to_string()));
        }

        let settings = GateSettings {
            matcher: CommandMatcher::new(inputs.approve_command)?,
            team_name: inputs.team_name.trim().to_string(),
            fail_if_approval_not_found: inputs.fail_if_approval_not_found,
            post_successful_approval_comment: inputs.post_successful_approval_comment,
            successful_approval_comment: inputs.successful_approval_comment,
        };
        let run_context = RunContext::resolve(&context)?;

        Ok(Self {
            settings,
            context: run_context,
            token: inputs.token,
            api_url: context.api_url,
            output_file: context.output_file,
        })
    }
}
