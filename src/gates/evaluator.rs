use std::io::Write;

use tracing::info;

use super::matcher::CommandMatcher;
use super::messages;
use super::{ApprovalDecision, Comment, GateOutcome, TeamMembership};
use crate::config::RunContext;
use crate::errors::GateError;
use crate::github::ThreadHost;
use crate::workflow::Workflow;

/// Name of the step output carrying the decision.
pub const APPROVED_OUTPUT: &str = "approved";

/// Validated gate inputs.
#[derive(Debug, Clone)]
pub struct GateSettings {
    pub matcher: CommandMatcher,
    pub team_name: String,
    pub fail_if_approval_not_found: bool,
    pub post_successful_approval_comment: bool,
    pub successful_approval_comment: String,
}

/// Scan `comments` in order and return the first approval by a team member.
///
/// Matching comments from non-members are logged and skipped; they are never
/// reconsidered.
pub fn find_approval(
    comments: &[Comment],
    members: &TeamMembership,
    matcher: &CommandMatcher,
    team_name: &str,
) -> ApprovalDecision {
    for comment in comments {
        if !matcher.matches(&comment.body) {
            info!("Approval command not found in comment id {}...", comment.id);
            continue;
        }

        info!("Approval command found in comment id {}...", comment.id);
        if members.contains(&comment.author) {
            info!("Found {} in team: {}", comment.author, team_name);
            return ApprovalDecision::approved_by(&comment.author);
        }
        info!("Not found {} in team: {}", comment.author, team_name);
    }

    ApprovalDecision::not_approved()
}

/// Runs the gate against a thread: membership, comments, scan, notify.
pub struct ApprovalEvaluator<'a, H: ThreadHost + ?Sized> {
    host: &'a H,
    settings: &'a GateSettings,
    context: &'a RunContext,
}

impl<'a, H: ThreadHost + ?Sized> ApprovalEvaluator<'a, H> {
    pub fn new(host: &'a H, settings: &'a GateSettings, context: &'a RunContext) -> Self {
        Self {
            host,
            settings,
            context,
        }
    }

    /// All members of the configured team. Completes before any comment is read.
    pub async fn resolve_membership(&self) -> Result<TeamMembership, GateError> {
        let org = &self.context.thread.owner;
        info!(
            "Getting team membership for: @{}/{}...",
            org, self.settings.team_name
        );
        let logins = self
            .host
            .list_team_members(org, &self.settings.team_name)
            .await?;
        let members: TeamMembership = logins.into_iter().collect();
        info!("Found {} team members", members.len());
        Ok(members)
    }

    pub async fn fetch_comments(&self) -> Result<Vec<Comment>, GateError> {
        let comments = self.host.list_issue_comments(&self.context.thread).await?;
        info!("Found {} comments to check", comments.len());
        Ok(comments)
    }

    /// Evaluate the gate and perform its side effects.
    ///
    /// The `approved` output is written before any comment is posted. A hard
    /// failure is reported as `GateOutcome::NotApproved { enforced: true }`
    /// after the `::error::` annotation is emitted; errors are reserved for
    /// faults.
    pub async fn run<W: Write>(
        &self,
        workflow: &mut Workflow<W>,
    ) -> Result<GateOutcome, GateError> {
        let settings = self.settings;
        let ctx = self.context;
        let phrase = settings.matcher.phrase();

        info!(
            "Checking for '{}' command in comments from someone in the '{}' team",
            phrase, settings.team_name
        );

        let members = self.resolve_membership().await?;
        let comments = self.fetch_comments().await?;
        let decision = find_approval(&comments, &members, &settings.matcher, &settings.team_name);

        workflow.set_output(APPROVED_OUTPUT, &decision.approved.to_string())?;

        if let Some(approver) = decision.approver {
            info!("Approval authorized by {}", approver);
            if settings.post_successful_approval_comment {
                let body =
                    messages::success_comment(&ctx.actor, &settings.successful_approval_comment);
                self.host.create_comment(&ctx.thread, &body).await?;
            }
            return Ok(GateOutcome::Approved { approver });
        }

        info!("Approval not found or not authorized");

        let enforced = settings.fail_if_approval_not_found;
        let owner = &ctx.thread.owner;
        let body = messages::reminder_comment(
            &ctx.actor,
            owner,
            &settings.team_name,
            phrase,
            enforced,
            &ctx.run_url(),
        );
        self.host.create_comment(&ctx.thread, &body).await?;

        let message = messages::missing_approval(phrase, owner, &settings.team_name);
        if enforced {
            workflow.error(&message)?;
        } else {
            workflow.notice(&message)?;
        }

        Ok(GateOutcome::NotApproved { enforced, message })
    }
}
