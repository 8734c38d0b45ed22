//! Approval gate: decides whether a team member has approved a thread.
//!
//! - `matcher`: whitespace-insensitive comparison of comment bodies
//! - `evaluator`: the membership, comments, scan and notify pipeline
//! - `messages`: bodies of the comments and annotations the gate posts

pub mod evaluator;
pub mod matcher;
pub mod messages;

use std::collections::HashSet;

pub use evaluator::{ApprovalEvaluator, GateSettings, find_approval};
pub use matcher::CommandMatcher;

/// A comment on the thread, in the order the host returned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: u64,
    pub body: String,
    pub author: String,
}

/// Logins permitted to issue the approval command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamMembership {
    members: HashSet<String>,
}

impl TeamMembership {
    pub fn contains(&self, login: &str) -> bool {
        self.members.contains(login)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for TeamMembership {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result of scanning a thread.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApprovalDecision {
    pub approved: bool,
    pub approver: Option<String>,
}

impl ApprovalDecision {
    pub fn approved_by(login: impl Into<String>) -> Self {
        Self {
            approved: true,
            approver: Some(login.into()),
        }
    }

    pub fn not_approved() -> Self {
        Self::default()
    }
}

/// What the gate tells the runner once it is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Approved { approver: String },
    /// No approval found; `enforced` is true when the run must fail.
    NotApproved { enforced: bool, message: String },
}

impl GateOutcome {
    pub fn is_approved(&self) -> bool {
        matches!(self, GateOutcome::Approved { .. })
    }

    /// Process exit status for this outcome.
    pub fn exit_code(&self) -> u8 {
        match self {
            GateOutcome::NotApproved { enforced: true, .. } => 1,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_deduplicates_logins() {
        let team: TeamMembership = ["octocat", "hubot", "octocat"].into_iter().collect();
        assert_eq!(team.len(), 2);
        assert!(team.contains("octocat"));
        assert!(!team.contains("monalisa"));
    }

    #[test]
    fn membership_lookup_is_case_sensitive() {
        let team: TeamMembership = ["octocat"].into_iter().collect();
        assert!(!team.contains("Octocat"));
    }

    #[test]
    fn empty_membership() {
        let team = TeamMembership::default();
        assert!(team.is_empty());
        assert!(!team.contains(""));
    }

    #[test]
    fn decision_constructors() {
        let d = ApprovalDecision::approved_by("octocat");
        assert!(d.approved);
        assert_eq!(d.approver.as_deref(), Some("octocat"));

        let d = ApprovalDecision::not_approved();
        assert!(!d.approved);
        assert!(d.approver.is_none());
    }

    #[test]
    fn exit_codes() {
        let approved = GateOutcome::Approved {
            approver: "octocat".into(),
        };
        assert!(approved.is_approved());
        assert_eq!(approved.exit_code(), 0);

        let warned = GateOutcome::NotApproved {
            enforced: false,
            message: "m".into(),
        };
        assert!(!warned.is_approved());
        assert_eq!(warned.exit_code(), 0);

        let failed = GateOutcome::NotApproved {
            enforced: true,
            message: "m".into(),
        };
        assert_eq!(failed.exit_code(), 1);
    }
}
