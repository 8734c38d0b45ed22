//! Typed error hierarchy for the approval gate.
//!
//! `GateError` covers every failure the gate can surface: configuration and
//! run-context problems found before any network call, GitHub API faults, and
//! failures writing runner outputs.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while evaluating an approval gate.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("Team '{team}' doesn't exist or the token doesn't have access to it")]
    TeamNotFound { team: String },

    #[error("GitHub API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("GitHub request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to read event payload at {path}: {source}")]
    EventPayload {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to write runner output to {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write workflow command: {0}")]
    Stdout(#[source] std::io::Error),
}

impl GateError {
    /// HTTP status carried by an API error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            GateError::Api { status, .. } => Some(*status),
            GateError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_not_found_message_names_the_team() {
        let err = GateError::TeamNotFound {
            team: "release-approvers".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Team 'release-approvers' doesn't exist or the token doesn't have access to it"
        );
    }

    #[test]
    fn api_error_carries_status() {
        let err = GateError::Api {
            status: 502,
            message: "Bad Gateway".to_string(),
        };
        assert_eq!(err.status(), Some(502));
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("Bad Gateway"));
    }

    #[test]
    fn config_error_has_no_status() {
        let err = GateError::Config("missing GITHUB_REPOSITORY".into());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn output_error_carries_path() {
        let path = PathBuf::from("/runner/output");
        let err = GateError::Output {
            path: path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        match &err {
            GateError::Output { path: p, source } => {
                assert_eq!(p, &path);
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
            }
            _ => panic!("Expected Output"),
        }
    }

    #[test]
    fn gate_error_implements_std_error() {
        fn assert_std_error<E: std::error::Error + Send + Sync + 'static>(_: &E) {}
        assert_std_error(&GateError::TeamNotFound { team: "x".into() });
    }
}
