//! Human-readable run summary, printed to stderr after the gate decides.

pub mod icons;

use console::style;

use crate::gates::GateOutcome;
use icons::{CHECK, CROSS, WARNING};

/// One-line summary of an outcome, styled for the terminal.
pub fn summary_line(outcome: &GateOutcome) -> String {
    match outcome {
        GateOutcome::Approved { approver } => format!(
            "{}{} by {}",
            CHECK,
            style("Approved").green().bold(),
            style(approver).bold()
        ),
        GateOutcome::NotApproved {
            enforced: true,
            message,
        } => format!("{}{} {}", CROSS, style("Not approved:").red().bold(), message),
        GateOutcome::NotApproved {
            enforced: false,
            message,
        } => format!(
            "{}{} {}",
            WARNING,
            style("Not approved:").yellow().bold(),
            message
        ),
    }
}

pub fn print_summary(outcome: &GateOutcome) {
    eprintln!("{}", summary_line(outcome));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_names_approver() {
        let line = console::strip_ansi_codes(&summary_line(&GateOutcome::Approved {
            approver: "alice".into(),
        }))
        .to_string();
        assert!(line.contains("Approved by alice"));
    }

    #[test]
    fn test_summary_includes_message() {
        let line = console::strip_ansi_codes(&summary_line(&GateOutcome::NotApproved {
            enforced: true,
            message: "There is no /approve command".into(),
        }))
        .to_string();
        assert!(line.contains("Not approved: There is no /approve command"));
    }
}
