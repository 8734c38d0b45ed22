//! GitHub Actions runner protocol: step outputs and workflow commands.
//!
//! Outputs go to the file named by `GITHUB_OUTPUT` when the runner provides
//! one; otherwise they fall back to the legacy `::set-output` command on the
//! command stream. Annotations (`::notice::`, `::error::`) always go to the
//! command stream, which is stdout in production.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use tracing::warn;

use crate::errors::GateError;

/// Escape a message for a workflow command (`%`, `\r`, `\n`).
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escape a workflow command property value.
pub fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

/// Writes outputs and annotations for the runner.
pub struct Workflow<W: Write> {
    commands: W,
    output_file: Option<PathBuf>,
}

impl<W: Write> Workflow<W> {
    pub fn new(commands: W, output_file: Option<PathBuf>) -> Self {
        Self {
            commands,
            output_file,
        }
    }

    /// Set a step output.
    pub fn set_output(&mut self, name: &str, value: &str) -> Result<(), GateError> {
        let Some(path) = self.output_file.clone() else {
            warn!("GITHUB_OUTPUT is not set; falling back to ::set-output");
            return self.command(
                &format!("set-output name={}", escape_property(name)),
                value,
            );
        };

        let entry = if value.contains('\n') || value.contains('\r') {
            let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
            format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
        } else {
            format!("{name}={value}\n")
        };

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .and_then(|mut f| f.write_all(entry.as_bytes()))
            .map_err(|source| GateError::Output { path, source })
    }

    /// Soft annotation; the step still succeeds.
    pub fn notice(&mut self, message: &str) -> Result<(), GateError> {
        self.command("notice", message)
    }

    /// Error annotation; the caller is responsible for the non-zero exit.
    pub fn error(&mut self, message: &str) -> Result<(), GateError> {
        self.command("error", message)
    }

    fn command(&mut self, command: &str, message: &str) -> Result<(), GateError> {
        writeln!(self.commands, "::{}::{}", command, escape_data(message))
            .and_then(|_| self.commands.flush())
            .map_err(GateError::Stdout)
    }

    pub fn into_inner(self) -> W {
        self.commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn captured(workflow: Workflow<Vec<u8>>) -> String {
        String::from_utf8(workflow.into_inner()).unwrap()
    }

    #[test]
    fn test_escape_data() {
        assert_eq!(escape_data("50% done\r\nnext"), "50%25 done%0D%0Anext");
        assert_eq!(escape_data("plain"), "plain");
    }

    #[test]
    fn test_escape_property() {
        assert_eq!(escape_property("a:b,c"), "a%3Ab%2Cc");
    }

    #[test]
    fn test_notice_and_error_commands() {
        let mut wf = Workflow::new(Vec::new(), None);
        wf.notice("There is no /approve command").unwrap();
        wf.error("line one\nline two").unwrap();
        assert_eq!(
            captured(wf),
            "::notice::There is no /approve command\n::error::line one%0Aline two\n"
        );
    }

    #[test]
    fn test_output_appends_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output");
        std::fs::write(&path, "previous=1\n").unwrap();

        let mut wf = Workflow::new(Vec::new(), Some(path.clone()));
        wf.set_output("approved", "true").unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "previous=1\napproved=true\n"
        );
        assert!(captured(wf).is_empty());
    }

    #[test]
    fn test_output_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fresh");

        let mut wf = Workflow::new(Vec::new(), Some(path.clone()));
        wf.set_output("approved", "false").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "approved=false\n");
    }

    #[test]
    fn test_multiline_output_uses_delimiter() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output");

        let mut wf = Workflow::new(Vec::new(), Some(path.clone()));
        wf.set_output("summary", "a\nb").unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("summary<<ghadelimiter_"));
        assert_eq!(lines[1], "a");
        assert_eq!(lines[2], "b");
        assert_eq!(lines[3], lines[0].trim_start_matches("summary<<"));
    }

    #[test]
    fn test_output_without_file_uses_set_output_command() {
        let mut wf = Workflow::new(Vec::new(), None);
        wf.set_output("approved", "true").unwrap();
        assert_eq!(captured(wf), "::set-output name=approved::true\n");
    }

    #[test]
    fn test_unwritable_output_file() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be opened for appending.
        let mut wf = Workflow::new(Vec::new(), Some(dir.path().to_path_buf()));
        let err = wf.set_output("approved", "true").unwrap_err();
        assert!(matches!(err, GateError::Output { .. }));
    }
}
