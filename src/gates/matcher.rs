use crate::errors::GateError;

/// Whitespace as comment authors produce it: Unicode `White_Space` minus
/// NEL (U+0085), plus the byte order mark (U+FEFF) that some clients prepend.
pub fn is_command_space(c: char) -> bool {
    (c.is_whitespace() && c != '\u{0085}') || c == '\u{feff}'
}

/// Remove every whitespace character (spaces, tabs, newlines, carriage
/// returns and the rest of the set accepted by `is_command_space`).
pub fn normalize(text: &str) -> String {
    text.chars().filter(|&c| !is_command_space(c)).collect()
}

/// Matches comment bodies against a configured approval phrase.
///
/// Both sides are normalized, then compared byte-for-byte: case-sensitive and
/// never a substring match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMatcher {
    phrase: String,
    normalized: String,
}

impl CommandMatcher {
    /// Fails when the phrase is blank, since a blank phrase would match every
    /// empty comment.
    pub fn new(phrase: impl Into<String>) -> Result<Self, GateError> {
        let phrase = phrase.into();
        let normalized = normalize(&phrase);
        if normalized.is_empty() {
            return Err(GateError::Config(
                "approve-command must contain at least one non-whitespace character".to_string(),
            ));
        }
        Ok(Self { phrase, normalized })
    }

    /// The phrase as configured.
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn matches(&self, body: &str) -> bool {
        // Cheap reject before allocating.
        if body.len() < self.normalized.len() {
            return false;
        }
        normalize(body) == self.normalized
    }
}
