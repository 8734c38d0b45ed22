//! Comment and annotation bodies posted by the gate.

/// Reply posted when a member approved and success comments are enabled.
pub fn success_comment(actor: &str, text: &str) -> String {
    format!("Hey, @{}!\n{}", actor, text)
}

/// Reminder posted whenever no authorized approval was found.
///
/// The wording differs between the enforced (run fails) and soft (notice only)
/// modes, and both link back to the workflow run.
pub fn reminder_comment(
    actor: &str,
    owner: &str,
    team: &str,
    phrase: &str,
    enforced: bool,
    run_url: &str,
) -> String {
    let verb = if enforced { "comment" } else { "run" };
    let status_line = if enforced {
        format!(
            "_:no_entry_sign: :no_entry: Marking the [workflow run]({}) as failed_",
            run_url
        )
    } else {
        format!(
            "_:warning: :pause_button: See [workflow run]({}) for reference_",
            run_url
        )
    };

    format!(
        "Hey, @{actor}!\n\
         :cry: No one approved your run yet! Have someone from the @{owner}/{team} team {verb} `{phrase}` and then try your command again\n\
         \n\
         {status_line}"
    )
}

/// Annotation text used for both the notice and the failure.
pub fn missing_approval(phrase: &str, owner: &str, team: &str) -> String {
    format!(
        "There is no {} command in the comments from someone in the @{}/{} team",
        phrase, owner, team
    )
}
