//! The gate itself: `approval-gate` with no subcommand.

use anyhow::Result;
use tracing::debug;

use approval_gate::config::Config;
use approval_gate::gates::{ApprovalEvaluator, GateOutcome};
use approval_gate::github::GitHubClient;
use approval_gate::ui;
use approval_gate::workflow::Workflow;

pub async fn cmd_check(config: Config) -> Result<GateOutcome> {
    debug!(?config, "resolved configuration");

    let client = GitHubClient::new(&config.api_url, &config.token)?;
    let mut workflow = Workflow::new(std::io::stdout(), config.output_file.clone());

    let outcome = ApprovalEvaluator::new(&client, &config.settings, &config.context)
        .run(&mut workflow)
        .await?;

    debug!(
        approved = outcome.is_approved(),
        exit_code = outcome.exit_code(),
        "gate finished"
    );
    ui::print_summary(&outcome);
    Ok(outcome)
}
