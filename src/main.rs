use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;

use approval_gate::config::{Config, ContextArgs, InputArgs};
use approval_gate::errors::GateError;
use approval_gate::logging::{self, LogFormat};
use approval_gate::workflow::Workflow;

mod cmd;

#[derive(Parser)]
#[command(name = "approval-gate")]
#[command(
    version,
    about = "Gate a workflow run on an approval comment from a team member"
)]
pub struct Cli {
    #[arg(short, long)]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(flatten)]
    pub inputs: InputArgs,

    #[command(flatten)]
    pub context: ContextArgs,
}

/// Report a fatal error the way the runner expects: an `::error::` annotation
/// and a non-zero exit.
fn fail(err: anyhow::Error) -> ExitCode {
    let message = err.to_string().trim_end().to_string();
    let status = err.downcast_ref::<GateError>().and_then(GateError::status);
    tracing::error!(?status, "{}", message);
    let mut workflow = Workflow::new(std::io::stdout(), None);
    if let Err(e) = workflow.error(&message) {
        eprintln!("{}", e);
    }
    ExitCode::FAILURE
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            // Usage details for humans on stderr; the runner gets the annotation.
            let _ = e.print();
            return fail(e.into());
        }
    };

    if let Err(e) = logging::init(cli.verbose, cli.log_format) {
        eprintln!("{:#}", e);
    }

    let config = match Config::from_args(cli.inputs, cli.context) {
        Ok(config) => config,
        Err(e) => return fail(e.into()),
    };

    match cmd::cmd_check(config).await {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => fail(e),
    }
}
