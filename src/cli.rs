use crate::config::ConnectionParameters;
use crate::db::admin::AdminConnector;
use crate::error::ProvisionError;
use crate::service::{ProvisionPlan, ProvisionReport, Provisioner};
use clap::Parser;
use std::io::{BufRead, Write};
use tracing::{info, warn};

/// Exit status when the operator declines the confirmation prompt.
pub const EXIT_ABORTED: u8 = 1;

/// DESTRUCTIVE: drops the configured database schema and recreates it empty.
///
/// Connection settings come from DB_HOST, DB_PORT, DB_USER, DB_PASSWORD,
/// DB_NAME, DB_CHARSET and DB_COLLATION (a `.env` file is honoured).
/// Setting DB_CHARSET to anything other than utf8mb4 without DB_COLLATION
/// uses the server's default collation for that charset.
/// Exit status 0 means the schema exists and is empty; anything else means
/// its state is unknown and migrations must not run.
#[derive(Debug, Parser)]
#[clap(author, version, about, long_about)]
pub struct Cli {
    /// Print the statements that would run and exit without connecting
    #[clap(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt on interactive terminals
    #[clap(short, long)]
    pub yes: bool,

    /// Print the result as a single JSON line on success
    #[clap(long)]
    pub json: bool,
}

#[derive(Debug)]
pub enum Outcome {
    DryRun,
    Aborted,
    Provisioned(ProvisionReport),
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Aborted => EXIT_ABORTED,
            Outcome::DryRun | Outcome::Provisioned(_) => 0,
        }
    }
}

/// Apply the command-line flags to one provisioning attempt.
///
/// `interactive` says whether `answers` is an operator's terminal; only then
/// is confirmation requested (unless `--yes`). Statements, the prompt and
/// JSON go to the given writers so callers decide where they land.
pub async fn run_cli<C, R, O, E>(
    cli: &Cli,
    interactive: bool,
    params: &ConnectionParameters,
    connector: C,
    answers: R,
    stdout: &mut O,
    stderr: &mut E,
) -> Result<Outcome, ProvisionError>
where
    C: AdminConnector,
    R: BufRead,
    O: Write,
    E: Write,
{
    let plan = ProvisionPlan::from_params(params)?;

    if cli.dry_run {
        for stmt in plan.statements() {
            if let Err(e) = writeln!(stdout, "{stmt};") {
                warn!(error = %e, "failed to write planned statement");
            }
        }
        return Ok(Outcome::DryRun);
    }

    if interactive && !cli.yes && !confirm(params, answers, stderr) {
        warn!("aborted by operator; nothing was changed");
        return Ok(Outcome::Aborted);
    }

    let report = Provisioner::new(connector).run(params).await?;

    if cli.json {
        match serde_json::to_string(&report) {
            Ok(json) => {
                if let Err(e) = writeln!(stdout, "{json}") {
                    warn!(error = %e, "failed to write report");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize report"),
        }
    }
    info!(
        schema = %report.schema,
        elapsed_ms = report.elapsed_ms,
        "database reset complete; ready for migrations"
    );
    Ok(Outcome::Provisioned(report))
}

fn confirm(params: &ConnectionParameters, mut answers: impl BufRead, prompt: &mut impl Write) -> bool {
    let _ = write!(
        prompt,
        "This will permanently delete ALL data in schema `{}` on {}:{}.\nAre you sure? [y/N] ",
        params.name, params.host, params.port
    );
    let _ = prompt.flush();

    let mut input = String::new();
    if answers.read_line(&mut input).is_err() {
        return false;
    }
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}
