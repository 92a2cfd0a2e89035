use clap::Parser;
use mimalloc::MiMalloc;
use rishta_provision::{Cli, Config, MySqlConnector, run_cli};
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let cfg = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}: {}", e.kind(), e);
            return ExitCode::from(e.exit_code());
        }
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_level(true)
                .with_target(false),
        )
        .init();

    let params = cfg.database;
    info!(
        host = %params.host,
        port = params.port,
        user = %params.user,
        schema = %params.name,
        charset = %params.charset,
        collation = ?params.collation
    );

    let stdin = std::io::stdin();
    let interactive = stdin.is_terminal();
    let outcome = run_cli(
        &cli,
        interactive,
        &params,
        MySqlConnector,
        stdin.lock(),
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    )
    .await;

    match outcome {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            error!(
                kind = e.kind(),
                error = %e,
                "provisioning failed; schema state unknown, do not run migrations"
            );
            ExitCode::from(e.exit_code())
        }
    }
}
