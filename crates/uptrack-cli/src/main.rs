//! CLI entry point.
//!
//! Loads `.env`, parses arguments, bootstraps the engine and dispatches to
//! the command handler. Errors map to sysexits-style exit codes.

use clap::Parser;

use uptrack_cli::{Cli, CliError, Commands, SessionReport, bootstrap, handlers, init_logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match dispatch(cli.command).await {
        Ok(report) => {
            tracing::debug!(
                remaining = report.snapshot.len(),
                cancelled = report.cancelled.len(),
                dismissed = report.dismissed.len(),
                "Session finished"
            );
            Ok(())
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(err.exit_code());
        }
    }
}

async fn dispatch(command: Commands) -> Result<SessionReport, CliError> {
    match command {
        Commands::Upload {
            paths,
            accept,
            max_size_mb,
            simulation,
            view,
        } => {
            let mut ctx = bootstrap(simulation.to_config())?;
            handlers::upload::execute(&mut ctx, &paths, &accept, max_size_mb, &view).await
        }
        Commands::Simulate {
            count,
            simulation,
            view,
        } => {
            let mut ctx = bootstrap(simulation.to_config())?;
            handlers::simulate::execute(&mut ctx, count, &view).await
        }
    }
}
