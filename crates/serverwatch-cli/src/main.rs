//! serverwatch CLI binary entrypoint.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use serverwatch_cli::cli::{Cli, Commands};
use serverwatch_cli::commands::ServerCommand;
use serverwatch_cli::notify::StderrNotifier;
use serverwatch_cli::output::OutputFormat;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), serverwatch_cli::CliError> {
    let format = OutputFormat::new(cli.format);
    let notifier = StderrNotifier::new(format.is_json());
    let cmd = ServerCommand::connect(&cli.gateway_config(), notifier)?;
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::List { status } => {
            cmd.list(&mut stdout, &format, status.into()).await?;
        }
        Commands::Ping { ip_address } => {
            cmd.ping(&mut stdout, &format, &ip_address).await?;
        }
        Commands::Add(args) => {
            cmd.add(&mut stdout, &format, args.into()).await?;
        }
        Commands::Delete { id, force } => {
            cmd.delete(&mut stdout, &format, id, force).await?;
        }
        Commands::Report { output } => {
            cmd.report(&mut stdout, &format, &output).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn run_list_command_no_backend() {
        let cli = Cli::parse_from(["serverwatch", "-a", "http://127.0.0.1:1", "list"]);
        let result = run(cli).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn run_with_invalid_url_fails() {
        let cli = Cli::parse_from(["serverwatch", "-a", "ws://localhost:8080", "list"]);
        let result = run(cli).await;
        assert!(matches!(result, Err(serverwatch_cli::CliError::Config(_))));
    }
}
