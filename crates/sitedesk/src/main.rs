mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sitedesk_core::Hub;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = sitedesk_config::load_config(cli.global.config.as_deref())?;
    let gateway = config.gateway_config()?;
    let email = cli.global.email.clone().or(config.email);

    let hub = Hub::connect(&gateway)?;
    tracing::debug!(command = ?cli.command, "dispatching command");
    let result = commands::dispatch(cli.command, &hub, &cli.global, email.as_deref()).await;
    hub.shutdown().await;
    result
}
