use std::process::ExitCode;

use clap::Parser;
use config::{Cli, Command};
use tracing::error;

mod config;
mod controller;
mod usecase;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    //logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let outcome = match cli.command {
        Command::Run(args) => controller::run(args).await,
        Command::Parse(args) => controller::parse(args).await,
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
