// Allow common clippy pedantic lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! Vanta CLI
//!
//! Query Vanta tables from the command line or serve them over HTTP

use anyhow::Context;
use clap::Parser;
use vanta_connector::cli::{Cli, Commands, Runner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout carries rows, so logs go to stderr
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let command = command_name(&cli.command);
    Runner::new(cli)
        .run()
        .await
        .with_context(|| format!("vanta {command} failed"))
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Tables => "tables",
        Commands::Inspect { .. } => "inspect",
        Commands::Select { .. } => "select",
        Commands::Query { .. } => "query",
        Commands::Check => "check",
        Commands::Serve { .. } => "serve",
    }
}
