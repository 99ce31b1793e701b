// SPDX-License-Identifier: MIT OR Apache-2.0

//! `usercfg`: read and edit the per-user configuration tree from a terminal.

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use usercfg::adapters::Cli;
use usercfg::prelude::*;

const APP_NAME: &str = "usercfg";
const QUALIFIER: &str = "org";

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("usercfg={}", cli.log_level())));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("usercfg: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String> {
    let builder = DefaultUserConfigService::builder();
    let builder = match &cli.file {
        Some(path) => builder.with_file(path)?,
        None => builder.with_default_location(APP_NAME, QUALIFIER)?,
    };
    let service = builder.build()?;

    let request = cli.command.into_request();
    tracing::debug!("Dispatching {} for '{}'", request.method(), request.path());
    let response = service.handle(request)?;

    serde_json::to_string_pretty(&response).map_err(|e| ConfigError::ParseError {
        message: format!("Failed to render response: {}", e),
        source: Some(Box::new(e)),
    })
}
