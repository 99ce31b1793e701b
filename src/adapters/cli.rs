// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line front end for the configuration service.
//!
//! This module maps `usercfg` command-line arguments onto [`ConfigRequest`]s, so
//! the binary goes through the same dispatch path as any other transport.

use crate::domain::messages::ConfigRequest;
use crate::domain::ConfigValue;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments of the `usercfg` binary.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use usercfg::adapters::Cli;
/// use usercfg::domain::messages::ConfigRequest;
///
/// let cli = Cli::try_parse_from(["usercfg", "get-string", "defaults.template"]).unwrap();
/// assert_eq!(
///     cli.command.into_request(),
///     ConfigRequest::GetString { path: "defaults.template".to_string() }
/// );
/// ```
#[derive(Debug, Parser)]
#[command(name = "usercfg", version, about = "Read and edit the per-user configuration tree")]
pub struct Cli {
    /// Configuration file to operate on (defaults to the OS configuration directory)
    #[arg(short, long, global = true, env = "USERCFG_FILE", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Operation to perform
    #[command(subcommand)]
    pub command: ConfigCommand,
}

impl Cli {
    /// Returns the default log filter directive for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// The access operations, one subcommand each.
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum ConfigCommand {
    /// Print the value at a path
    Get {
        /// Dot-separated path; omit for the whole tree
        #[arg(default_value = "")]
        path: String,
    },
    /// Print the value at a path as a string
    GetString {
        /// Dot-separated path
        #[arg(default_value = "")]
        path: String,
    },
    /// Print the entries of the section at a path
    GetSection {
        /// Dot-separated path; omit for the root section
        #[arg(default_value = "")]
        path: String,
    },
    /// Assign a value at a path
    Set {
        /// Dot-separated path
        path: String,
        /// Value as JSON (`42`, `true`, `{"a": 1}`); anything else is stored as a string
        value: String,
    },
    /// Remove the value at a path
    Unset {
        /// Dot-separated path
        path: String,
    },
}

impl ConfigCommand {
    /// Converts the subcommand into a service request.
    pub fn into_request(self) -> ConfigRequest {
        match self {
            ConfigCommand::Get { path } => ConfigRequest::Get { path },
            ConfigCommand::GetString { path } => ConfigRequest::GetString { path },
            ConfigCommand::GetSection { path } => ConfigRequest::GetSection { path },
            ConfigCommand::Set { path, value } => ConfigRequest::Set {
                path,
                value: parse_value(&value),
            },
            ConfigCommand::Unset { path } => ConfigRequest::Unset { path },
        }
    }
}

/// Interprets a command-line value as JSON, falling back to a plain string.
///
/// # Examples
///
/// ```rust
/// use usercfg::adapters::cli::parse_value;
/// use usercfg::domain::ConfigValue;
///
/// assert_eq!(parse_value("8080"), ConfigValue::from(8080));
/// assert_eq!(parse_value("starter"), ConfigValue::from("starter"));
/// assert_eq!(parse_value("\"8080\""), ConfigValue::from("8080"));
/// ```
pub fn parse_value(raw: &str) -> ConfigValue {
    serde_json::from_str(raw).unwrap_or_else(|_| ConfigValue::from(raw))
}
