// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::LaunchMode;

/// Command-line arguments for `confexec`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "confexec",
    version,
    about = "Render a config template from whitelisted env vars, then exec the server in the foreground.",
    long_about = None
)]
pub struct CliArgs {
    /// Optional TOML file with `[render]` and `[launch]` sections.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding `nginx.conf.template` and receiving `nginx.conf`.
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Template path. Overrides the one derived from `--config-dir`.
    #[arg(long, value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// Output path. Overrides the one derived from `--config-dir`.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Variable eligible for substitution. Repeat to list several; replaces
    /// the configured whitelist entirely.
    #[arg(long = "var", value_name = "NAME")]
    pub vars: Vec<String>,

    /// How to hand control to the program.
    #[arg(long, value_enum, value_name = "MODE")]
    pub mode: Option<LaunchMode>,

    /// Render to stdout; write no file and launch nothing.
    #[arg(long, conflicts_with = "render_only")]
    pub dry_run: bool,

    /// Render the output file but do not launch the program.
    #[arg(long)]
    pub render_only: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CONFEXEC_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Program and arguments to launch, after `--`.
    #[arg(last = true, value_name = "PROGRAM")]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
