// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `launchseq`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "launchseq",
    version,
    about = "Launch a program through a composed launch sequence and report its exit code.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to a defaults file (TOML).
    ///
    /// Default: `Launchseq.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `LAUNCHSEQ_LOG`, the config file, or `info` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Working directory for the program.
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Set an environment variable for the program (repeatable).
    #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub env: Vec<(String, String)>,

    /// Report launch failures instead of failing the invocation.
    #[arg(long)]
    pub recover: bool,

    /// Print the pid and return without waiting for the program.
    #[arg(long)]
    pub no_wait: bool,

    /// Print the composed launch sequence without running anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Program to run.
    #[arg(value_name = "PROGRAM", required = true)]
    pub program: PathBuf,

    /// Arguments passed to the program.
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
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

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("invalid KEY=VALUE: {s}")),
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
