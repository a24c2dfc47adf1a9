//! secmatch CLI tool.
//!
//! Usage:
//! ```bash
//! secmatch check [OPTIONS] [PATH]
//! secmatch list-rules
//! secmatch init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use secmatch_core::Severity;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;
mod sonar;

/// Security pattern detector for resolved Go compilation units
#[derive(Parser)]
#[command(name = "secmatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan unit files for security issues
    Check {
        /// Directory containing *.unit.json files (default: `analyzer.root`, else current directory)
        path: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules (comma-separated codes or names)
        #[arg(long)]
        rules: Option<String>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Lowest severity that makes the command fail
        #[arg(long)]
        fail_on: Option<Severity>,

        /// Ignore #nosec comments
        #[arg(long)]
        no_nosec: bool,

        /// Root paths that Sonar file paths are made relative to
        #[arg(long = "root-path")]
        root_paths: Vec<PathBuf>,
    },

    /// List available rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for scan reports.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-issue compact format.
    Compact,
    /// SonarQube external issues format.
    Sonar,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            format,
            rules,
            exclude,
            fail_on,
            no_nosec,
            root_paths,
        } => {
            let options = commands::check::CheckOptions {
                path,
                format,
                rules,
                exclude,
                fail_on,
                no_nosec,
                root_paths,
            };
            let failed = commands::check::run(options, cli.config.as_deref())?;
            Ok(if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Init { force } => {
            commands::init::run(force)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
