//! CLI definition

mod check;
mod context;
mod run;
mod style;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use release_drafter::config::DEFAULT_CONFIG_PATH;
use std::path::PathBuf;

/// Keep a draft GitHub release up to date with merged pull requests
#[derive(Debug, Parser)]
#[command(name = "release-drafter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Handle a push event: create or update the branch's draft release
    Run(RunArgs),

    /// Validate a config file and print the resolved settings
    ///
    /// Configs are TOML. A `release-drafter.yml` converts directly: the keys
    /// keep their names, lists become arrays and `categories` and `replacers`
    /// become `[[categories]]` and `[[replacers]]` tables.
    CheckConfig(CheckConfigArgs),
}

/// Arguments for the run command
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Push event payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: PathBuf,

    /// Ref that overrides the payload ref
    #[arg(long = "ref", env = "GITHUB_REF")]
    pub git_ref: Option<String>,

    /// GitHub token (falls back to GITHUB_TOKEN, GH_TOKEN, then `gh auth token`)
    #[arg(long)]
    pub token: Option<String>,

    /// API base URL for GitHub Enterprise
    #[arg(long, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// Config path inside the repository
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Read the config from this local file instead of the repository
    #[arg(long)]
    pub local_config: Option<PathBuf>,

    /// Show the planned release without writing it
    #[arg(short, long)]
    pub dry_run: bool,
}

/// Arguments for the check-config command
#[derive(Debug, Args)]
pub struct CheckConfigArgs {
    /// Config file to validate
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    pub path: PathBuf,
}

impl Cli {
    /// Runs the CLI command
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Run(args) => run::run_drafter(args).await,
            Commands::CheckConfig(args) => check::run_check_config(&args.path),
        }
    }
}
