//! Check-config command - validate a config file locally

use crate::cli::style::{CHECK, Stylize};
use anstream::println;
use anyhow::{Context, Result, bail};
use release_drafter::config::load_local_config;
use std::path::Path;

/// Validate the config at `path` and summarize it
pub fn run_check_config(path: &Path) -> Result<()> {
    let Some(config) = load_local_config(path)
        .with_context(|| format!("checking {}", path.display()))?
    else {
        bail!("config file not found: {}", path.display());
    };

    println!(
        "{} {}",
        format!("{CHECK} Valid config:").success(),
        path.display().accent()
    );

    let branches = if config.branches.is_empty() {
        "default branch".to_string()
    } else {
        config.branches.join(", ")
    };
    println!("  {} {}", "branches:".muted(), branches);

    if config.categories.is_empty() {
        println!("  {} {}", "categories:".muted(), "none".muted());
    } else {
        println!("  {}", "categories:".muted());
        for category in &config.categories {
            println!(
                "    {} {}",
                category.title.emphasis(),
                format!("[{}]", category.labels.join(", ")).muted()
            );
        }
    }

    if !config.exclude_labels.is_empty() {
        println!(
            "  {} {}",
            "exclude-labels:".muted(),
            config.exclude_labels.join(", ")
        );
    }
    if !config.replacers.is_empty() {
        println!("  {} {}", "replacers:".muted(), config.replacers.len().accent());
    }

    Ok(())
}
