//! Run command - draft the release for a push

use crate::cli::RunArgs;
use crate::cli::context::CommandContext;
use crate::cli::style::{CHECK, Stylize};
use anstream::println;
use anyhow::{Context, Result};
use release_drafter::config::load_local_config;
use release_drafter::pipeline::{Outcome, run, run_from_repository};
use release_drafter::release::ReleaseAction;

/// Run the drafter for the push described by `args`
pub async fn run_drafter(args: RunArgs) -> Result<()> {
    let ctx = CommandContext::new(
        &args.event_path,
        args.git_ref.as_deref(),
        args.token.as_deref(),
        args.api_url.clone(),
    )
    .await
    .context("preparing run")?;

    println!(
        "{} {} on {}",
        "Drafting release for".emphasis(),
        ctx.target.branch.accent(),
        ctx.event
            .repository
            .full_name
            .as_deref()
            .unwrap_or(&ctx.event.repository.name)
            .accent()
    );

    let outcome = match args.local_config {
        Some(ref path) => {
            let config = load_local_config(path)
                .with_context(|| format!("loading local config {}", path.display()))?;
            run(&ctx.host, config, &ctx.target, args.dry_run).await?
        }
        None => run_from_repository(&ctx.host, &ctx.target, &args.config, args.dry_run).await?,
    };

    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Skipped(reason) => {
            println!("{} {}", "Skipped:".warn(), reason.muted());
        }
        Outcome::Planned(action) => {
            println!("{} {action}", "Dry run, would".warn());
            if let ReleaseAction::Create(release) = action
                && !release.name.is_empty()
            {
                println!("  {} {}", "name:".muted(), release.name.accent());
            }
            println!();
            println!("{}", action.body());
        }
        Outcome::Created(release) => {
            println!(
                "{} {}",
                format!("{CHECK} Created draft release").success(),
                release.html_url.accent()
            );
        }
        Outcome::Updated(release) => {
            println!(
                "{} {}",
                format!("{CHECK} Updated draft release").success(),
                release.html_url.accent()
            );
        }
    }
}
