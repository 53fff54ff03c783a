// src/lib.rs

pub mod aws;
pub mod backup;
pub mod cli;
pub mod config;
pub mod errors;
pub mod filter;
pub mod logging;
pub mod report;
pub mod types;

use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use crate::aws::{discover_clusters, AwsContext, RdsSnapshotClient};
use crate::backup::{select_eligible, BackupScheduler, Resource, SchedulerOptions};
use crate::cli::{BackupArgs, CliArgs, Command};
use crate::config::{load_and_validate, BackupSettings, ConfigFile, ProtectedResource};
use crate::errors::SnapctlError;
use crate::report::{BackupSummary, ConfigHeader, Plan, ValidatedEntry};
use crate::types::ResourceKind;

/// High-level entry point used by `main.rs`.
pub async fn run(args: CliArgs) -> Result<()> {
    match args.command {
        Command::Backup(backup) => run_backup(backup).await,
        Command::Plan(plan) => run_plan(&plan.config).await,
        Command::Validate(validate) => run_validate(&validate.config),
    }
}

/// Merge `[backup]` settings with CLI overrides; flags win.
pub fn scheduler_options(
    settings: &BackupSettings,
    args: &BackupArgs,
) -> errors::Result<SchedulerOptions> {
    let max_poll_failures = args.max_poll_failures.or(settings.max_poll_failures);
    if max_poll_failures == Some(0) {
        return Err(SnapctlError::ConfigError(
            "max poll failures must be >= 1 when set (got 0)".to_string(),
        ));
    }

    Ok(SchedulerOptions::new(args.parallel.unwrap_or(settings.parallel))?
        .with_poll_interval(args.poll_interval.unwrap_or(settings.poll_interval))
        .with_max_poll_failures(max_poll_failures))
}

fn run_validate(path: &Path) -> Result<()> {
    let cfg = load_and_validate(path)?;

    print!("{}", ConfigHeader(&cfg));
    println!("resources ({}):", cfg.resources.len());
    for entry in &cfg.resources {
        print!("{}", ValidatedEntry(entry));
    }
    println!("config is valid");
    Ok(())
}

async fn run_plan(path: &Path) -> Result<()> {
    let cfg = load_and_validate(path)?;
    let aws = AwsContext::from_config(&cfg).await;
    let discovered = discover_all(&aws, &cfg).await?;

    print!("{}", ConfigHeader(&cfg));
    println!();
    for (entry, resources) in discovered.iter() {
        let plan = Plan {
            entry: *entry,
            resources: resources.as_slice(),
        };
        println!("{plan}");
    }
    println!(
        "plan is valid; run `snapctl backup -c {}` to apply",
        path.display()
    );
    Ok(())
}

async fn run_backup(args: BackupArgs) -> Result<()> {
    let cfg = load_and_validate(&args.config.config)?;
    let options = scheduler_options(&cfg.backup, &args)?;

    let aws = AwsContext::from_config(&cfg).await;

    // Discover everything before the first snapshot so that any fatal error
    // surfaces while nothing has been started yet.
    let discovered = discover_all(&aws, &cfg).await?;

    let client = RdsSnapshotClient::from_context(&aws, cfg.backup.snapshot_prefix.clone());
    let scheduler = BackupScheduler::new(client, options);

    let mut failed = 0usize;
    for (entry, resources) in discovered {
        let found = resources.len();
        let eligible = select_eligible(resources);
        info!(
            entry = %entry.name,
            found,
            eligible = eligible.len(),
            "processing protected resources"
        );

        if eligible.is_empty() {
            warn!(entry = %entry.name, "no eligible clusters to back up");
            continue;
        }

        let results = scheduler.run(eligible).await?;
        let summary = BackupSummary {
            entry: &entry.name,
            results: &results,
        };
        failed += summary.failed();
        print!("{summary}");
    }

    if failed > 0 {
        anyhow::bail!("{failed} snapshot(s) failed");
    }
    Ok(())
}

async fn discover_all<'a>(
    aws: &AwsContext,
    cfg: &'a ConfigFile,
) -> errors::Result<Vec<(&'a ProtectedResource, Vec<Resource>)>> {
    let rds = aws.rds_client();
    let mut discovered = Vec::with_capacity(cfg.resources.len());

    for entry in &cfg.resources {
        info!(
            entry = %entry.name,
            region = aws.region(),
            filter = %entry.filter_source,
            "discovering resources"
        );
        let resources = match entry.kind {
            ResourceKind::Rds => discover_clusters(&rds, &entry.filter).await?,
        };
        discovered.push((entry, resources));
    }

    Ok(discovered)
}
