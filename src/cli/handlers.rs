//! Command handlers driving one cycle per invocation
//!
//! Handlers are the orchestration collaborator: they load the resolved
//! inputs, resolve the run context, run exactly one cycle, and map failures
//! to exit codes. The manifest core itself consumes no CLI flags.

use super::commands::{BuildArgs, DevArgs};
use crate::context::RunContext;
use crate::markup::inject_head;
use crate::pipeline::{run_build_cycle, run_dev_cycle, BundleRecord, CycleReport};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{error, warn};

/// Handles `libwright build`.
pub async fn handle_build(args: &BuildArgs, quiet: bool) -> i32 {
    match build(args).await {
        Ok(report) => {
            report_cycle(&report, quiet);
            0
        }
        Err(error) => {
            error!("build cycle failed: {error:#}");
            1
        }
    }
}

/// Handles `libwright dev`.
pub async fn handle_dev(args: &DevArgs, quiet: bool) -> i32 {
    match dev(args).await {
        Ok(report) => {
            report_cycle(&report, quiet);
            0
        }
        Err(error) => {
            error!("dev cycle failed: {error:#}");
            1
        }
    }
}

async fn build(args: &BuildArgs) -> Result<CycleReport> {
    let raw = tokio::fs::read_to_string(&args.bundle)
        .await
        .with_context(|| format!("failed to read bundle records {}", args.bundle.display()))?;
    let records: Vec<BundleRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse bundle records {}", args.bundle.display()))?;

    let mut ctx =
        RunContext::resolve(project_dir(args.project_dir.as_deref()), false, args.versioning)
            .await?;
    ctx.out_dir = args.out_dir.clone();

    run_build_cycle(&ctx, &records).await
}

async fn dev(args: &DevArgs) -> Result<CycleReport> {
    let mut ctx =
        RunContext::resolve(project_dir(args.project_dir.as_deref()), true, args.versioning)
            .await?;
    ctx.origin = args.origin.clone();

    let report = run_dev_cycle(&ctx, &args.inputs).await?;

    if let Some(page) = &args.html {
        apply_head_markup(page, report.head_markup.as_deref()).await;
    }

    Ok(report)
}

/// Splices rendered header markup into the page, best-effort.
async fn apply_head_markup(page: &Path, markup: Option<&str>) {
    let Some(markup) = markup else {
        return;
    };
    match tokio::fs::read_to_string(page).await {
        Ok(html) => {
            if let Err(error) = tokio::fs::write(page, inject_head(&html, markup)).await {
                warn!(page = %page.display(), %error, "failed to write header markup");
            }
        }
        Err(error) => warn!(page = %page.display(), %error, "failed to read page for header markup"),
    }
}

fn project_dir(arg: Option<&Path>) -> PathBuf {
    arg.map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn report_cycle(report: &CycleReport, quiet: bool) {
    if !quiet {
        println!(
            "{} ({} units)",
            report.manifest_path.display(),
            report.units
        );
    }
}
