//! Build and dev cycle orchestration
//!
//! One cycle runs the per-run state machine: scanning per file, building the
//! aggregate manifest, then emission. Scans settle in parallel; building
//! starts strictly after the last scan has settled. The dependency map and
//! the accumulated manifest are cycle-scoped values threaded through the
//! pipeline, so a new cycle never sees a previous cycle's state. A failed
//! step aborts the cycle before anything is persisted.

use crate::context::RunContext;
use crate::emit::emit;
use crate::library::builder::build_libraries;
use crate::library::{AssetSource, JsAsset, JsAttributes, Library};
use crate::markup::head_markup;
use crate::scanner::{scan, scan_inputs, DependencyMap};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};

/// Name of the synthesized unit loading the dev server's client.
pub const DEV_CLIENT_UNIT: &str = "vite";

/// Endpoint of the dev server's live-reload client, relative to the origin.
pub const DEV_CLIENT_ENDPOINT: &str = "@vite/client";

/// One emitted file reported by the bundling pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleRecord {
    pub file_name: String,
    /// Source text, present for script-like records
    #[serde(default)]
    pub code: Option<String>,
    /// Dynamically-loaded, non-entry fragment
    #[serde(default)]
    pub is_dynamic_entry: bool,
}

/// Outcome of one completed cycle.
#[derive(Debug)]
pub struct CycleReport {
    pub manifest_path: PathBuf,
    pub units: usize,
    /// Supplementary header markup, rendered best-effort for dev cycles
    pub head_markup: Option<String>,
}

/// Runs one production build cycle over the emitted bundle records.
pub async fn run_build_cycle(ctx: &RunContext, records: &[BundleRecord]) -> Result<CycleReport> {
    let mut deps = DependencyMap::new();

    let records: Vec<&BundleRecord> = records
        .iter()
        .filter(|record| is_manifest_record(record))
        .collect();
    info!(records = records.len(), "build cycle scanning emitted bundle");

    for record in &records {
        if let Some(code) = &record.code {
            scan(&record.file_name, code, &mut deps);
        }
    }

    let files: Vec<String> = records
        .iter()
        .map(|record| record.file_name.clone())
        .collect();
    let libraries = build_libraries(&files, ctx, &deps);

    let manifest_path = ctx.manifest_path();
    emit(&manifest_path, &libraries)
        .await
        .context("build cycle failed to emit the manifest")?;

    Ok(CycleReport {
        manifest_path,
        units: libraries.len(),
        head_markup: None,
    })
}

/// Runs one dev cycle over the configured input files.
pub async fn run_dev_cycle(ctx: &RunContext, inputs: &[String]) -> Result<CycleReport> {
    let mut deps = DependencyMap::new();
    info!(inputs = inputs.len(), "dev cycle scanning inputs");
    scan_inputs(inputs, &mut deps).await;

    let mut libraries = build_libraries(inputs, ctx, &deps);
    libraries.insert(DEV_CLIENT_UNIT.to_string(), dev_client_unit(ctx));
    debug!(units = libraries.len(), "dev cycle built manifest");

    let manifest_path = ctx.manifest_path();
    emit(&manifest_path, &libraries)
        .await
        .context("dev cycle failed to emit the manifest")?;

    let markup = head_markup(ctx, &deps).await;
    Ok(CycleReport {
        manifest_path,
        units: libraries.len(),
        head_markup: markup,
    })
}

/// Synthesized unit loading the dev server's client at page-header time.
fn dev_client_unit(ctx: &RunContext) -> Library {
    let mut js = BTreeMap::new();
    js.insert(
        format!("{}/{}", ctx.origin, DEV_CLIENT_ENDPOINT),
        JsAsset {
            source: Some(AssetSource::External),
            attributes: Some(JsAttributes {
                module_type: Some("module".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        },
    );
    Library {
        header: Some(true),
        js,
        ..Default::default()
    }
}

/// Emitted records eligible for manifest generation: assets always, chunks
/// unless dynamically loaded, empty, or internal.
fn is_manifest_record(record: &BundleRecord) -> bool {
    match &record.code {
        None => true,
        Some(code) => {
            code != "\n" && !record.is_dynamic_entry && !record.file_name.starts_with("asset")
        }
    }
}
