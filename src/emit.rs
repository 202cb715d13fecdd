//! Manifest document emission
//!
//! The emitter splices the freshly serialized manifest against any existing
//! document of the same name: hand-authored content preceding the
//! generated-section marker is preserved verbatim, everything from the marker
//! onward is replaced. Re-emitting an unchanged manifest reproduces the
//! document byte for byte.

use crate::library::Libraries;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

/// Sentinel line separating preserved hand-authored content from the
/// generated section.
pub const GENERATED_MARKER: &str = "# libwright generated";

/// Writes the manifest document, preserving any hand-authored prefix.
pub async fn emit(path: &Path, libraries: &Libraries) -> Result<()> {
    let prefix = read_hand_prefix(path).await;
    let generated =
        serde_yaml::to_string(libraries).context("failed to serialize the library manifest")?;

    let mut document = String::new();
    if !prefix.is_empty() {
        document.push_str(&prefix);
        document.push('\n');
    }
    document.push_str(GENERATED_MARKER);
    document.push('\n');
    document.push_str(&generated);

    tokio::fs::write(path, &document)
        .await
        .with_context(|| format!("failed to write manifest {}", path.display()))?;

    info!(path = %path.display(), units = libraries.len(), "manifest written");
    Ok(())
}

/// Reads the hand-authored content preceding the marker in an existing
/// document. A missing or unreadable document yields an empty prefix; a
/// document without a marker is preserved whole.
async fn read_hand_prefix(path: &Path) -> String {
    match tokio::fs::read_to_string(path).await {
        Ok(existing) => existing
            .split(GENERATED_MARKER)
            .next()
            .unwrap_or_default()
            .trim()
            .to_string(),
        Err(error) => {
            debug!(path = %path.display(), %error, "no existing manifest to preserve");
            String::new()
        }
    }
}
