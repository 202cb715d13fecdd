//! Run context shared across one build or dev cycle
//!
//! The context carries everything the manifest core needs for a cycle: the
//! host module's identity, the run mode, the resolved output locations, and
//! the active versioning policy. It is resolved once per cycle by the
//! orchestration layer and threaded through the pipeline; the core itself
//! reads no environment variables.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Default dev-server origin.
pub const DEFAULT_ORIGIN: &str = "http://localhost:5173";

/// Default bundler output directory, relative to the project directory.
pub const DEFAULT_OUT_DIR: &str = "dist";

const INFO_FILE_SUFFIX: &str = ".info.yml";
const PACKAGE_METADATA_FILE: &str = "package.json";

/// Policy for stamping a unit's freshness marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Versioning {
    /// Literal `VERSION` placeholder resolved by the host runtime
    Drupal,
    /// Freshness carried by content hashes in filenames; no version field
    Hash,
    /// The host project's declared version string
    #[default]
    Module,
}

/// Errors from context resolution.
#[derive(Debug, Error)]
pub enum ContextError {
    /// No `*.info.yml` file to derive the module name from
    #[error("no *.info.yml file found in {}", dir.display())]
    MissingInfoFile { dir: PathBuf },

    /// The project directory could not be enumerated
    #[error("failed to read project directory {}: {source}", dir.display())]
    UnreadableProjectDir {
        dir: PathBuf,
        source: std::io::Error,
    },
}

/// Resolved per-cycle context.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Host module name, derived from the `*.info.yml` file
    pub module_name: String,
    /// Host project version from `package.json`, when present
    pub module_version: Option<String>,
    /// Project directory the manifest is written into
    pub project_dir: PathBuf,
    /// Bundler output directory used for production asset references
    pub out_dir: String,
    /// Dev-server origin used for development asset references
    pub origin: String,
    /// Whether this cycle is a dev-server cycle
    pub dev: bool,
    /// Active versioning policy
    pub versioning: Versioning,
}

impl RunContext {
    /// Resolves the context for one cycle.
    ///
    /// The module name comes from the first `*.info.yml` file in the project
    /// directory and is required; its absence aborts the cycle. The module
    /// version comes from `package.json` and is optional - a missing or
    /// unparsable file only logs a warning and leaves the version unset.
    pub async fn resolve(
        project_dir: PathBuf,
        dev: bool,
        versioning: Versioning,
    ) -> Result<Self, ContextError> {
        let module_name = find_module_name(&project_dir).await?;
        let module_version = read_module_version(&project_dir).await;

        debug!(
            module = %module_name,
            version = module_version.as_deref().unwrap_or("-"),
            dev,
            ?versioning,
            "run context resolved"
        );

        Ok(Self {
            module_name,
            module_version,
            project_dir,
            out_dir: DEFAULT_OUT_DIR.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            dev,
            versioning,
        })
    }

    pub fn prod(&self) -> bool {
        !self.dev
    }

    /// Path of the manifest document for this module.
    pub fn manifest_path(&self) -> PathBuf {
        self.project_dir
            .join(format!("{}.libraries.yml", self.module_name))
    }
}

/// Derives the module name from the first `*.info.yml` file in `dir`.
async fn find_module_name(dir: &Path) -> Result<String, ContextError> {
    let mut entries =
        tokio::fs::read_dir(dir)
            .await
            .map_err(|source| ContextError::UnreadableProjectDir {
                dir: dir.to_path_buf(),
                source,
            })?;

    let mut info_files = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(INFO_FILE_SUFFIX) {
            info_files.push(name);
        }
    }

    info_files.sort();
    info_files
        .first()
        .map(|name| name.trim_end_matches(INFO_FILE_SUFFIX).to_string())
        .ok_or_else(|| ContextError::MissingInfoFile {
            dir: dir.to_path_buf(),
        })
}

/// Reads the host project's declared version from `package.json`.
async fn read_module_version(dir: &Path) -> Option<String> {
    let path = dir.join(PACKAGE_METADATA_FILE);
    let version = match tokio::fs::read_to_string(&path).await {
        Ok(raw) => serde_json::from_str::<serde_json::Value>(&raw)
            .ok()
            .and_then(|pkg| pkg.get("version")?.as_str().map(str::to_string)),
        Err(_) => None,
    };

    if version.is_none() {
        warn!(path = %path.display(), "couldn't read a version from package.json");
    }
    version
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("demo_module.info.yml"), "name: Demo\n").unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"name": "demo_module", "version": "1.2.0"}"#,
        )
        .unwrap();
        dir
    }

    #[tokio::test]
    async fn test_resolve_reads_module_identity() {
        let project = create_test_project();

        let ctx = RunContext::resolve(project.path().to_path_buf(), false, Versioning::Module)
            .await
            .unwrap();

        assert_eq!(ctx.module_name, "demo_module");
        assert_eq!(ctx.module_version.as_deref(), Some("1.2.0"));
        assert!(ctx.prod());
        assert_eq!(
            ctx.manifest_path(),
            project.path().join("demo_module.libraries.yml")
        );
    }

    #[tokio::test]
    async fn test_resolve_without_info_file_fails() {
        let project = TempDir::new().unwrap();

        let result =
            RunContext::resolve(project.path().to_path_buf(), false, Versioning::Module).await;

        assert!(matches!(
            result,
            Err(ContextError::MissingInfoFile { .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_without_package_json_leaves_version_unset() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("demo_module.info.yml"), "name: Demo\n").unwrap();

        let ctx = RunContext::resolve(project.path().to_path_buf(), true, Versioning::Module)
            .await
            .unwrap();

        assert!(ctx.module_version.is_none());
        assert!(ctx.dev);
    }

    #[tokio::test]
    async fn test_resolve_picks_first_info_file_by_name() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("zeta.info.yml"), "").unwrap();
        fs::write(project.path().join("alpha.info.yml"), "").unwrap();

        let ctx = RunContext::resolve(project.path().to_path_buf(), false, Versioning::Drupal)
            .await
            .unwrap();

        assert_eq!(ctx.module_name, "alpha");
    }
}
