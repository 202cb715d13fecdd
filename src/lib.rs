//! libwright - bundler-output to library-manifest translation for Drupal
//!
//! This library observes the output of a bundling pipeline (emitted files,
//! their code, and their dependency relationships) and produces the module's
//! `libraries.yml` manifest: assets grouped into named library units,
//! stylesheets ordered by cascade group, and runtime dependencies inferred
//! from the emitted code.
//!
//! # Core Concepts
//!
//! - **Library unit**: one named, registerable grouping of script and style
//!   assets plus version and dependency metadata
//! - **Dependency scanning**: purely textual inference of host-runtime
//!   capabilities (the settings global, the debounce helper, the cookie
//!   library) from emitted source
//! - **Cascade groups**: the five fixed stylesheet categories (`base`,
//!   `layout`, `component`, `state`, `theme`) controlling load precedence
//! - **Generated-section marker**: the sentinel line in the manifest that
//!   separates preserved hand-authored content from generated content
//!
//! # Example Usage
//!
//! ```ignore
//! use libwright::{build_libraries, scan, DependencyMap, RunContext, Versioning};
//!
//! async fn translate(files: Vec<String>) -> anyhow::Result<()> {
//!     let ctx = RunContext::resolve(".".into(), false, Versioning::Module).await?;
//!
//!     let mut deps = DependencyMap::new();
//!     scan("js/app.js", "once('app', '.app');", &mut deps);
//!
//!     let libraries = build_libraries(&files, &ctx, &deps);
//!     libwright::emit(&ctx.manifest_path(), &libraries).await
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`scanner`]: capability inference over build inputs
//! - [`library`]: manifest schema, cascade classification, identifier
//!   normalization, and fragment building
//! - [`emit`]: marker-splicing manifest emission
//! - [`markup`]: supplementary header markup from the host environment's
//!   library definitions
//! - [`pipeline`]: build and dev cycle orchestration
//! - [`cli`]: the command-line driver supplying resolved inputs

pub mod cli;
pub mod context;
pub mod emit;
pub mod library;
pub mod markup;
pub mod pipeline;
pub mod scanner;

pub use context::{ContextError, RunContext, Versioning};
pub use emit::{emit, GENERATED_MARKER};
pub use library::builder::{build_libraries, build_unit};
pub use library::{merge_library, CssGroup, Libraries, Library};
pub use pipeline::{run_build_cycle, run_dev_cycle, BundleRecord, CycleReport};
pub use scanner::{scan, scan_inputs, DependencyMap};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
