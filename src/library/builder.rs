//! Per-file library fragments and their aggregation into a manifest
//!
//! Each emitted file contributes one partial library unit; partials for the
//! same unit name deep-merge into a single entry. Unit names and asset
//! references derive from the normalized identifier so that hash-versioned
//! rebuilds converge on the same entries, while dependency lookups key on
//! the original pre-bundle path.

use super::classify::{classify, strip_group_suffix};
use super::ident::normalize;
use super::{
    merge_library, AssetSource, CssAsset, CssGroup, JsAsset, JsAttributes, Libraries, Library,
};
use crate::context::{RunContext, Versioning};
use crate::scanner::DependencyMap;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

const STYLESHEET_EXTENSION: &str = "css";

/// Builds the partial unit contributed by one emitted file.
///
/// Returns the unit name the partial merges under together with the partial
/// itself.
pub fn build_unit(file: &str, ctx: &RunContext, deps: &DependencyMap) -> (String, Library) {
    let id = normalize(file, ctx.prod(), ctx.versioning);
    let path = Path::new(&id);
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    let reference = if ctx.dev {
        format!("{}/{}", ctx.origin, id)
    } else {
        format!("{}/{}", ctx.out_dir, id)
    };

    let (name, mut unit) = if extension == STYLESHEET_EXTENSION {
        let group = classify(stem);
        let name = strip_group_suffix(stem).to_string();
        (name, css_fragment(group, reference, ctx))
    } else {
        (stem.to_string(), js_fragment(reference, ctx))
    };

    unit.version = match ctx.versioning {
        Versioning::Drupal => Some("VERSION".to_string()),
        Versioning::Module => ctx.module_version.clone(),
        Versioning::Hash => None,
    };

    if let Some(capabilities) = deps.get(file) {
        unit.dependencies.extend(capabilities.iter().cloned());
    }

    debug!(file, unit = %name, "built library fragment");
    (name, unit)
}

/// Folds all emitted files into the accumulated manifest.
pub fn build_libraries(files: &[String], ctx: &RunContext, deps: &DependencyMap) -> Libraries {
    let mut libraries = Libraries::new();
    for file in files {
        let (name, partial) = build_unit(file, ctx, deps);
        let unit = match libraries.remove(&name) {
            Some(existing) => merge_library(existing, partial),
            None => partial,
        };
        libraries.insert(name, unit);
    }
    libraries
}

fn css_fragment(group: CssGroup, reference: String, ctx: &RunContext) -> Library {
    let asset = CssAsset {
        source: Some(asset_source(ctx)),
        preprocessed: preprocessed_flag(ctx),
    };

    let mut entries = BTreeMap::new();
    entries.insert(reference, asset);
    let mut css = BTreeMap::new();
    css.insert(group, entries);

    Library {
        css,
        ..Default::default()
    }
}

fn js_fragment(reference: String, ctx: &RunContext) -> Library {
    let asset = JsAsset {
        source: Some(asset_source(ctx)),
        minified: Some(true),
        preprocessed: preprocessed_flag(ctx),
        attributes: Some(JsAttributes {
            module_type: Some("module".to_string()),
            crossorigin: Some(serde_yaml::Value::Mapping(serde_yaml::Mapping::new())),
            extra: BTreeMap::new(),
        }),
    };

    let mut js = BTreeMap::new();
    js.insert(reference, asset);

    Library {
        js,
        ..Default::default()
    }
}

fn asset_source(ctx: &RunContext) -> AssetSource {
    if ctx.dev {
        AssetSource::External
    } else {
        AssetSource::File
    }
}

fn preprocessed_flag(ctx: &RunContext) -> Option<bool> {
    (ctx.versioning == Versioning::Hash).then_some(true)
}
