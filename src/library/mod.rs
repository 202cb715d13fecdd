//! Library manifest schema data structures
//!
//! This module defines the schema for the library manifest - the declarative
//! document that registers bundled script and stylesheet assets with the host
//! Drupal runtime, grouped into named library units.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

pub mod builder;
pub mod classify;
pub mod ident;

/// The five stylesheet cascade groups, in load-precedence order.
pub const CSS_GROUPS: [CssGroup; 5] = [
    CssGroup::Base,
    CssGroup::Layout,
    CssGroup::Component,
    CssGroup::State,
    CssGroup::Theme,
];

/// Cascade group a stylesheet asset is registered under.
///
/// Declaration order is load-precedence order; the derived `Ord` keeps
/// serialized group maps in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CssGroup {
    Base,
    Layout,
    Component,
    State,
    Theme,
}

impl CssGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            CssGroup::Base => "base",
            CssGroup::Layout => "layout",
            CssGroup::Component => "component",
            CssGroup::State => "state",
            CssGroup::Theme => "theme",
        }
    }
}

impl fmt::Display for CssGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an asset reference points outside the module or at a local file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetSource {
    External,
    File,
}

/// The full manifest: unit name to library unit.
pub type Libraries = BTreeMap<String, Library>;

/// One named, registerable library unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Library {
    /// Version stamp, shape depends on the active versioning policy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Load at page-header time instead of deferred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<bool>,
    /// Host-runtime capabilities this unit requires
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub dependencies: BTreeSet<String>,
    /// Script assets keyed by asset reference
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub js: BTreeMap<String, JsAsset>,
    /// Style assets keyed by cascade group, then asset reference
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub css: BTreeMap<CssGroup, BTreeMap<String, CssAsset>>,
}

/// Descriptor for one script asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsAsset {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub source: Option<AssetSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minified: Option<bool>,
    /// Set only under hash versioning
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preprocessed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<JsAttributes>,
}

/// Script tag attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsAttributes {
    /// Script module type (e.g. `module`)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub module_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crossorigin: Option<serde_yaml::Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Descriptor for one style asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CssAsset {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub source: Option<AssetSource>,
    /// Set only under hash versioning
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preprocessed: Option<bool>,
}

/// Deep-merges a later partial unit into an existing one.
///
/// Pure over its inputs so merge order-independence holds for descriptor
/// sets: entries for distinct asset references are unioned, entries for the
/// same reference merge field-wise with the partial's set fields winning.
/// Unit-level scalars (`version`, `header`) are first-set wins.
pub fn merge_library(existing: Library, partial: Library) -> Library {
    let mut merged = Library {
        version: existing.version.or(partial.version),
        header: existing.header.or(partial.header),
        dependencies: existing.dependencies,
        js: existing.js,
        css: existing.css,
    };

    merged.dependencies.extend(partial.dependencies);

    for (reference, asset) in partial.js {
        let asset = match merged.js.remove(&reference) {
            Some(current) => merge_js_asset(current, asset),
            None => asset,
        };
        merged.js.insert(reference, asset);
    }

    for (group, entries) in partial.css {
        let group_entries = merged.css.entry(group).or_default();
        for (reference, asset) in entries {
            let asset = match group_entries.remove(&reference) {
                Some(current) => merge_css_asset(current, asset),
                None => asset,
            };
            group_entries.insert(reference, asset);
        }
    }

    merged
}

fn merge_js_asset(existing: JsAsset, partial: JsAsset) -> JsAsset {
    JsAsset {
        source: partial.source.or(existing.source),
        minified: partial.minified.or(existing.minified),
        preprocessed: partial.preprocessed.or(existing.preprocessed),
        attributes: match (existing.attributes, partial.attributes) {
            (Some(current), Some(incoming)) => Some(merge_js_attributes(current, incoming)),
            (current, incoming) => incoming.or(current),
        },
    }
}

fn merge_js_attributes(existing: JsAttributes, partial: JsAttributes) -> JsAttributes {
    let mut extra = existing.extra;
    extra.extend(partial.extra);
    JsAttributes {
        module_type: partial.module_type.or(existing.module_type),
        crossorigin: partial.crossorigin.or(existing.crossorigin),
        extra,
    }
}

fn merge_css_asset(existing: CssAsset, partial: CssAsset) -> CssAsset {
    CssAsset {
        source: partial.source.or(existing.source),
        preprocessed: partial.preprocessed.or(existing.preprocessed),
    }
}
