//! Supplementary header markup for dev documents
//!
//! Capability names inferred during a cycle are resolved against the host
//! environment's library-definition document and rendered as stylesheet and
//! script tags for the page header. The side document is read-only; when it
//! is missing or unparsable this feature degrades with a warning and the
//! manifest core continues.

use crate::context::RunContext;
use crate::library::CSS_GROUPS;
use crate::scanner::DependencyMap;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Root of the host environment's core assets, relative to the project
/// directory on disk and to the site root in rendered markup.
pub const CORE_PATH: &str = "vendor/drupal/core";

const CORE_LIBRARIES_FILE: &str = "core.libraries.yml";
const CORE_PREFIX: &str = "core/";

/// Lenient view of one side-document library entry. Only the asset maps are
/// read; unknown fields and arbitrary attribute shapes are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SideLibrary {
    js: BTreeMap<String, serde_yaml::Value>,
    css: BTreeMap<String, BTreeMap<String, serde_yaml::Value>>,
}

/// Renders header markup for every capability inferred during the cycle.
///
/// Stylesheet links come first, walking the cascade groups in load order,
/// followed by script tags, all rooted at the core asset path. Returns
/// `None` when the side document cannot be read or parsed.
pub async fn head_markup(ctx: &RunContext, deps: &DependencyMap) -> Option<String> {
    let path = ctx.project_dir.join(CORE_PATH).join(CORE_LIBRARIES_FILE);
    let raw = match tokio::fs::read_to_string(&path).await {
        Ok(raw) => raw,
        Err(error) => {
            warn!(path = %path.display(), %error, "side document unreadable, skipping head markup");
            return None;
        }
    };
    let definitions: BTreeMap<String, SideLibrary> = match serde_yaml::from_str(&raw) {
        Ok(parsed) => parsed,
        Err(error) => {
            warn!(path = %path.display(), %error, "side document unparsable, skipping head markup");
            return None;
        }
    };

    let mut markup = String::new();
    for capability in collect_capabilities(deps) {
        let Some(library) = definitions.get(&capability) else {
            continue;
        };
        for group in CSS_GROUPS {
            if let Some(entries) = library.css.get(group.as_str()) {
                for asset in entries.keys() {
                    markup.push_str(&format!(
                        r#"<link rel="stylesheet" href="/{CORE_PATH}/{asset}">"#
                    ));
                }
            }
        }
        for asset in library.js.keys() {
            markup.push_str(&format!(
                r#"<script type="text/javascript" src="/{CORE_PATH}/{asset}"></script>"#
            ));
        }
    }
    Some(markup)
}

/// Capability names referenced anywhere in the cycle, stripped of their
/// host-runtime prefix.
fn collect_capabilities(deps: &DependencyMap) -> BTreeSet<String> {
    deps.values()
        .flatten()
        .map(|capability| {
            capability
                .strip_prefix(CORE_PREFIX)
                .unwrap_or(capability)
                .to_string()
        })
        .collect()
}

/// Splices markup into a page immediately before the closing head tag.
pub fn inject_head(html: &str, markup: &str) -> String {
    html.replacen("</head>", &format!("{markup}</head>"), 1)
}
