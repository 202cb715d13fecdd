//! Dependency inference over build inputs
//!
//! The scanner evaluates source text against the fixed rule table in
//! [`patterns`] and records which host-runtime capabilities each file
//! references. Inference is purely textual and additive: rules match
//! independently, re-scanning is stable, and files without matches are
//! simply absent from the map.

pub mod patterns;

pub use patterns::is_scannable_source;

use futures_util::future::join_all;
use patterns::DEPENDENCY_RULES;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Per-cycle mapping from file path to inferred capability names.
///
/// Created empty at the start of a cycle, populated by scanning, consumed
/// once by the fragment builder, and discarded with the cycle.
pub type DependencyMap = HashMap<String, BTreeSet<String>>;

fn rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        DEPENDENCY_RULES
            .iter()
            .map(|(pattern, capability)| (Regex::new(pattern).unwrap(), *capability))
            .collect()
    })
}

/// Records the capabilities referenced by one file's source text.
pub fn scan(file: &str, source: &str, map: &mut DependencyMap) {
    for (pattern, capability) in rules() {
        if pattern.is_match(source) {
            map.entry(file.to_string())
                .or_default()
                .insert((*capability).to_string());
        }
    }

    if let Some(capabilities) = map.get(file) {
        debug!(file, capabilities = capabilities.len(), "scanned source");
    }
}

/// Scans a cycle's input files from disk.
///
/// All reads start together and the call waits for every one to settle;
/// an unreadable file is skipped with a warning and never blocks the rest
/// of the cycle.
pub async fn scan_inputs(files: &[String], map: &mut DependencyMap) {
    let reads = files
        .iter()
        .filter(|file| is_scannable_source(file))
        .map(|file| async move { (file.as_str(), tokio::fs::read_to_string(file).await) });

    for (file, result) in join_all(reads).await {
        match result {
            Ok(source) => scan(file, &source, map),
            Err(error) => warn!(file, %error, "skipping unreadable build input"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_records_matching_capabilities() {
        let mut map = DependencyMap::new();
        let source = "const el = once('nav', '.nav');\nDrupal.attachBehaviors(el);";

        scan("js/nav.js", source, &mut map);

        let capabilities = &map["js/nav.js"];
        assert!(capabilities.contains("core/once"));
        assert!(capabilities.contains("core/drupal"));
    }

    #[test]
    fn test_scan_debounce_and_cookie_yield_exactly_two() {
        let mut map = DependencyMap::new();
        let source = "debounce(save, 250);\nCookies.set('sid', token);";

        scan("js/foo.ts", source, &mut map);

        let capabilities = &map["js/foo.ts"];
        assert_eq!(capabilities.len(), 2);
        assert!(capabilities.contains("core/drupal.debounce"));
        assert!(capabilities.contains("core/js-cookie"));
    }

    #[test]
    fn test_scan_without_matches_leaves_file_absent() {
        let mut map = DependencyMap::new();

        scan("js/plain.js", "export const answer = 42;", &mut map);

        assert!(!map.contains_key("js/plain.js"));
    }

    #[test]
    fn test_scan_is_additive_and_rescan_stable() {
        let mut map = DependencyMap::new();

        scan("js/a.js", "drupalSettings.path;", &mut map);
        scan("js/a.js", "Cookies.get('sid');", &mut map);
        scan("js/a.js", "Cookies.get('sid');", &mut map);

        let capabilities = &map["js/a.js"];
        assert_eq!(capabilities.len(), 2);
        assert!(capabilities.contains("core/drupalSettings"));
        assert!(capabilities.contains("core/js-cookie"));
    }

    #[test]
    fn test_scan_settings_global_does_not_imply_runtime_global() {
        let mut map = DependencyMap::new();

        scan("js/a.js", "if (drupalSettings.demo) { start(); }", &mut map);

        let capabilities = &map["js/a.js"];
        assert_eq!(capabilities.len(), 1);
        assert!(capabilities.contains("core/drupalSettings"));
    }

    #[tokio::test]
    async fn test_scan_inputs_settles_past_unreadable_files() {
        let dir = TempDir::new().unwrap();
        let readable = dir.path().join("nav.js");
        fs::write(&readable, "Drupal.announce; announce('hi');").unwrap();
        let missing = dir.path().join("gone.js");

        let files = vec![
            readable.to_string_lossy().into_owned(),
            missing.to_string_lossy().into_owned(),
        ];
        let mut map = DependencyMap::new();

        scan_inputs(&files, &mut map).await;

        assert_eq!(map.len(), 1);
        assert!(map[&files[0]].contains("core/drupal.announce"));
    }

    #[tokio::test]
    async fn test_scan_inputs_ignores_non_source_files() {
        let dir = TempDir::new().unwrap();
        let stylesheet = dir.path().join("app.css");
        fs::write(&stylesheet, ".nav { color: red; } /* Drupal. */").unwrap();

        let files = vec![stylesheet.to_string_lossy().into_owned()];
        let mut map = DependencyMap::new();

        scan_inputs(&files, &mut map).await;

        assert!(map.is_empty());
    }
}
