//! Capability inference rules and source-file filters

use std::path::Path;

/// Ordered table of (pattern, capability) inference rules.
///
/// A rule matches anywhere in a file's source text; every matching rule
/// contributes its capability independently. Helper rules match call sites
/// so destructured usage still resolves; the runtime-global and settings
/// rules act as catch-alls later in the table.
pub const DEPENDENCY_RULES: &[(&str, &str)] = &[
    (r"\bonce\(", "core/once"),
    (r"\bdebounce\(", "core/drupal.debounce"),
    (r"\bdisplace\(", "core/drupal.displace"),
    (r"\bannounce\(", "core/drupal.announce"),
    (r"Drupal\.Message", "core/drupal.message"),
    (r"\bdrupalSettings\b", "core/drupalSettings"),
    (r"Drupal\.", "core/drupal"),
    (r"Cookies\.", "core/js-cookie"),
];

/// Extensions of source files worth scanning during a dev cycle.
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "vue", "svelte"];

/// Checks whether a file is a scannable script source.
pub fn is_scannable_source(file: &str) -> bool {
    Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}
