//! Cascade-group classification for stylesheet filenames

use super::CssGroup;

/// Determines the cascade group from a stylesheet's filename stem.
///
/// Checked in order, first match wins; stems without a group marker land in
/// `base`. Matching is case-sensitive against the end of the stem.
pub fn classify(stem: &str) -> CssGroup {
    if stem.ends_with(".layout") {
        return CssGroup::Layout;
    }
    if stem.ends_with(".component") {
        return CssGroup::Component;
    }
    if stem.ends_with(".theme") {
        return CssGroup::Theme;
    }
    if stem.ends_with(".state") {
        return CssGroup::State;
    }
    CssGroup::Base
}

/// Strips a trailing cascade-group marker from a stem, if present.
pub fn strip_group_suffix(stem: &str) -> &str {
    for group in [".base", ".layout", ".component", ".state", ".theme"] {
        if let Some(stripped) = stem.strip_suffix(group) {
            return stripped;
        }
    }
    stem
}
