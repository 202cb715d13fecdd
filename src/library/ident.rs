//! Stable identifier derivation for emitted asset filenames

use crate::context::Versioning;
use regex::Regex;

/// Derives the stable identifier for an emitted file.
///
/// Under hash versioning in a production build the bundler inserts an
/// 8-character content hash between dots (`js/foo.abc12345.js`); the hash
/// segment is removed and the surrounding dots collapse into one, so that
/// rebuilds converge to the same manifest entry across hash changes. In
/// every other configuration the filename is already stable and is returned
/// unchanged.
pub fn normalize(file: &str, prod: bool, versioning: Versioning) -> String {
    if prod && versioning == Versioning::Hash {
        let hash_segment = Regex::new(r"\.[a-f0-9]{8}\.").unwrap();
        return hash_segment.replace(file, ".").into_owned();
    }
    file.to_string()
}
