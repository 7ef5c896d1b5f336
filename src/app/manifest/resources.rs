//! Packaged manifest resources
//!
//! Manifests are compiled into the binary so lookups never depend on the
//! process working directory.

use crate::constants::resources::{OUTPUTS, OUTPUTS_VERBOSE};
use crate::errors::{ManifestError, ManifestResult};

const PACKAGED: &[(&str, &str)] = &[
    (
        OUTPUTS,
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/resources/tedana_outputs.txt"
        )),
    ),
    (
        OUTPUTS_VERBOSE,
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/resources/tedana_outputs_verbose.txt"
        )),
    ),
];

/// Contents of a packaged manifest
pub fn lookup(name: &str) -> ManifestResult<&'static str> {
    PACKAGED
        .iter()
        .find(|(resource, _)| *resource == name)
        .map(|(_, text)| *text)
        .ok_or_else(|| ManifestError::UnknownResource {
            name: name.to_string(),
        })
}

/// Names of all packaged manifests
pub fn names() -> impl Iterator<Item = &'static str> {
    PACKAGED.iter().map(|(name, _)| *name)
}
