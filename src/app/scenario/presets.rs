//! Reference scenarios for the five-echo and three-echo datasets

use std::path::{Path, PathBuf};

use crate::app::manifest::ManifestSource;
use crate::app::workflow::{WorkflowInvocation, WorkflowOptions};
use crate::constants::{datasets, resources};

use super::Scenario;

/// Names accepted by [`by_name`]
pub const SCENARIO_NAMES: &[&str] = &["five-echo", "three-echo"];

/// Output directory convention: `{staging}/TED.{dataset}`
pub fn output_dir(staging_dir: &Path, dataset: &str) -> PathBuf {
    staging_dir.join(format!("{}{}", datasets::OUTPUT_DIR_PREFIX, dataset))
}

/// Five echoes, one file per echo, debug and verbose outputs
pub fn five_echo(staging_root: &Path) -> Scenario {
    let name = "five-echo";
    let staging_dir = staging_root.join(name);
    let data = (1..=5)
        .map(|echo| staging_dir.join(format!("p06.SBJ01_S09_Task11_e{}.sm.nii.gz", echo)))
        .collect();

    Scenario {
        name: name.to_string(),
        url: datasets::FIVE_ECHO_URL.to_string(),
        invocation: WorkflowInvocation {
            data,
            echo_times: vec![15.4, 29.7, 44.0, 58.3, 72.6],
            out_dir: output_dir(&staging_dir, name),
            options: WorkflowOptions {
                debug: true,
                verbose: true,
                ..Default::default()
            },
        },
        staging_dir,
        manifest: ManifestSource::resource(resources::OUTPUTS_VERBOSE),
    }
}

/// Three echoes in a single z-concatenated file, Kundu PCA
pub fn three_echo(staging_root: &Path) -> Scenario {
    let name = "three-echo";
    let staging_dir = staging_root.join(name);

    Scenario {
        name: name.to_string(),
        url: datasets::THREE_ECHO_URL.to_string(),
        invocation: WorkflowInvocation {
            data: vec![staging_dir.join("three_echo_Cornell_zcat.nii.gz")],
            echo_times: vec![14.5, 38.5, 62.5],
            out_dir: output_dir(&staging_dir, name),
            options: WorkflowOptions {
                tedpca: Some("kundu".to_string()),
                ..Default::default()
            },
        },
        staging_dir,
        manifest: ManifestSource::resource(resources::OUTPUTS),
    }
}

/// Look up a preset by name
pub fn by_name(name: &str, staging_root: &Path) -> Option<Scenario> {
    match name {
        "five-echo" => Some(five_echo(staging_root)),
        "three-echo" => Some(three_echo(staging_root)),
        _ => None,
    }
}

/// Every preset
pub fn all(staging_root: &Path) -> Vec<Scenario> {
    SCENARIO_NAMES
        .iter()
        .filter_map(|name| by_name(name, staging_root))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_echo_layout() {
        let scenario = five_echo(Path::new("/tmp/data"));

        assert_eq!(scenario.staging_dir, PathBuf::from("/tmp/data/five-echo"));
        assert_eq!(
            scenario.output_dir(),
            Path::new("/tmp/data/five-echo/TED.five-echo")
        );
        assert_eq!(scenario.invocation.data.len(), 5);
        assert_eq!(
            scenario.invocation.data[0],
            PathBuf::from("/tmp/data/five-echo/p06.SBJ01_S09_Task11_e1.sm.nii.gz")
        );
        assert!(scenario.invocation.options.debug && scenario.invocation.options.verbose);
        assert!(scenario.invocation.validate().is_ok());
    }

    #[test]
    fn test_three_echo_layout() {
        let scenario = three_echo(Path::new("/tmp/data"));

        assert_eq!(
            scenario.output_dir(),
            Path::new("/tmp/data/three-echo/TED.three-echo")
        );
        assert_eq!(scenario.invocation.options.tedpca.as_deref(), Some("kundu"));
        assert_eq!(
            scenario.manifest,
            ManifestSource::resource(resources::OUTPUTS)
        );
        assert!(scenario.invocation.validate().is_ok());
    }

    #[test]
    fn test_lookup() {
        assert_eq!(all(Path::new("/x")).len(), SCENARIO_NAMES.len());
        assert!(by_name("seven-echo", Path::new("/x")).is_none());
    }
}
