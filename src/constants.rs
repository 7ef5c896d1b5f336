//! Application constants for the tedana harness
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain.

use std::time::Duration;

/// Environment variable names
pub mod env {
    /// Set to a truthy value to skip network-backed integration scenarios
    pub const SKIP_INTEGRATION: &str = "TEDANA_SKIP_INTEGRATION";

    /// Overrides the staging root from the configuration file
    pub const STAGING_ROOT: &str = "TEDANA_STAGING_ROOT";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("tedana-harness/", env!("CARGO_PKG_VERSION"));

    /// Whole-request timeout; datasets are a few hundred megabytes
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
}

/// Archive decoding constants
pub mod archive {
    /// First two bytes of every gzip member
    pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
}

/// Reference datasets hosted on OSF
pub mod datasets {
    /// Five-echo dataset archive
    pub const FIVE_ECHO_URL: &str = "https://osf.io/9c42e/download";

    /// Three-echo dataset archive
    pub const THREE_ECHO_URL: &str = "https://osf.io/rqhfc/download";

    /// Default staging root for extracted datasets
    pub const DEFAULT_STAGING_ROOT: &str = "/tmp/data";

    /// Prefix of the workflow output directory inside a staging directory
    pub const OUTPUT_DIR_PREFIX: &str = "TED.";
}

/// Output verification constants
pub mod verify {
    /// Pattern of the timestamped run log written at the output root
    pub const LOG_FILE_PATTERN: &str =
        r"^tedana_[12][0-9]{3}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}\.tsv$";

    /// Name used for the log-file pattern in reports and configuration
    pub const LOG_FILE_PATTERN_NAME: &str = "run-log";

    /// chrono format producing names matched by [`LOG_FILE_PATTERN`]
    pub const LOG_FILE_FORMAT: &str = "tedana_%Y-%m-%dT%H:%M:%S.tsv";
}

/// Packaged manifest resource names
pub mod resources {
    /// Outputs of a default run
    pub const OUTPUTS: &str = "tedana_outputs.txt";

    /// Outputs of a debug + verbose run
    pub const OUTPUTS_VERBOSE: &str = "tedana_outputs_verbose.txt";
}

/// External workflow defaults
pub mod workflow {
    /// Program invoked by the command-line workflow runner
    pub const DEFAULT_PROGRAM: &str = "tedana";
}

/// Configuration file locations
pub mod config {
    /// Project-local configuration file
    pub const LOCAL_FILE: &str = "./tedana-harness.toml";

    /// Directory name under the user config directory
    pub const APP_DIR: &str = "tedana-harness";

    /// File name under the user config directory
    pub const FILE_NAME: &str = "config.toml";
}

/// Logging constants
pub mod logging {
    /// Default log level
    pub const DEFAULT_LOG_LEVEL: &str = "info";
}

pub use http::{DEFAULT_TIMEOUT as HTTP_TIMEOUT, USER_AGENT};
pub use verify::LOG_FILE_PATTERN;
