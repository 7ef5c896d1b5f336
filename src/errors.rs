//! Error types for the tedana integration harness
//!
//! Each stage of a scenario run has its own error enum so that a failing run
//! can be triaged quickly: setup failures (transfer, archive, filesystem) are
//! distinct from output mismatches and from a wrong log-file count.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Network retrieval errors
#[derive(Error, Debug)]
pub enum TransferError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Invalid URL provided
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// Request exceeded the configured timeout
    #[error("Download timed out after {seconds} seconds")]
    Timeout { seconds: u64 },
}

/// Errors for payloads that are not a usable gzip-compressed tar stream
#[derive(Error, Debug)]
pub enum ArchiveFormatError {
    /// Payload does not start with the gzip magic bytes
    #[error("Payload is not gzip-compressed")]
    NotGzip,

    /// Gzip or tar decoding failed part way through
    #[error("Corrupt archive: {reason}")]
    Corrupt { reason: String },

    /// Entry would be written outside the destination directory
    #[error("Archive entry escapes the destination directory: {path}")]
    UnsafeEntry { path: String },

    /// Entry type that is never extracted (devices, fifos)
    #[error("Unsupported archive entry {path} of type {kind}")]
    UnsupportedEntry { path: String, kind: String },
}

/// Local filesystem failures during extraction, cleanup or enumeration
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Directory could not be created
    #[error("Failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File or directory could not be written
    #[error("Failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File could not be read
    #[error("Failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Recursive directory walk failed
    #[error("Failed to walk directory {path}")]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stale output could not be removed
    #[error("Failed to remove {path}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Files expected by the manifest but absent, and files present but unexpected
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct OutputDiff {
    /// Expected by the manifest, not produced
    pub missing: Vec<String>,
    /// Produced, not listed in the manifest
    pub unexpected: Vec<String>,
}

impl OutputDiff {
    /// True when produced outputs and manifest agree
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty()
    }
}

impl fmt::Display for OutputDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} missing, {} unexpected",
            self.missing.len(),
            self.unexpected.len()
        )?;
        for path in &self.missing {
            write!(f, "\n  - missing:    {}", path)?;
        }
        for path in &self.unexpected {
            write!(f, "\n  + unexpected: {}", path)?;
        }
        Ok(())
    }
}

/// Output verification failures
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Expected exactly one file matching a run-specific name pattern
    #[error("Expected exactly one log file matching {pattern}, found {}: {found:?}", .found.len())]
    LogFileCount { pattern: String, found: Vec<String> },

    /// Produced file set differs from the manifest
    #[error("Output files do not match manifest: {0}")]
    OutputMismatch(Box<OutputDiff>),

    /// Dynamic-name pattern failed to compile
    #[error("Invalid output name pattern {pattern}: {error}")]
    InvalidPattern { pattern: String, error: String },
}

/// Manifest resource errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// No packaged manifest with this name
    #[error("Unknown manifest resource: {name}")]
    UnknownResource { name: String },

    /// Manifest file on disk could not be read
    #[error("Failed to read manifest {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// External workflow invocation errors
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Program could not be started
    #[error("Failed to start workflow program {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Program exited unsuccessfully
    #[error("Workflow program {program} exited with {status}")]
    Failed { program: String, status: String },

    /// Inputs rejected before the workflow was started
    #[error("Invalid workflow invocation: {reason}")]
    InvalidInvocation { reason: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Coarse classification used when reporting a failed scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Download, extraction or staging failed
    Setup,
    /// Wrong number of run-specific log files
    LogCount,
    /// Produced outputs differ from the manifest
    OutputMismatch,
    /// The workflow itself failed
    Workflow,
    /// Anything else
    Other,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::Setup => "download/setup failed",
            FailureKind::LogCount => "log file count wrong",
            FailureKind::OutputMismatch => "output mismatch",
            FailureKind::Workflow => "workflow failed",
            FailureKind::Other => "error",
        };
        f.write_str(label)
    }
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Archive(#[from] ArchiveFormatError),

    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Transfer(_) => "transfer",
            AppError::Archive(_) => "archive",
            AppError::Filesystem(_) => "filesystem",
            AppError::Validation(_) => "validation",
            AppError::Manifest(_) => "manifest",
            AppError::Workflow(_) => "workflow",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }

    /// Classify the failure for a human triaging a red scenario
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            AppError::Transfer(_) | AppError::Archive(_) | AppError::Filesystem(_) => {
                FailureKind::Setup
            }
            AppError::Validation(ValidationError::LogFileCount { .. }) => FailureKind::LogCount,
            AppError::Validation(ValidationError::OutputMismatch(_)) => {
                FailureKind::OutputMismatch
            }
            AppError::Workflow(_) => FailureKind::Workflow,
            _ => FailureKind::Other,
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Transfer result type alias
pub type TransferResult<T> = std::result::Result<T, TransferError>;

/// Validation result type alias
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Manifest result type alias
pub type ManifestResult<T> = std::result::Result<T, ManifestError>;

/// Workflow result type alias
pub type WorkflowResult<T> = std::result::Result<T, WorkflowError>;

/// Error raised by archive extraction: either the payload or the disk is at fault
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error(transparent)]
    Format(#[from] ArchiveFormatError),

    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

impl From<ExtractError> for AppError {
    fn from(error: ExtractError) -> Self {
        match error {
            ExtractError::Format(e) => AppError::Archive(e),
            ExtractError::Filesystem(e) => AppError::Filesystem(e),
        }
    }
}

/// Extraction result type alias
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kind_distinguishes_triage_classes() {
        let setup = AppError::from(TransferError::Status {
            status: 404,
            url: "https://example.com".to_string(),
        });
        assert_eq!(setup.failure_kind(), FailureKind::Setup);
        assert_eq!(setup.category(), "transfer");

        let log = AppError::from(ValidationError::LogFileCount {
            pattern: "^x$".to_string(),
            found: vec![],
        });
        assert_eq!(log.failure_kind(), FailureKind::LogCount);

        let mismatch = AppError::from(ValidationError::OutputMismatch(Box::default()));
        assert_eq!(mismatch.failure_kind(), FailureKind::OutputMismatch);
        assert_ne!(setup.failure_kind().to_string(), mismatch.failure_kind().to_string());
    }

    #[test]
    fn test_output_diff_display_lists_both_sides() {
        let diff = OutputDiff {
            missing: vec!["b/c.txt".to_string()],
            unexpected: vec!["extra.nii.gz".to_string()],
        };
        let message = ValidationError::OutputMismatch(Box::new(diff)).to_string();
        assert!(message.contains("1 missing, 1 unexpected"));
        assert!(message.contains("missing:    b/c.txt"));
        assert!(message.contains("unexpected: extra.nii.gz"));
    }

    #[test]
    fn test_extract_error_maps_to_setup_categories() {
        let format: AppError = ExtractError::from(ArchiveFormatError::NotGzip).into();
        assert_eq!(format.category(), "archive");
        let disk: AppError = ExtractError::from(FilesystemError::CreateDir {
            path: PathBuf::from("/nope"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        })
        .into();
        assert_eq!(disk.category(), "filesystem");
    }
}
