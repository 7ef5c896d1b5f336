//! tedana integration harness
//!
//! Fetches reference multi-echo fMRI datasets, runs the tedana denoising
//! workflow against them and checks that the produced files match a
//! packaged manifest exactly.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        assert!(USER_AGENT.starts_with("tedana-harness/"));
        assert!(LOG_FILE_PATTERN.starts_with("^tedana_"));
        assert_eq!(env::SKIP_INTEGRATION, "TEDANA_SKIP_INTEGRATION");
    }

    #[test]
    fn test_error_types() {
        let error = AppError::from(errors::ArchiveFormatError::NotGzip);
        assert_eq!(error.category(), "archive");
        assert_eq!(error.failure_kind(), errors::FailureKind::Setup);
    }
}
