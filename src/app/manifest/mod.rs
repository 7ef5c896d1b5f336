//! Expected-output manifests
//!
//! - [`types`] - `Manifest`, `ManifestSource` and parse statistics
//! - [`resources`] - manifests packaged into the binary
//!
//! # Example
//!
//! ```rust,no_run
//! use tedana_harness::app::manifest::ManifestSource;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manifest = ManifestSource::resource("tedana_outputs.txt").load().await?;
//! println!("{} expected files", manifest.len());
//! # Ok(())
//! # }
//! ```

pub mod resources;
pub mod types;

pub use types::{Manifest, ManifestSource, ManifestStats};
