//! Plugin manifest and package emitters for plugpack
//!
//! This crate owns the `manifest.json` rewrite hook and minimal emitters for
//! the step descriptors a plugin build appends to its configuration.
//!
//! # Package Structure
//!
//! ```text
//! plugin.zip
//! ├── manifest.json                  # rewritten with loader namespace and library bundles
//! ├── bundle.js                      # main bundle, vendor chunk concatenated in
//! ├── @scope__widgets@2.1.0.bundle.js   # bundled-scope library
//! └── assets/...
//! ```
//!
//! Bundles of `external` libraries and `*.html` files never enter the archive.
//!
//! # Example
//!
//! ```no_run
//! use plugpack_bundle::{ManifestRewrite, run_post_build_steps};
//! use plugpack_core::{BuildConfiguration, BuildOptions, PluginLibsBundles};
//!
//! let options = BuildOptions::from_file("plugin.json")?;
//! let bundles = PluginLibsBundles::new();
//! let transform = ManifestRewrite::new(&options, bundles.clone(), "ns").into_transform("src/assets".as_ref());
//! # let _ = transform;
//!
//! let config = BuildConfiguration::default();
//! run_post_build_steps(&config, "dist/plugin".as_ref())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;

pub mod archive;
pub mod concat;
pub mod copy;
pub mod emit;
pub mod manifest;

pub use archive::{ArchiveReport, write_archive};
pub use emit::{EmitReport, run_post_build_steps};
pub use error::BundleError;
pub use manifest::{ExtensionManifest, ManifestRewrite};

/// Result type for bundle operations.
pub type BundleResult<T> = Result<T, BundleError>;
