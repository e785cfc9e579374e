//! # plugpack
//!
//! Turns a standard single-page-app bundler configuration into the build of
//! a redistributable plugin package.
//!
//! A plugin build:
//! - strips the single-page-app entries (polyfills, styles, runtime chunk)
//! - marks host-provided libraries as externals
//! - optionally splits configured libraries into their own versioned bundles
//!   and records them in the plugin's `manifest.json`
//! - temporarily replaces the entry file with a re-export of the plugin module
//! - emits an AMD library named after the module and packages it as `plugin.zip`
//!
//! ## Usage
//!
//! ```ignore
//! use plugpack::prelude::*;
//!
//! struct MyBundler;
//!
//! #[async_trait]
//! impl Bundler for MyBundler {
//!     async fn bundle(&self, config: &BuildConfiguration) -> PackResult<BuildOutcome> {
//!         // compile, then run the copy/concat/zip steps of `config`
//!         # unimplemented!()
//!     }
//! }
//!
//! let options = BuildOptions::from_file("plugin.json")?;
//! let builder = PluginBuilder::new(".", Box::new(JsonBaseBuilder::new("base.json")));
//! let report = builder.run(&options, &MyBundler).await?;
//! println!("built {} into {}", report.module.export_name, report.output_path.display());
//! ```

pub mod base;
pub mod entry_point;
pub mod externals;
pub mod orchestrator;
pub mod packaging;
pub mod vendor;

pub use base::{BaseBuilder, BuildOutcome, Bundler, JsonBaseBuilder};
pub use entry_point::{EntryPointGuard, EntryPointState, reexport_source};
pub use externals::{
    common_externals, compatibility_externals, extract_external_matchers, resolve_externals,
};
pub use orchestrator::{BuildContext, BuildReport, PluginBuilder, PreparedBuild};
pub use packaging::{append_packaging_steps, concat_step, zip_step};
pub use vendor::{VendorSplitPolicy, bundle_filename, loader_namespace};

// Re-export dependent crates
pub use async_trait::async_trait;
pub use plugpack_bundle;
pub use plugpack_core;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        BaseBuilder, BuildOutcome, BuildReport, Bundler, JsonBaseBuilder, PluginBuilder,
        PreparedBuild,
    };
    pub use async_trait::async_trait;
    pub use plugpack_core::prelude::*;
}
