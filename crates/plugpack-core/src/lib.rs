//! plugpack-core - Shared types for plugin package builds
//!
//! This crate provides the types every other plugpack crate speaks:
//! - [`BuildOptions`] caller options and [`ModulePath`] parsing
//! - [`BuildConfiguration`] bundler configuration with typed [`PluginStep`]s
//! - [`PluginLibsBundles`] library to bundle filename map
//! - [`BuildState`] for tracking one build invocation
//! - [`PackError`] for error handling

mod chunks;
mod config;
mod error;
mod libs_bundles;
mod lifecycle;
mod options;
mod pattern;
mod steps;

pub use chunks::{CacheGroup, ChunkPolicy, ChunkSelection, ModuleInfo, SplitChunks};
pub use config::{
    BuildConfiguration, ExternalMatcher, LibraryTarget, OptimizationConfig, OutputConfig,
};
pub use error::{PackError, PackResult};
pub use libs_bundles::PluginLibsBundles;
pub use lifecycle::BuildState;
pub use options::{
    BuildOptions, ExternalLib, ExtraEntry, FileReplacement, LibraryConfig, LibraryScope,
    ModulePath,
};
pub use pattern::LazyRegex;
pub use steps::{
    CompilerStep, ConcatEntry, ConcatStep, ContentTransform, CopyPattern, CopyStep, ExcludeRule,
    OtherStep, PluginStep, StepKind, StepVariant, ZipStep,
};

/// Manifest file name in the plugin's public assets.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        BuildConfiguration, BuildOptions, BuildState, LibraryConfig, LibraryScope, ModulePath,
        PackError, PackResult, PluginLibsBundles, PluginStep, StepKind,
    };
}
