//! Vendor split policy
//!
//! Routes every module of a configured, non-internal library to its own
//! bundle named `<library>@<version>.bundle.js` and records that name so the
//! manifest rewrite can find it once archiving starts.

use plugpack_core::{
    CacheGroup, ChunkPolicy, ChunkSelection, LibraryConfig, ModuleInfo, PackError, PackResult,
    PluginLibsBundles, SplitChunks,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Replaces path separators of scoped package names in bundle filenames.
pub const LIB_SEPARATOR: &str = "__";

/// Prefix of the module-loader namespace.
pub const LOADER_NAMESPACE_PREFIX: &str = "vcdJsonp";

/// Name the bundler gives the vendor chunk of the main entry.
pub const DEFAULT_VENDOR_BUNDLE: &str = "vendors~main.bundle.js";

/// Cache group the policy is installed under.
pub const VENDOR_CACHE_GROUP: &str = "vendor";

/// Library name with path separators replaced by [`LIB_SEPARATOR`]
pub fn escape_library_name(library: &str) -> String {
    library.replace(['/', '\\'], LIB_SEPARATOR)
}

/// Bundle filename of a library at a version
pub fn bundle_filename(library: &str, version: &str) -> String {
    format!("{}@{version}.bundle.js", escape_library_name(library))
}

/// Unique chunk-loader callback name for one plugin.
///
/// Keeps plugins loaded into the same host page from registering chunks
/// through each other's callback.
pub fn loader_namespace(export_name: &str, urn: &str) -> String {
    format!("{LOADER_NAMESPACE_PREFIX}#{export_name}#{urn}")
}

/// Splits configured libraries out of the main bundle.
#[derive(Debug, Clone)]
pub struct VendorSplitPolicy {
    libraries: BTreeMap<String, LibraryConfig>,
    bundles: PluginLibsBundles,
}

impl VendorSplitPolicy {
    /// `bundles` receives every name this policy hands out.
    pub fn new(libraries: &BTreeMap<String, LibraryConfig>, bundles: PluginLibsBundles) -> Self {
        Self {
            libraries: libraries.clone(),
            bundles,
        }
    }

    /// Library configuration governing `module`
    pub fn library_for(&self, module: &ModuleInfo) -> Option<(String, &LibraryConfig)> {
        let package = module.package_name()?;
        let config = self.libraries.get(&package)?;
        Some((package, config))
    }

    /// Install this policy as the configuration's only cache group
    pub fn into_split_chunks(self) -> SplitChunks {
        SplitChunks {
            chunks: ChunkSelection::All,
            cache_groups: BTreeMap::from([(
                VENDOR_CACHE_GROUP.to_string(),
                CacheGroup {
                    policy: Arc::new(self),
                },
            )]),
        }
    }
}

impl ChunkPolicy for VendorSplitPolicy {
    fn test(&self, module: &ModuleInfo) -> bool {
        self.library_for(module)
            .is_some_and(|(_, config)| config.scope.is_split())
    }

    fn name(&self, module: &ModuleInfo) -> PackResult<Option<String>> {
        let Some(package) = module.package_name() else {
            return Ok(None);
        };

        let config = self
            .libraries
            .get(&package)
            .filter(|config| config.scope.is_split())
            .ok_or_else(|| PackError::UnknownLibrary(package.clone()))?;

        let filename = self
            .bundles
            .record(&package, &bundle_filename(&package, &config.version));

        tracing::trace!(library = %package, bundle = %filename, "vendor bundle named");
        Ok(Some(filename))
    }
}

#[cfg(test)]
#[path = "vendor/vendor_tests.rs"]
mod vendor_tests;
