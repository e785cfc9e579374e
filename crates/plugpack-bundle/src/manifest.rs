//! Plugin manifest reading and rewriting.
//!
//! The manifest is read once when the build is configured (for its `urn`)
//! and rewritten later, while the copy step runs, once every vendor bundle
//! has its final name. Fields this module does not own are kept as they are,
//! in their original order.

use plugpack_core::{
    BuildOptions, ContentTransform, LibraryConfig, LibraryScope, MANIFEST_FILE, PackError,
    PackResult, PluginLibsBundles,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Manifest field holding the module-loader namespace.
pub const LOADER_NAMESPACE_FIELD: &str = "jsonpFunction";

/// Manifest field mapping host-provided libraries to their bundle files.
pub const EXTERNAL_LIBS_FIELD: &str = "externalLibs";

/// Manifest field mapping libraries shipped in the package to their bundle files.
pub const BUNDLED_LIBS_FIELD: &str = "bundledLibs";

/// A plugin's `manifest.json`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionManifest {
    fields: Map<String, Value>,
}

impl ExtensionManifest {
    /// Read and parse a manifest file
    pub fn read(path: impl AsRef<Path>) -> PackResult<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_slice(&bytes)
    }

    /// Parse manifest bytes. The manifest must be an object with a string `urn`.
    pub fn from_slice(bytes: &[u8]) -> PackResult<Self> {
        match serde_json::from_slice::<Value>(bytes)? {
            Value::Object(fields) => {
                let manifest = Self { fields };
                manifest.validate()?;
                Ok(manifest)
            }
            _ => Err(PackError::InvalidManifest(
                "manifest must be a JSON object".to_string(),
            )),
        }
    }

    fn validate(&self) -> PackResult<()> {
        match self.fields.get("urn") {
            Some(Value::String(urn)) if !urn.is_empty() => Ok(()),
            Some(_) => Err(PackError::InvalidManifest(
                "urn must be a non-empty string".to_string(),
            )),
            None => Err(PackError::InvalidManifest("urn is required".to_string())),
        }
    }

    /// Identifier of the plugin
    pub fn urn(&self) -> &str {
        self.fields
            .get("urn")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Any top-level field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn loader_namespace(&self) -> Option<&str> {
        self.fields.get(LOADER_NAMESPACE_FIELD).and_then(Value::as_str)
    }

    pub fn set_loader_namespace(&mut self, namespace: &str) {
        self.fields.insert(
            LOADER_NAMESPACE_FIELD.to_string(),
            Value::String(namespace.to_string()),
        );
    }

    /// Library to bundle file entries of `field`
    pub fn library_bundles(&self, field: &str) -> BTreeMap<String, String> {
        self.fields
            .get(field)
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Replace `field` with the given library to bundle file entries
    pub fn set_library_bundles(&mut self, field: &str, bundles: &BTreeMap<String, String>) {
        let map = bundles
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        self.fields.insert(field.to_string(), Value::Object(map));
    }

    /// Serialize to pretty JSON bytes
    pub fn to_vec(&self) -> PackResult<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(&self.fields)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

/// Rewrites the manifest with the names of the bundles emitted by the build.
#[derive(Debug, Clone)]
pub struct ManifestRewrite {
    libraries: BTreeMap<String, LibraryConfig>,
    bundles: PluginLibsBundles,
    loader_namespace: String,
}

impl ManifestRewrite {
    /// `bundles` must be the map the vendor naming step records into.
    pub fn new(options: &BuildOptions, bundles: PluginLibsBundles, loader_namespace: &str) -> Self {
        Self {
            libraries: options.libraries_config.clone(),
            bundles,
            loader_namespace: loader_namespace.to_string(),
        }
    }

    /// Rewrite raw manifest bytes.
    ///
    /// Every `external` library must have a recorded bundle; a `bundled`
    /// library without one was inlined and is left out.
    pub fn apply(&self, raw: &[u8]) -> PackResult<Vec<u8>> {
        let mut manifest = ExtensionManifest::from_slice(raw)?;
        manifest.set_loader_namespace(&self.loader_namespace);

        let mut external = BTreeMap::new();
        let mut bundled = BTreeMap::new();

        for (library, config) in &self.libraries {
            match config.scope {
                LibraryScope::External => {
                    let file = self.bundles.get(library).ok_or_else(|| {
                        PackError::UnresolvedLibraryBundle {
                            library: library.clone(),
                        }
                    })?;
                    external.insert(library.clone(), file);
                }
                LibraryScope::Bundled => match self.bundles.get(library) {
                    Some(file) => {
                        bundled.insert(library.clone(), file);
                    }
                    None => {
                        tracing::debug!(library = %library, "bundled library was not split, omitting from manifest");
                    }
                },
                LibraryScope::Internal => {}
            }
        }

        manifest.set_library_bundles(EXTERNAL_LIBS_FIELD, &external);
        manifest.set_library_bundles(BUNDLED_LIBS_FIELD, &bundled);

        tracing::debug!(
            urn = manifest.urn(),
            external = external.len(),
            bundled = bundled.len(),
            "manifest rewritten"
        );

        manifest.to_vec()
    }

    /// Copy transform rewriting `<context>/manifest.json` and passing every
    /// other file through, including `manifest.json` files in subdirectories.
    ///
    /// `context` must be spelled as the copy pattern spells it, since the copy
    /// step hands the transform paths joined onto the pattern's context.
    pub fn into_transform(self, context: &Path) -> ContentTransform {
        let manifest_path = context.join(MANIFEST_FILE);
        ContentTransform::new(move |contents, path| {
            if path == manifest_path {
                self.apply(contents)
            } else {
                Ok(contents.to_vec())
            }
        })
    }
}

#[cfg(test)]
#[path = "manifest/manifest_tests.rs"]
mod manifest_tests;
