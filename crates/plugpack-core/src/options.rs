//! Caller-supplied build options

use crate::{PackError, PackResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Options for a single plugin build.
///
/// Keys are camelCase on the wire. Sequence and map fields accept `null`
/// and treat it as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildOptions {
    /// Module exported by the plugin, in `path/to/file.ts#ExportName` form
    pub module_path: Option<String>,

    /// Skip every built-in external (common and compatibility sets)
    pub ignore_default_externals: bool,

    /// Split configured libraries into their own bundles and let the host load them
    #[serde(
        rename = "enableRuntimeDependecyManagement",
        alias = "enableRuntimeDependencyManagement"
    )]
    pub enable_runtime_dependency_management: bool,

    /// Additional externals appended after the built-in ones
    #[serde(deserialize_with = "null_as_default")]
    pub external_libs: Vec<ExternalLib>,

    /// Per-library scope and version, keyed by package name
    #[serde(deserialize_with = "null_as_default")]
    pub libraries_config: BTreeMap<String, LibraryConfig>,

    #[serde(deserialize_with = "null_as_default")]
    pub file_replacements: Vec<FileReplacement>,

    #[serde(deserialize_with = "null_as_default")]
    pub styles: Vec<ExtraEntry>,

    #[serde(deserialize_with = "null_as_default")]
    pub scripts: Vec<ExtraEntry>,

    /// Always forced off for plugin builds
    pub delete_output_path: bool,
}

/// An external declared by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalLib {
    /// Regular expression source matched against module requests
    Pattern(String),
    /// Explicit module name to global alias mapping
    Mapping(BTreeMap<String, String>),
}

/// Where a library's code lives at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryScope {
    /// Provided by the host platform; its bundle is left out of the package
    External,
    /// Split into its own bundle and shipped inside the package
    Bundled,
    /// Inlined into the main bundle
    Internal,
}

impl LibraryScope {
    /// Whether modules of this library go to a separate vendor bundle
    pub fn is_split(&self) -> bool {
        !matches!(self, LibraryScope::Internal)
    }
}

impl std::fmt::Display for LibraryScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LibraryScope::External => write!(f, "external"),
            LibraryScope::Bundled => write!(f, "bundled"),
            LibraryScope::Internal => write!(f, "internal"),
        }
    }
}

/// Scope and version of one library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryConfig {
    pub scope: LibraryScope,
    pub version: String,
}

impl LibraryConfig {
    pub fn new(scope: LibraryScope, version: impl Into<String>) -> Self {
        Self {
            scope,
            version: version.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReplacement {
    pub replace: String,
    pub with: String,
}

/// A global style or script entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtraEntry {
    Path(String),
    #[serde(rename_all = "camelCase")]
    Detailed {
        input: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bundle_name: Option<String>,
        #[serde(default = "default_inject")]
        inject: bool,
    },
}

fn default_inject() -> bool {
    true
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parsed `file#ExportName` module reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePath {
    /// Source file, relative to the project, extension included
    pub file: String,
    /// Exported module name; also the output library name
    pub export_name: String,
}

impl ModulePath {
    /// Parse a `file#ExportName` reference.
    pub fn parse(raw: &str) -> PackResult<Self> {
        let (file, export_name) = raw.split_once('#').ok_or_else(|| PackError::InvalidOption {
            option: "modulePath",
            reason: format!("expected `file#ExportName`, got `{raw}`"),
        })?;

        let file = file.trim();
        let export_name = export_name.trim();

        if file.is_empty() {
            return Err(PackError::InvalidOption {
                option: "modulePath",
                reason: "file part is empty".to_string(),
            });
        }

        if export_name.is_empty() || export_name.contains('#') {
            return Err(PackError::InvalidOption {
                option: "modulePath",
                reason: format!("invalid export name in `{raw}`"),
            });
        }

        Ok(Self {
            file: file.to_string(),
            export_name: export_name.to_string(),
        })
    }

    /// The file reference with its extension stripped, as used in an import.
    pub fn import_specifier(&self) -> &str {
        let name_start = self.file.rfind('/').map_or(0, |i| i + 1);
        match self.file[name_start..].rfind('.') {
            Some(dot) if dot > 0 => &self.file[..name_start + dot],
            _ => &self.file,
        }
    }
}

impl BuildOptions {
    /// Load options from a `.json` or `.toml` file
    pub fn from_file(path: impl AsRef<Path>) -> PackResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "Loading build options");

        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            _ => Self::from_json(&content),
        }
    }

    /// Parse options from JSON
    pub fn from_json(json: &str) -> PackResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate the options and parse the module reference.
    ///
    /// Touches nothing on disk, so a failure here leaves the project as it was.
    pub fn validate(&self) -> PackResult<ModulePath> {
        let raw = self
            .module_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .ok_or(PackError::MissingOption("modulePath"))?;

        let module = ModulePath::parse(raw)?;

        for (name, config) in &self.libraries_config {
            if name.is_empty() {
                return Err(PackError::InvalidOption {
                    option: "librariesConfig",
                    reason: "library name is empty".to_string(),
                });
            }
            if config.scope.is_split() && config.version.trim().is_empty() {
                return Err(PackError::InvalidOption {
                    option: "librariesConfig",
                    reason: format!("library {name} has no version"),
                });
            }
        }

        Ok(module)
    }

    /// Copy of these options with plugin-build invariants applied
    pub fn normalized(&self) -> Self {
        Self {
            delete_output_path: false,
            ..self.clone()
        }
    }

    /// Look up the configuration of a library
    pub fn library(&self, name: &str) -> Option<&LibraryConfig> {
        self.libraries_config.get(name)
    }

    /// Libraries whose code is supplied by the host at runtime
    pub fn external_libraries(&self) -> impl Iterator<Item = (&str, &LibraryConfig)> {
        self.libraries_config
            .iter()
            .filter(|(_, c)| c.scope == LibraryScope::External)
            .map(|(n, c)| (n.as_str(), c))
    }

    /// Libraries split out of the main bundle
    pub fn split_libraries(&self) -> impl Iterator<Item = (&str, &LibraryConfig)> {
        self.libraries_config
            .iter()
            .filter(|(_, c)| c.scope.is_split())
            .map(|(n, c)| (n.as_str(), c))
    }
}
