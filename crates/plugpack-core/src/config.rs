//! Bundler configuration model
//!
//! [`BuildConfiguration`] is produced by a base builder and then edited in
//! place by the plugin transformation. Fields the transformation never reads
//! back are deleted before the steps that depend on what remains.

use crate::chunks::SplitChunks;
use crate::steps::{PluginStep, StepVariant};
use crate::{LazyRegex, PackError, PackResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub use crate::steps::StepKind;

/// Complete configuration handed to the bundler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfiguration {
    /// Named entry chunks and their source files
    #[serde(default)]
    pub entry: BTreeMap<String, Vec<PathBuf>>,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub optimization: OptimizationConfig,

    /// External matchers; the first matching entry wins
    #[serde(default)]
    pub externals: Vec<ExternalMatcher>,

    /// Plugin steps, run in order
    #[serde(default)]
    pub plugins: Vec<PluginStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    #[serde(default)]
    pub path: PathBuf,

    #[serde(default)]
    pub filename: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_target: Option<LibraryTarget>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_object: Option<String>,

    /// Global callback name the chunk loader registers chunks through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonp_function: Option<String>,
}

/// Module format of the emitted library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryTarget {
    Var,
    Amd,
    Umd,
    Commonjs2,
    Module,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_chunk: Option<serde_json::Value>,

    /// Never read from a base configuration
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub split_chunks: Option<SplitChunks>,
}

/// Decides whether an import is left to the host environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalMatcher {
    /// Any request matching the pattern is external under its own name
    Pattern(LazyRegex),
    /// Listed module names are external under the given global alias
    Mapping(BTreeMap<String, String>),
}

impl ExternalMatcher {
    pub fn pattern(source: impl Into<String>) -> Self {
        ExternalMatcher::Pattern(LazyRegex::new(source))
    }

    pub fn alias(module: impl Into<String>, global: impl Into<String>) -> Self {
        ExternalMatcher::Mapping(BTreeMap::from([(module.into(), global.into())]))
    }

    /// Name the request resolves to when this matcher externalizes it
    pub fn resolve(&self, request: &str) -> PackResult<Option<String>> {
        match self {
            ExternalMatcher::Pattern(pattern) => Ok(pattern
                .is_match(request)?
                .then(|| request.to_string())),
            ExternalMatcher::Mapping(map) => Ok(map.get(request).cloned()),
        }
    }
}

impl BuildConfiguration {
    /// Resolve `request` against the externals, first match wins
    pub fn resolve_external(&self, request: &str) -> PackResult<Option<String>> {
        for matcher in &self.externals {
            if let Some(name) = matcher.resolve(request)? {
                return Ok(Some(name));
            }
        }
        Ok(None)
    }

    /// First step of type `T`, if any
    pub fn step<T: StepVariant>(&self) -> Option<&T> {
        self.plugins.iter().find_map(T::from_step)
    }

    /// First step of type `T`, or [`PackError::MissingStep`]
    pub fn require_step_mut<T: StepVariant>(&mut self) -> PackResult<&mut T> {
        self.plugins
            .iter_mut()
            .find_map(T::from_step_mut)
            .ok_or(PackError::MissingStep { kind: T::KIND })
    }

    /// First step of type `T`, if any
    pub fn step_mut<T: StepVariant>(&mut self) -> Option<&mut T> {
        self.plugins.iter_mut().find_map(T::from_step_mut)
    }

    /// Kinds of the plugin steps, in order
    pub fn step_kinds(&self) -> Vec<StepKind> {
        self.plugins.iter().map(PluginStep::kind).collect()
    }

    /// Source file of the `main` entry
    pub fn main_entry(&self) -> Option<&PathBuf> {
        self.entry.get("main").and_then(|files| files.first())
    }

    /// Load a configuration from JSON
    pub fn from_json(json: &str) -> PackResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> PackResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
