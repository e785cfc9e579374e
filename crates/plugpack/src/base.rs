//! Collaborator interfaces
//!
//! The plugin build composes over two collaborators it does not implement:
//! a base builder producing a standard single-page-app configuration, and
//! the bundler that executes a configuration.

use async_trait::async_trait;
use plugpack_core::{BuildConfiguration, BuildOptions, PackResult};
use std::path::{Path, PathBuf};

/// Produces the standard configuration a plugin build starts from.
pub trait BaseBuilder: Send + Sync {
    /// Build the base configuration for the project at `project_root`.
    ///
    /// `root` is the workspace root. Both paths are passed through unchanged.
    fn build_configuration(
        &self,
        root: &Path,
        project_root: &Path,
        options: &BuildOptions,
    ) -> PackResult<BuildConfiguration>;
}

/// Reads the base configuration from a JSON file.
#[derive(Debug, Clone)]
pub struct JsonBaseBuilder {
    path: PathBuf,
}

impl JsonBaseBuilder {
    /// `path` is resolved against the workspace root when relative.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BaseBuilder for JsonBaseBuilder {
    fn build_configuration(
        &self,
        root: &Path,
        project_root: &Path,
        _options: &BuildOptions,
    ) -> PackResult<BuildConfiguration> {
        let path = root.join(&self.path);
        let json = std::fs::read_to_string(&path)?;
        let mut config = BuildConfiguration::from_json(&json)?;

        if config.output.path.as_os_str().is_empty() {
            config.output.path = project_root.join("dist");
        } else if config.output.path.is_relative() {
            config.output.path = root.join(&config.output.path);
        }

        tracing::debug!(
            base = %path.display(),
            entries = config.entry.len(),
            steps = config.plugins.len(),
            "base configuration loaded"
        );
        Ok(config)
    }
}

/// What the bundler produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOutcome {
    pub output_path: PathBuf,
    /// Files written to the output directory, relative to it
    pub emitted: Vec<String>,
}

/// Executes a prepared configuration.
///
/// Implementations run the compilation and every plugin step of the
/// configuration, including the manifest transform installed on the copy
/// step. Dropping the returned future cancels the build.
#[async_trait]
pub trait Bundler: Send + Sync {
    async fn bundle(&self, config: &BuildConfiguration) -> PackResult<BuildOutcome>;
}
