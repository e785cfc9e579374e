//! Plan command implementation

use anyhow::{Context, Result};
use plugpack::{JsonBaseBuilder, PluginBuilder};
use plugpack_core::BuildOptions;
use std::path::{Path, PathBuf};

/// Derive the plugin configuration and return it as pretty JSON.
///
/// Planning patches the entry file like a real build does; it is restored
/// before this returns.
pub fn plan_configuration(options_path: &Path, base: &Path, root: &Path) -> Result<String> {
    let options = BuildOptions::from_file(options_path)
        .with_context(|| format!("Failed to load build options: {}", options_path.display()))?;

    let builder = PluginBuilder::new(root, Box::new(JsonBaseBuilder::new(base)));
    let mut prepared = builder
        .prepare(&options)
        .context("Failed to prepare plugin build")?;

    let json = prepared.config.to_json();
    prepared
        .restore()
        .context("Failed to restore entry point")?;

    tracing::debug!(state = %prepared.state(), "plan finished");
    json.context("Failed to serialize configuration")
}

/// Plan command implementation
pub fn run(
    options_path: &Path,
    base: &Path,
    root: Option<PathBuf>,
    out: Option<PathBuf>,
) -> Result<()> {
    let root = match root {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    let json = plan_configuration(options_path, base, &root)?;

    match out {
        Some(path) => {
            std::fs::write(&path, format!("{json}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "configuration written");
        }
        None => println!("{json}"),
    }

    Ok(())
}
