//! Check command implementation

use anyhow::{Context, Result};
use plugpack::packaging::excluded_library_bundles;
use plugpack::{loader_namespace, resolve_externals};
use plugpack_bundle::ExtensionManifest;
use plugpack_core::{BuildOptions, LibraryScope, ModulePath};
use std::path::Path;

/// What a valid options file describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsSummary {
    pub module: ModulePath,
    pub runtime_dependency_management: bool,
    pub externals: usize,
    pub external_libraries: Vec<String>,
    pub bundled_libraries: Vec<String>,
    pub excluded_bundles: Vec<String>,
}

/// Validate `options` and summarize the build they describe
pub fn summarize(options: &BuildOptions) -> Result<OptionsSummary> {
    let module = options.validate().context("Invalid build options")?;

    let libraries_in = |scope: LibraryScope| {
        options
            .libraries_config
            .iter()
            .filter(|(_, config)| config.scope == scope)
            .map(|(name, config)| format!("{name}@{}", config.version))
            .collect::<Vec<_>>()
    };

    Ok(OptionsSummary {
        module,
        runtime_dependency_management: options.enable_runtime_dependency_management,
        externals: resolve_externals(options).len(),
        external_libraries: libraries_in(LibraryScope::External),
        bundled_libraries: libraries_in(LibraryScope::Bundled),
        excluded_bundles: excluded_library_bundles(options),
    })
}

/// Check command implementation
pub fn run(options_path: &Path, manifest: Option<&Path>) -> Result<()> {
    println!("Checking build options: {}", options_path.display());

    let options = BuildOptions::from_file(options_path)
        .with_context(|| format!("Failed to load build options: {}", options_path.display()))?;
    let summary = summarize(&options)?;

    println!(
        "✓ Module: {} from {}",
        summary.module.export_name, summary.module.file
    );
    println!(
        "✓ Runtime dependency management: {}",
        if summary.runtime_dependency_management {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!("✓ Externals: {}", summary.externals);
    println!("✓ External libraries: {}", summary.external_libraries.len());
    for lib in &summary.external_libraries {
        println!("    {lib}");
    }
    println!("✓ Bundled libraries: {}", summary.bundled_libraries.len());
    for lib in &summary.bundled_libraries {
        println!("    {lib}");
    }
    if !summary.excluded_bundles.is_empty() {
        println!("✓ Left out of plugin.zip: {}", summary.excluded_bundles.join(", "));
    }

    if let Some(path) = manifest {
        let manifest = ExtensionManifest::read(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        println!("✓ Manifest: {}", manifest.urn());
        if summary.runtime_dependency_management {
            println!(
                "✓ Loader namespace: {}",
                loader_namespace(&summary.module.export_name, manifest.urn())
            );
        }
    }

    println!("\nBuild options are valid!");
    Ok(())
}
