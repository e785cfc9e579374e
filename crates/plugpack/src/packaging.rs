//! Packaging step assembly
//!
//! Appends, in order, the optional concat step and the archive step. The
//! archive's exclusion list is computed from the options before the build
//! runs.

use crate::vendor::{DEFAULT_VENDOR_BUNDLE, bundle_filename};
use plugpack_core::{
    BuildConfiguration, BuildOptions, ConcatEntry, ConcatStep, ExcludeRule, LazyRegex, PluginStep,
    ZipStep,
};

/// Main bundle filename.
pub const MAIN_BUNDLE: &str = "bundle.js";

/// Package filename.
pub const ARCHIVE_FILE: &str = "plugin.zip";

/// Markup output never enters the package.
pub const MARKUP_EXCLUDE: &str = r"\.html$";

/// Step merging the vendor chunk into the main bundle
pub fn concat_step() -> ConcatStep {
    ConcatStep {
        concat: vec![ConcatEntry {
            inputs: vec![MAIN_BUNDLE.to_string(), DEFAULT_VENDOR_BUNDLE.to_string()],
            output: MAIN_BUNDLE.to_string(),
        }],
    }
}

/// Bundle files of libraries the host provides
pub fn excluded_library_bundles(options: &BuildOptions) -> Vec<String> {
    options
        .external_libraries()
        .map(|(name, config)| bundle_filename(name, &config.version))
        .collect()
}

/// Step writing the package archive
pub fn zip_step(options: &BuildOptions) -> ZipStep {
    let mut exclude = vec![ExcludeRule::Pattern(LazyRegex::new(MARKUP_EXCLUDE))];
    exclude.extend(
        excluded_library_bundles(options)
            .into_iter()
            .map(ExcludeRule::File),
    );

    ZipStep {
        filename: ARCHIVE_FILE.to_string(),
        exclude,
    }
}

/// Append the packaging steps for `options` to `config`.
pub fn append_packaging_steps(config: &mut BuildConfiguration, options: &BuildOptions) {
    if options.enable_runtime_dependency_management {
        config.plugins.push(PluginStep::from(concat_step()));
    }
    config.plugins.push(PluginStep::from(zip_step(options)));

    tracing::debug!(steps = ?config.step_kinds(), "packaging steps appended");
}
