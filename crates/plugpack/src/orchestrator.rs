//! Plugin build orchestration
//!
//! [`PluginBuilder::prepare`] derives the plugin configuration from the base
//! configuration and patches the entry file. [`PluginBuilder::run`] hands
//! the result to a [`Bundler`] and restores the entry file whatever the
//! outcome. Both track progress through [`BuildState`].

use crate::base::{BaseBuilder, Bundler};
use crate::entry_point::{EntryPointGuard, reexport_source};
use crate::externals::resolve_externals;
use crate::packaging::{MAIN_BUNDLE, append_packaging_steps};
use crate::vendor::{VendorSplitPolicy, loader_namespace};
use plugpack_bundle::{ExtensionManifest, ManifestRewrite};
use plugpack_core::{
    BuildConfiguration, BuildOptions, BuildState, CompilerStep, CopyStep, LibraryTarget,
    MANIFEST_FILE, ModulePath, PackError, PackResult, PluginLibsBundles, StepKind,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Entries of a single-page-app configuration a plugin has no use for.
pub const SPA_ENTRIES: [&str; 3] = ["polyfills", "polyfills-es5", "styles"];

/// Global object expression working in browsers and in Node.
pub const GLOBAL_OBJECT: &str = "(typeof self !== 'undefined' ? self : this)";

/// Per-build state shared by the transformation phases.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub module: ModulePath,
    pub options: BuildOptions,
    pub libs_bundles: PluginLibsBundles,
    state: BuildState,
}

impl BuildContext {
    pub fn new(module: ModulePath, options: BuildOptions) -> Self {
        Self {
            module,
            options,
            libs_bundles: PluginLibsBundles::new(),
            state: BuildState::Idle,
        }
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    fn advance(&mut self, target: BuildState) {
        debug_assert!(
            self.state.can_transition_to(target),
            "invalid build transition {} -> {}",
            self.state,
            target
        );
        tracing::debug!(from = %self.state, to = %target, "build state");
        self.state = target;
    }
}

/// A configuration ready for the bundler, with the entry file patched.
///
/// Dropping it restores the entry file.
#[derive(Debug)]
pub struct PreparedBuild {
    pub config: BuildConfiguration,
    context: BuildContext,
    entry: EntryPointGuard,
}

impl PreparedBuild {
    pub fn context(&self) -> &BuildContext {
        &self.context
    }

    pub fn state(&self) -> BuildState {
        self.context.state
    }

    /// Path of the patched entry file
    pub fn entry_path(&self) -> Option<&Path> {
        self.entry.path()
    }

    /// Write the original entry file back
    pub fn restore(&mut self) -> PackResult<()> {
        if self.context.state.is_terminal() {
            return Ok(());
        }
        self.entry.restore()?;
        self.context.advance(BuildState::Restored);
        Ok(())
    }

    fn mark_built(&mut self) {
        self.context.advance(BuildState::Built);
    }
}

/// Summary of a finished build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub state: BuildState,
    pub module: ModulePath,
    pub output_path: PathBuf,
    pub emitted: Vec<String>,
    /// Bundle filename of every library split out during the build
    pub libs_bundles: BTreeMap<String, String>,
}

/// Turns a base configuration into a plugin package build.
pub struct PluginBuilder {
    root: PathBuf,
    project_root: PathBuf,
    base: Box<dyn BaseBuilder>,
}

impl std::fmt::Debug for PluginBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginBuilder")
            .field("root", &self.root)
            .field("project_root", &self.project_root)
            .finish_non_exhaustive()
    }
}

impl PluginBuilder {
    pub fn new(root: impl Into<PathBuf>, base: Box<dyn BaseBuilder>) -> Self {
        let root = root.into();
        Self {
            project_root: root.clone(),
            root,
            base,
        }
    }

    pub fn with_project_root(mut self, project_root: impl Into<PathBuf>) -> Self {
        self.project_root = project_root.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Derive the plugin configuration and patch the entry file.
    ///
    /// Options are validated before anything is read or written. If a later
    /// phase fails the entry file is restored before the error is returned.
    pub fn prepare(&self, options: &BuildOptions) -> PackResult<PreparedBuild> {
        let module = options.validate()?;
        let mut context = BuildContext::new(module, options.normalized());

        let mut config =
            self.base
                .build_configuration(&self.root, &self.project_root, &context.options)?;
        context.advance(BuildState::ConfigBuilt);

        strip_spa_entries(&mut config);
        context.advance(BuildState::OptionsNormalized);

        config.externals = resolve_externals(&context.options);
        context.advance(BuildState::Externalized);

        if context.options.enable_runtime_dependency_management {
            self.configure_vendor(&mut config, &context)?;
            context.advance(BuildState::VendorConfigured);
        }

        let entry = self.patch_entry_point(&config, &context.module)?;
        context.advance(BuildState::EntryPatched);

        configure_output(&mut config, &context.module);
        reset_compiler_entry(&mut config, &context.module);
        append_packaging_steps(&mut config, &context.options);
        context.advance(BuildState::Packaged);

        Ok(PreparedBuild {
            config,
            context,
            entry,
        })
    }

    /// Prepare, delegate to `bundler` and restore the entry file.
    ///
    /// A bundler error is returned unchanged once the entry file is restored.
    /// If the returned future is dropped mid-build the entry file is restored
    /// by the guard it owns.
    pub async fn run(
        &self,
        options: &BuildOptions,
        bundler: &dyn Bundler,
    ) -> PackResult<BuildReport> {
        let mut prepared = self.prepare(options)?;

        tracing::info!(
            module = %prepared.context.module.export_name,
            output = %prepared.config.output.path.display(),
            "plugin build started"
        );

        let outcome = bundler.bundle(&prepared.config).await;
        prepared.mark_built();

        if let Err(e) = prepared.restore() {
            tracing::error!("Failed to restore entry point: {}", e);
            outcome?;
            return Err(e);
        }

        let outcome = outcome?;
        tracing::info!(
            files = outcome.emitted.len(),
            libraries = prepared.context.libs_bundles.len(),
            "plugin build finished"
        );

        Ok(BuildReport {
            state: prepared.state(),
            module: prepared.context.module.clone(),
            output_path: outcome.output_path,
            emitted: outcome.emitted,
            libs_bundles: prepared.context.libs_bundles.snapshot(),
        })
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_relative() {
            self.root.join(path)
        } else {
            path.to_path_buf()
        }
    }

    /// Namespace the chunk loader, split vendor bundles and hook the manifest
    /// rewrite onto the first copy pattern.
    fn configure_vendor(
        &self,
        config: &mut BuildConfiguration,
        context: &BuildContext,
    ) -> PackResult<()> {
        let copy = config.require_step_mut::<CopyStep>()?;
        let pattern = copy
            .patterns
            .first_mut()
            .ok_or(PackError::MissingStep {
                kind: StepKind::Copy,
            })?;

        let manifest_path = self.resolve(&pattern.context).join(MANIFEST_FILE);
        let manifest = ExtensionManifest::read(&manifest_path)?;
        let namespace = loader_namespace(&context.module.export_name, manifest.urn());

        pattern.transform = Some(
            ManifestRewrite::new(&context.options, context.libs_bundles.clone(), &namespace)
                .into_transform(&pattern.context),
        );

        tracing::debug!(
            manifest = %manifest_path.display(),
            namespace = %namespace,
            libraries = context.options.split_libraries().count(),
            "vendor split configured"
        );

        config.output.jsonp_function = Some(namespace);
        config.optimization.split_chunks = Some(
            VendorSplitPolicy::new(
                &context.options.libraries_config,
                context.libs_bundles.clone(),
            )
            .into_split_chunks(),
        );

        Ok(())
    }

    fn patch_entry_point(
        &self,
        config: &BuildConfiguration,
        module: &ModulePath,
    ) -> PackResult<EntryPointGuard> {
        let main = config
            .main_entry()
            .ok_or_else(|| PackError::MissingEntry("main".to_string()))?;

        let guard = EntryPointGuard::capture(self.resolve(main))?;
        guard.patch(&reexport_source(module.import_specifier()))?;
        Ok(guard)
    }
}

fn strip_spa_entries(config: &mut BuildConfiguration) {
    for name in SPA_ENTRIES {
        config.entry.remove(name);
    }
    config.optimization.runtime_chunk = None;
    config.optimization.split_chunks = None;
}

fn configure_output(config: &mut BuildConfiguration, module: &ModulePath) {
    config.output.filename = MAIN_BUNDLE.to_string();
    config.output.library = Some(module.export_name.clone());
    config.output.library_target = Some(LibraryTarget::Amd);
    config.output.global_object = Some(GLOBAL_OBJECT.to_string());
}

fn reset_compiler_entry(config: &mut BuildConfiguration, module: &ModulePath) {
    match config.step_mut::<CompilerStep>() {
        Some(compiler) => {
            compiler.entry_module = Some(module.import_specifier().to_string());
        }
        None => tracing::warn!("base configuration has no compiler step, entry module left as is"),
    }
}

#[cfg(test)]
#[path = "orchestrator/orchestrator_tests.rs"]
mod orchestrator_tests;
