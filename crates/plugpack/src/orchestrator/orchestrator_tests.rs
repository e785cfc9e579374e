#![allow(non_snake_case)]

use super::*;
use plugpack_core::{
    ChunkPolicy, CopyPattern, ExternalMatcher, LibraryConfig, LibraryScope, ModuleInfo,
    PluginStep, StepKind,
};
use std::fs;
use tempfile::TempDir;

const ORIGINAL_MAIN: &str = "platformBrowserDynamic().bootstrapModule(AppModule);\n";
const MANIFEST: &str = r#"{"urn": "vmware:vcloud:plugin:foo", "name": "Foo", "version": "1.0.0"}"#;

/// Hands out a fixed configuration.
struct FixedBase(BuildConfiguration);

impl BaseBuilder for FixedBase {
    fn build_configuration(
        &self,
        _root: &Path,
        _project_root: &Path,
        _options: &BuildOptions,
    ) -> PackResult<BuildConfiguration> {
        Ok(self.0.clone())
    }
}

struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/assets")).unwrap();
        fs::write(dir.path().join("src/main.ts"), ORIGINAL_MAIN).unwrap();
        fs::write(dir.path().join("src/assets/manifest.json"), MANIFEST).unwrap();
        Self { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn main(&self) -> String {
        fs::read_to_string(self.root().join("src/main.ts")).unwrap()
    }

    fn base(&self) -> BuildConfiguration {
        let mut config = BuildConfiguration::default();
        config
            .entry
            .insert("main".into(), vec![PathBuf::from("src/main.ts")]);
        config
            .entry
            .insert("polyfills".into(), vec![PathBuf::from("src/polyfills.ts")]);
        config
            .entry
            .insert("polyfills-es5".into(), vec![PathBuf::from("src/es5.ts")]);
        config
            .entry
            .insert("styles".into(), vec![PathBuf::from("src/styles.css")]);
        config.output.path = self.root().join("dist");
        config.optimization.runtime_chunk = Some(serde_json::json!("single"));
        config.plugins.push(PluginStep::from(CopyStep {
            patterns: vec![CopyPattern {
                context: PathBuf::from("src/assets"),
                from: "**/*".into(),
                to: None,
                transform: None,
            }],
        }));
        config.plugins.push(PluginStep::from(CompilerStep {
            entry_module: Some("src/app/app.module#AppModule".into()),
            tsconfig: None,
        }));
        config
    }

    fn builder(&self, base: BuildConfiguration) -> PluginBuilder {
        PluginBuilder::new(self.root(), Box::new(FixedBase(base)))
    }
}

fn options(runtime_deps: bool) -> BuildOptions {
    let mut options = BuildOptions {
        module_path: Some("src/lib/foo.ts#FooModule".into()),
        enable_runtime_dependency_management: runtime_deps,
        delete_output_path: true,
        ..Default::default()
    };
    options.libraries_config.insert(
        "rxjs".into(),
        LibraryConfig::new(LibraryScope::External, "6.5.0"),
    );
    options
}

#[test]
fn prepare___strips_single_page_app_entries() {
    let project = Project::new();

    let prepared = project.builder(project.base()).prepare(&options(false)).unwrap();

    assert_eq!(
        prepared.config.entry.keys().collect::<Vec<_>>(),
        vec!["main"]
    );
    assert!(prepared.config.optimization.runtime_chunk.is_none());
    assert!(prepared.config.optimization.split_chunks.is_none());
}

#[test]
fn prepare___patches_entry_with_reexport() {
    let project = Project::new();

    let prepared = project.builder(project.base()).prepare(&options(false)).unwrap();

    assert_eq!(project.main(), "export * from 'src/lib/foo';");
    assert_eq!(prepared.state(), BuildState::Packaged);
    drop(prepared);
    assert_eq!(project.main(), ORIGINAL_MAIN);
}

#[test]
fn prepare___configures_amd_library_output() {
    let project = Project::new();

    let prepared = project.builder(project.base()).prepare(&options(false)).unwrap();
    let output = &prepared.config.output;

    assert_eq!(output.filename, "bundle.js");
    assert_eq!(output.library.as_deref(), Some("FooModule"));
    assert_eq!(output.library_target, Some(LibraryTarget::Amd));
    assert_eq!(output.global_object.as_deref(), Some(GLOBAL_OBJECT));
}

#[test]
fn prepare___resets_compiler_entry_module() {
    let project = Project::new();

    let prepared = project.builder(project.base()).prepare(&options(false)).unwrap();

    let compiler = prepared.config.step::<CompilerStep>().unwrap();
    assert_eq!(compiler.entry_module.as_deref(), Some("src/lib/foo"));
}

#[test]
fn prepare___without_compiler_step___succeeds() {
    let project = Project::new();
    let mut base = project.base();
    base.plugins.retain(|step| step.kind() != StepKind::Compiler);

    let prepared = project.builder(base).prepare(&options(false)).unwrap();

    assert!(prepared.config.step::<CompilerStep>().is_none());
}

#[test]
fn prepare___without_runtime_deps___legacy_externals_and_zip_only() {
    let project = Project::new();

    let prepared = project.builder(project.base()).prepare(&options(false)).unwrap();

    assert!(prepared.config.output.jsonp_function.is_none());
    assert_eq!(
        prepared.config.step_kinds(),
        vec![StepKind::Copy, StepKind::Compiler, StepKind::Zip]
    );
    assert!(
        prepared
            .config
            .externals
            .contains(&ExternalMatcher::pattern(r"^rxjs(/.+)?$"))
    );
}

#[test]
fn prepare___runtime_deps___namespaces_loader_from_manifest_urn() {
    let project = Project::new();

    let prepared = project.builder(project.base()).prepare(&options(true)).unwrap();

    assert_eq!(
        prepared.config.output.jsonp_function.as_deref(),
        Some("vcdJsonp#FooModule#vmware:vcloud:plugin:foo")
    );
    assert_eq!(
        prepared.config.step_kinds(),
        vec![
            StepKind::Copy,
            StepKind::Compiler,
            StepKind::Concat,
            StepKind::Zip
        ]
    );
    assert!(
        !prepared
            .config
            .externals
            .contains(&ExternalMatcher::pattern(r"^rxjs(/.+)?$"))
    );
}

#[test]
fn prepare___runtime_deps___installs_vendor_split_sharing_bundle_map() {
    let project = Project::new();

    let prepared = project.builder(project.base()).prepare(&options(true)).unwrap();
    let split = prepared.config.optimization.split_chunks.as_ref().unwrap();
    let module = ModuleInfo::new(project.root().join("node_modules/rxjs/index.js"));

    let (_, group) = split.group_for(&module).unwrap();
    let name = group.policy.name(&module).unwrap();

    assert_eq!(name.as_deref(), Some("rxjs@6.5.0.bundle.js"));
    assert_eq!(
        prepared.context().libs_bundles.get("rxjs").as_deref(),
        Some("rxjs@6.5.0.bundle.js")
    );
}

#[test]
fn prepare___runtime_deps___installs_manifest_transform_on_first_pattern() {
    let project = Project::new();

    let prepared = project.builder(project.base()).prepare(&options(true)).unwrap();
    prepared.context().libs_bundles.record("rxjs", "rxjs@6.5.0.bundle.js");

    let copy = prepared.config.step::<CopyStep>().unwrap();
    let transform = copy.patterns[0].transform.as_ref().unwrap();
    let rewritten = transform
        .apply(MANIFEST.as_bytes(), Path::new("src/assets/manifest.json"))
        .unwrap();
    let manifest: serde_json::Value = serde_json::from_slice(&rewritten).unwrap();

    assert_eq!(manifest["externalLibs"]["rxjs"], "rxjs@6.5.0.bundle.js");
    assert_eq!(
        manifest["jsonpFunction"],
        "vcdJsonp#FooModule#vmware:vcloud:plugin:foo"
    );
}

#[test]
fn prepare___missing_module_path___touches_nothing() {
    let project = Project::new();
    let mut options = options(true);
    options.module_path = None;

    let err = project
        .builder(project.base())
        .prepare(&options)
        .unwrap_err();

    assert!(matches!(err, PackError::MissingOption("modulePath")));
    assert!(err.is_configuration_error());
    assert_eq!(project.main(), ORIGINAL_MAIN);
}

#[test]
fn prepare___runtime_deps_without_copy_step___returns_missing_step() {
    let project = Project::new();
    let mut base = project.base();
    base.plugins.retain(|step| step.kind() != StepKind::Copy);

    let err = project.builder(base).prepare(&options(true)).unwrap_err();

    assert!(matches!(
        err,
        PackError::MissingStep {
            kind: StepKind::Copy
        }
    ));
    assert_eq!(project.main(), ORIGINAL_MAIN);
}

#[test]
fn prepare___without_main_entry___returns_missing_entry() {
    let project = Project::new();
    let mut base = project.base();
    base.entry.remove("main");

    let err = project.builder(base).prepare(&options(false)).unwrap_err();

    assert!(matches!(err, PackError::MissingEntry(ref name) if name == "main"));
}

#[test]
fn prepare___forces_delete_output_path_off() {
    let project = Project::new();

    let prepared = project.builder(project.base()).prepare(&options(false)).unwrap();

    assert!(!prepared.context().options.delete_output_path);
}

#[test]
fn PreparedBuild___restore___reaches_terminal_state_once() {
    let project = Project::new();
    let mut prepared = project.builder(project.base()).prepare(&options(false)).unwrap();

    prepared.restore().unwrap();
    prepared.restore().unwrap();

    assert_eq!(prepared.state(), BuildState::Restored);
    assert_eq!(project.main(), ORIGINAL_MAIN);
}
