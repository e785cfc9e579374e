#![allow(non_snake_case)]

use super::*;

const MANIFEST: &str = r#"{
    "urn": "vmware:vcloud:plugin:foo",
    "name": "Foo",
    "version": "1.0.0",
    "module": "FooModule"
}"#;

fn options_with(libraries: &[(&str, LibraryScope, &str)]) -> BuildOptions {
    let mut options = BuildOptions {
        module_path: Some("src/foo.ts#FooModule".into()),
        enable_runtime_dependency_management: true,
        ..Default::default()
    };
    for (name, scope, version) in libraries {
        options
            .libraries_config
            .insert(name.to_string(), LibraryConfig::new(*scope, *version));
    }
    options
}

// Reading

#[test]
fn ExtensionManifest___from_slice___reads_urn() {
    let manifest = ExtensionManifest::from_slice(MANIFEST.as_bytes()).unwrap();

    assert_eq!(manifest.urn(), "vmware:vcloud:plugin:foo");
    assert_eq!(manifest.get("name"), Some(&Value::String("Foo".into())));
}

#[test]
fn ExtensionManifest___without_urn___rejects() {
    let err = ExtensionManifest::from_slice(br#"{"name": "Foo"}"#).unwrap_err();

    assert!(matches!(err, PackError::InvalidManifest(_)));
}

#[test]
fn ExtensionManifest___non_object___rejects() {
    let err = ExtensionManifest::from_slice(b"[]").unwrap_err();

    assert!(err.to_string().contains("JSON object"));
}

#[test]
fn ExtensionManifest___read___loads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(MANIFEST_FILE);
    std::fs::write(&path, MANIFEST).unwrap();

    let manifest = ExtensionManifest::read(&path).unwrap();

    assert_eq!(manifest.urn(), "vmware:vcloud:plugin:foo");
}

// Rewriting

#[test]
fn ManifestRewrite___apply___sets_namespace_and_external_bundle() {
    let options = options_with(&[("rxjs", LibraryScope::External, "6.5.0")]);
    let bundles = PluginLibsBundles::new();
    bundles.record("rxjs", "rxjs@6.5.0.bundle.js");
    let rewrite = ManifestRewrite::new(&options, bundles, "vcdJsonp#FooModule#urn");

    let out = rewrite.apply(MANIFEST.as_bytes()).unwrap();

    let manifest = ExtensionManifest::from_slice(&out).unwrap();
    assert_eq!(manifest.loader_namespace(), Some("vcdJsonp#FooModule#urn"));
    assert_eq!(
        manifest
            .library_bundles(EXTERNAL_LIBS_FIELD)
            .get("rxjs")
            .map(String::as_str),
        Some("rxjs@6.5.0.bundle.js")
    );
    assert!(manifest.library_bundles(BUNDLED_LIBS_FIELD).is_empty());
}

#[test]
fn ManifestRewrite___external_library_never_split___surfaces_inconsistency() {
    let options = options_with(&[("rxjs", LibraryScope::External, "6.5.0")]);
    let rewrite = ManifestRewrite::new(&options, PluginLibsBundles::new(), "ns");

    let err = rewrite.apply(MANIFEST.as_bytes()).unwrap_err();

    assert!(matches!(
        err,
        PackError::UnresolvedLibraryBundle { ref library } if library == "rxjs"
    ));
}

#[test]
fn ManifestRewrite___bundled_library___goes_to_bundled_field_only() {
    let options = options_with(&[
        ("rxjs", LibraryScope::External, "6.5.0"),
        ("@scope/widgets", LibraryScope::Bundled, "2.1.0"),
        ("tslib", LibraryScope::Internal, "1.0.0"),
    ]);
    let bundles = PluginLibsBundles::new();
    bundles.record("rxjs", "rxjs@6.5.0.bundle.js");
    bundles.record("@scope/widgets", "@scope__widgets@2.1.0.bundle.js");
    let rewrite = ManifestRewrite::new(&options, bundles, "ns");

    let manifest =
        ExtensionManifest::from_slice(&rewrite.apply(MANIFEST.as_bytes()).unwrap()).unwrap();

    let external = manifest.library_bundles(EXTERNAL_LIBS_FIELD);
    let bundled = manifest.library_bundles(BUNDLED_LIBS_FIELD);
    assert_eq!(external.keys().collect::<Vec<_>>(), vec!["rxjs"]);
    assert_eq!(bundled.keys().collect::<Vec<_>>(), vec!["@scope/widgets"]);
    assert!(!external.contains_key("tslib") && !bundled.contains_key("tslib"));
}

#[test]
fn ManifestRewrite___bundled_library_not_split___is_omitted() {
    let options = options_with(&[("@scope/widgets", LibraryScope::Bundled, "2.1.0")]);
    let rewrite = ManifestRewrite::new(&options, PluginLibsBundles::new(), "ns");

    let manifest =
        ExtensionManifest::from_slice(&rewrite.apply(MANIFEST.as_bytes()).unwrap()).unwrap();

    assert!(manifest.library_bundles(BUNDLED_LIBS_FIELD).is_empty());
}

#[test]
fn ManifestRewrite___apply___keeps_unowned_fields_in_order() {
    let options = options_with(&[]);
    let rewrite = ManifestRewrite::new(&options, PluginLibsBundles::new(), "ns");

    let out = rewrite.apply(MANIFEST.as_bytes()).unwrap();

    let value: Value = serde_json::from_slice(&out).unwrap();
    let keys: Vec<&str> = value
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(&keys[..4], &["urn", "name", "version", "module"]);
}

#[test]
fn ManifestRewrite___reads_bundles_recorded_after_creation() {
    let options = options_with(&[("rxjs", LibraryScope::External, "6.5.0")]);
    let bundles = PluginLibsBundles::new();
    let rewrite = ManifestRewrite::new(&options, bundles.clone(), "ns");

    bundles.record("rxjs", "rxjs@6.5.0.bundle.js");

    assert!(rewrite.apply(MANIFEST.as_bytes()).is_ok());
}

#[test]
fn ManifestRewrite___transform___passes_other_files_through() {
    let options = options_with(&[("rxjs", LibraryScope::External, "6.5.0")]);
    let transform = ManifestRewrite::new(&options, PluginLibsBundles::new(), "ns")
        .into_transform(Path::new("assets"));

    let out = transform
        .apply(b"not json", Path::new("assets/logo.svg"))
        .unwrap();

    assert_eq!(out, b"not json");
}

#[test]
fn ManifestRewrite___transform___rewrites_manifest_at_context_root() {
    let options = options_with(&[("rxjs", LibraryScope::External, "6.5.0")]);
    let bundles = PluginLibsBundles::new();
    bundles.record("rxjs", "rxjs@6.5.0.bundle.js");
    let transform = ManifestRewrite::new(&options, bundles, "ns").into_transform(Path::new("assets"));

    let out = transform
        .apply(MANIFEST.as_bytes(), Path::new("assets/manifest.json"))
        .unwrap();
    let manifest: Value = serde_json::from_slice(&out).unwrap();

    assert_eq!(manifest[EXTERNAL_LIBS_FIELD]["rxjs"], "rxjs@6.5.0.bundle.js");
    assert_eq!(manifest[LOADER_NAMESPACE_FIELD], "ns");
}

#[test]
fn ManifestRewrite___transform___nested_manifest_passes_through() {
    let options = options_with(&[("rxjs", LibraryScope::External, "6.5.0")]);
    let bundles = PluginLibsBundles::new();
    bundles.record("rxjs", "rxjs@6.5.0.bundle.js");
    let transform = ManifestRewrite::new(&options, bundles, "ns").into_transform(Path::new("assets"));
    let nested = br#"{"title": "Translations"}"#;

    let out = transform
        .apply(nested, Path::new("assets/i18n/manifest.json"))
        .unwrap();

    assert_eq!(out, nested);
}
