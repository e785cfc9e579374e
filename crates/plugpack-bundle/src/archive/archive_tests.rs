#![allow(non_snake_case)]

use super::*;
use plugpack_core::{ExcludeRule, LazyRegex};
use std::io::Read;
use zip::ZipArchive;

fn plugin_step() -> ZipStep {
    ZipStep {
        filename: "plugin.zip".into(),
        exclude: vec![
            ExcludeRule::Pattern(LazyRegex::new(r"\.html$")),
            ExcludeRule::File("rxjs@6.5.0.bundle.js".into()),
        ],
    }
}

fn read_entry(archive: &Path, name: &str) -> String {
    let mut zip = ZipArchive::new(File::open(archive).unwrap()).unwrap();
    let mut file = zip.by_name(name).unwrap();
    let mut contents = String::new();
    file.read_to_string(&mut contents).unwrap();
    contents
}

#[test]
fn write_archive___applies_exclusions() {
    let out = tempfile::tempdir().unwrap();
    fs::write(out.path().join("bundle.js"), "main();").unwrap();
    fs::write(out.path().join("index.html"), "<html>").unwrap();
    fs::write(out.path().join("manifest.json"), "{}").unwrap();
    fs::write(out.path().join("rxjs@6.5.0.bundle.js"), "rx();").unwrap();

    let report = write_archive(&plugin_step(), out.path()).unwrap();

    assert_eq!(report.entries, vec!["bundle.js", "manifest.json"]);
    assert_eq!(
        report.excluded,
        vec!["index.html", "rxjs@6.5.0.bundle.js"]
    );
    assert_eq!(read_entry(&report.path, "bundle.js"), "main();");
}

#[test]
fn write_archive___nested_files_use_forward_slashes() {
    let out = tempfile::tempdir().unwrap();
    fs::create_dir_all(out.path().join("assets/i18n")).unwrap();
    fs::write(out.path().join("assets/i18n/en.json"), "{}").unwrap();

    let report = write_archive(&plugin_step(), out.path()).unwrap();

    assert_eq!(report.entries, vec!["assets/i18n/en.json"]);
}

#[test]
fn write_archive___rerun___does_not_include_previous_archive() {
    let out = tempfile::tempdir().unwrap();
    fs::write(out.path().join("bundle.js"), "main();").unwrap();

    write_archive(&plugin_step(), out.path()).unwrap();
    let report = write_archive(&plugin_step(), out.path()).unwrap();

    assert_eq!(report.entries, vec!["bundle.js"]);
}

#[test]
fn write_archive___reports_archive_checksum() {
    let out = tempfile::tempdir().unwrap();
    fs::write(out.path().join("bundle.js"), "main();").unwrap();

    let report = write_archive(&plugin_step(), out.path()).unwrap();

    assert_eq!(report.sha256, compute_sha256(&fs::read(&report.path).unwrap()));
    assert_eq!(report.sha256.len(), 64);
}

#[test]
fn write_archive___malformed_exclude_pattern___fails() {
    let out = tempfile::tempdir().unwrap();
    fs::write(out.path().join("bundle.js"), "main();").unwrap();
    let step = ZipStep {
        filename: "plugin.zip".into(),
        exclude: vec![ExcludeRule::Pattern(LazyRegex::new("("))],
    };

    let err = write_archive(&step, out.path()).unwrap_err();

    assert!(matches!(err, BundleError::Pack(_)));
}
