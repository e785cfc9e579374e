//! Copy step emitter.

use crate::{BundleError, BundleResult};
use plugpack_core::{CopyPattern, CopyStep};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Copy every pattern of `step` into `output_dir`, applying its transform.
///
/// Returns the written files.
pub fn run_copy_step(step: &CopyStep, output_dir: &Path) -> BundleResult<Vec<PathBuf>> {
    let mut written = Vec::new();
    for pattern in &step.patterns {
        written.extend(copy_pattern(pattern, output_dir)?);
    }
    Ok(written)
}

fn copy_pattern(pattern: &CopyPattern, output_dir: &Path) -> BundleResult<Vec<PathBuf>> {
    // Glob patterns copy the whole context
    let source = if pattern.from.contains('*') {
        pattern.context.clone()
    } else {
        pattern.context.join(&pattern.from)
    };

    let target_root = match &pattern.to {
        Some(to) => output_dir.join(to),
        None => output_dir.to_path_buf(),
    };

    if source.is_file() {
        let name = source
            .file_name()
            .ok_or_else(|| BundleError::MissingSource(source.display().to_string()))?;
        let target = target_root.join(name);
        copy_file(pattern, &source, &target)?;
        return Ok(vec![target]);
    }

    if !source.is_dir() {
        return Err(BundleError::MissingSource(source.display().to_string()));
    }

    let mut written = Vec::new();
    for entry in WalkDir::new(&source).sort_by_file_name() {
        let entry = entry.map_err(|e| BundleError::WalkDir {
            path: source.display().to_string(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(&source)
            .map_err(|e| BundleError::WalkDir {
                path: entry.path().display().to_string(),
                message: e.to_string(),
            })?;
        let target = target_root.join(relative);
        copy_file(pattern, entry.path(), &target)?;
        written.push(target);
    }

    Ok(written)
}

fn copy_file(pattern: &CopyPattern, source: &Path, target: &Path) -> BundleResult<()> {
    let contents = fs::read(source)?;
    let contents = match &pattern.transform {
        Some(transform) => transform.apply(&contents, source)?,
        None => contents,
    };

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(target, contents)?;

    tracing::trace!(from = %source.display(), to = %target.display(), "copied asset");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use plugpack_core::ContentTransform;

    #[test]
    fn run_copy_step___directory_glob___copies_tree_with_transform() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::write(src.path().join("manifest.json"), b"{}").unwrap();
        fs::create_dir(src.path().join("i18n")).unwrap();
        fs::write(src.path().join("i18n/en.json"), b"{}").unwrap();

        let step = CopyStep {
            patterns: vec![CopyPattern {
                context: src.path().to_path_buf(),
                from: "**/*".into(),
                to: None,
                transform: Some(ContentTransform::new(|bytes, path| {
                    if path.ends_with("manifest.json") {
                        Ok(b"{\"rewritten\":true}".to_vec())
                    } else {
                        Ok(bytes.to_vec())
                    }
                })),
            }],
        };

        let written = run_copy_step(&step, out.path()).unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(
            fs::read(out.path().join("manifest.json")).unwrap(),
            b"{\"rewritten\":true}"
        );
        assert_eq!(fs::read(out.path().join("i18n/en.json")).unwrap(), b"{}");
    }

    #[test]
    fn run_copy_step___single_file___copies_into_target_dir() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::write(src.path().join("logo.png"), b"png").unwrap();

        let step = CopyStep {
            patterns: vec![CopyPattern {
                context: src.path().to_path_buf(),
                from: "logo.png".into(),
                to: Some("assets".into()),
                transform: None,
            }],
        };

        run_copy_step(&step, out.path()).unwrap();

        assert_eq!(fs::read(out.path().join("assets/logo.png")).unwrap(), b"png");
    }

    #[test]
    fn run_copy_step___missing_source___returns_error() {
        let out = tempfile::tempdir().unwrap();
        let step = CopyStep {
            patterns: vec![CopyPattern {
                context: out.path().join("nope"),
                from: "manifest.json".into(),
                to: None,
                transform: None,
            }],
        };

        let err = run_copy_step(&step, out.path()).unwrap_err();

        assert!(matches!(err, BundleError::MissingSource(_)));
    }
}
