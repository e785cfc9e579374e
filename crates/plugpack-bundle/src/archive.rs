//! Archive step emitter.
//!
//! Writes everything the build emitted into a single deflated zip, leaving
//! out the files matched by the step's exclusion rules.

use crate::{BundleError, BundleResult};
use plugpack_core::ZipStep;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Result of writing a plugin archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveReport {
    /// Path of the written archive
    pub path: PathBuf,
    /// Archive entry names, in the order written
    pub entries: Vec<String>,
    /// Files left out by exclusion rules
    pub excluded: Vec<String>,
    /// SHA256 of the archive file, hex encoded
    pub sha256: String,
}

/// Write `output_dir` into the archive described by `step`.
pub fn write_archive(step: &ZipStep, output_dir: &Path) -> BundleResult<ArchiveReport> {
    let archive_path = output_dir.join(&step.filename);

    let mut files = Vec::new();
    let mut excluded = Vec::new();

    for entry in WalkDir::new(output_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| BundleError::WalkDir {
            path: output_dir.display().to_string(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = relative_name(output_dir, entry.path())?;
        if relative == step.filename {
            continue;
        }
        if step.excludes(&relative)? {
            excluded.push(relative);
            continue;
        }
        files.push((relative, entry.into_path()));
    }

    let file = File::create(&archive_path)?;
    let mut zip = ZipWriter::new(file);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut entries = Vec::with_capacity(files.len());
    for (name, path) in files {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(&fs::read(&path)?)?;
        entries.push(name);
    }
    zip.finish()?;

    let sha256 = compute_sha256(&fs::read(&archive_path)?);

    tracing::info!(
        archive = %archive_path.display(),
        entries = entries.len(),
        excluded = excluded.len(),
        "plugin archive written"
    );

    Ok(ArchiveReport {
        path: archive_path,
        entries,
        excluded,
        sha256,
    })
}

/// Forward-slash path of `path` relative to `root`
fn relative_name(root: &Path, path: &Path) -> BundleResult<String> {
    let relative = path.strip_prefix(root).map_err(|e| BundleError::WalkDir {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    Ok(relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/"))
}

/// Compute SHA256 hash of data and return as hex string.
pub fn compute_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
#[path = "archive/archive_tests.rs"]
mod archive_tests;
