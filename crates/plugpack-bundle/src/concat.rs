//! Concat step emitter.

use crate::BundleResult;
use plugpack_core::ConcatStep;
use std::fs;
use std::path::{Path, PathBuf};

/// Merge each entry's inputs, in order, into its output file.
///
/// Missing inputs are skipped. Inputs other than the output are removed once
/// merged. Entries with no existing input write nothing.
pub fn run_concat_step(step: &ConcatStep, output_dir: &Path) -> BundleResult<Vec<PathBuf>> {
    let mut written = Vec::new();

    for entry in &step.concat {
        let mut merged = Vec::new();
        let mut consumed = Vec::new();

        for input in &entry.inputs {
            let path = output_dir.join(input);
            if !path.is_file() {
                tracing::debug!(input = %input, "concat input not emitted, skipping");
                continue;
            }
            if !merged.is_empty() && !merged.ends_with(b"\n") {
                merged.push(b'\n');
            }
            merged.extend(fs::read(&path)?);
            if input != &entry.output {
                consumed.push(path);
            }
        }

        if merged.is_empty() && consumed.is_empty() {
            continue;
        }

        let output = output_dir.join(&entry.output);
        fs::write(&output, merged)?;
        for path in consumed {
            fs::remove_file(path)?;
        }

        tracing::debug!(output = %entry.output, "bundles concatenated");
        written.push(output);
    }

    Ok(written)
}
