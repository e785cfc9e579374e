//! Runs the post-build plugin steps of a configuration.

use crate::archive::{ArchiveReport, write_archive};
use crate::concat::run_concat_step;
use crate::copy::run_copy_step;
use crate::BundleResult;
use plugpack_core::{BuildConfiguration, PluginStep};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What the post-build steps produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EmitReport {
    pub copied: Vec<PathBuf>,
    pub concatenated: Vec<PathBuf>,
    pub archive: Option<ArchiveReport>,
}

/// Run the copy, concat and zip steps of `config` against `output_dir`, in
/// configuration order. Other steps belong to the bundler and are skipped.
pub fn run_post_build_steps(
    config: &BuildConfiguration,
    output_dir: &Path,
) -> BundleResult<EmitReport> {
    let mut report = EmitReport::default();

    for step in &config.plugins {
        match step {
            PluginStep::Copy(copy) => report.copied.extend(run_copy_step(copy, output_dir)?),
            PluginStep::Concat(concat) => {
                report
                    .concatenated
                    .extend(run_concat_step(concat, output_dir)?);
            }
            PluginStep::Zip(zip) => report.archive = Some(write_archive(zip, output_dir)?),
            PluginStep::Compiler(_) | PluginStep::Other(_) => {}
        }
    }

    Ok(report)
}
