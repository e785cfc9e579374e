//! Typed plugin steps of a build configuration
//!
//! The base configuration and this core only talk about plugin steps through
//! the closed [`PluginStep`] enum. Lookups go through [`StepVariant`], so a
//! missing step is reported by kind instead of being guessed from its shape.

use crate::{LazyRegex, PackResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Kinds of plugin step this core knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    /// Copies static assets (including `manifest.json`) into the output
    Copy,
    /// Ahead-of-time template compiler
    Compiler,
    /// Concatenates emitted bundles
    Concat,
    /// Writes the output directory into an archive
    Zip,
    /// Anything else the base builder installs
    Other,
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepKind::Copy => write!(f, "copy"),
            StepKind::Compiler => write!(f, "compiler"),
            StepKind::Concat => write!(f, "concat"),
            StepKind::Zip => write!(f, "zip"),
            StepKind::Other => write!(f, "other"),
        }
    }
}

/// A post-processing step in the configuration's plugin list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PluginStep {
    Copy(CopyStep),
    Compiler(CompilerStep),
    Concat(ConcatStep),
    Zip(ZipStep),
    Other(OtherStep),
}

impl PluginStep {
    pub fn kind(&self) -> StepKind {
        match self {
            PluginStep::Copy(_) => StepKind::Copy,
            PluginStep::Compiler(_) => StepKind::Compiler,
            PluginStep::Concat(_) => StepKind::Concat,
            PluginStep::Zip(_) => StepKind::Zip,
            PluginStep::Other(_) => StepKind::Other,
        }
    }
}

/// Access to one variant of [`PluginStep`] by its payload type.
pub trait StepVariant: Sized {
    const KIND: StepKind;

    fn from_step(step: &PluginStep) -> Option<&Self>;

    fn from_step_mut(step: &mut PluginStep) -> Option<&mut Self>;
}

macro_rules! step_variant {
    ($ty:ty, $variant:ident) => {
        impl StepVariant for $ty {
            const KIND: StepKind = StepKind::$variant;

            fn from_step(step: &PluginStep) -> Option<&Self> {
                match step {
                    PluginStep::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn from_step_mut(step: &mut PluginStep) -> Option<&mut Self> {
                match step {
                    PluginStep::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }

        impl From<$ty> for PluginStep {
            fn from(step: $ty) -> Self {
                PluginStep::$variant(step)
            }
        }
    };
}

step_variant!(CopyStep, Copy);
step_variant!(CompilerStep, Compiler);
step_variant!(ConcatStep, Concat);
step_variant!(ZipStep, Zip);

/// Rewrites a file's bytes while it is being copied.
///
/// Called with the file contents and its source path.
#[derive(Clone)]
pub struct ContentTransform(Arc<dyn Fn(&[u8], &Path) -> PackResult<Vec<u8>> + Send + Sync>);

impl ContentTransform {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[u8], &Path) -> PackResult<Vec<u8>> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn apply(&self, contents: &[u8], path: &Path) -> PackResult<Vec<u8>> {
        (self.0)(contents, path)
    }
}

impl std::fmt::Debug for ContentTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ContentTransform(..)")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CopyStep {
    pub patterns: Vec<CopyPattern>,
}

/// One copy instruction: `from` (file or directory) relative to `context`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyPattern {
    pub context: PathBuf,
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip)]
    pub transform: Option<ContentTransform>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_module: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tsconfig: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcatStep {
    pub concat: Vec<ConcatEntry>,
}

/// Files merged, in order, into `output`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcatEntry {
    pub inputs: Vec<String>,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZipStep {
    pub filename: String,
    #[serde(default)]
    pub exclude: Vec<ExcludeRule>,
}

impl ZipStep {
    /// Whether the output file at `relative_path` is left out of the archive
    pub fn excludes(&self, relative_path: &str) -> PackResult<bool> {
        for rule in &self.exclude {
            if rule.matches(relative_path)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// A rule removing output files from the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExcludeRule {
    /// Regular expression matched against the relative path
    Pattern(LazyRegex),
    /// Exact file name or relative path
    File(String),
}

impl ExcludeRule {
    pub fn matches(&self, relative_path: &str) -> PackResult<bool> {
        match self {
            ExcludeRule::Pattern(pattern) => pattern.is_match(relative_path),
            ExcludeRule::File(name) => Ok(relative_path == name
                || relative_path.rsplit('/').next() == Some(name.as_str())),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OtherStep {
    pub name: String,
    #[serde(default)]
    pub options: serde_json::Value,
}
