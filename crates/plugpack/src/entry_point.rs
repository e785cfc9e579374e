//! Entry-point patching
//!
//! A plugin build compiles an arbitrary module as the package's public
//! surface by temporarily replacing the project's entry file with a single
//! re-export. [`EntryPointGuard`] owns the captured original contents and
//! writes them back exactly once: explicitly through
//! [`EntryPointGuard::restore`], or on drop when the build errors, panics or
//! is cancelled.
//!
//! While a guard is alive its entry file is registered process-wide, so a
//! second build against the same file fails with
//! [`PackError::EntryPointInUse`] instead of capturing the patched contents.

use dashmap::DashSet;
use once_cell::sync::Lazy;
use plugpack_core::{PackError, PackResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Canonical paths of entry files currently held by a guard
static PATCHED_ENTRIES: Lazy<DashSet<PathBuf>> = Lazy::new(DashSet::new);

/// Registry slot for one entry file, released on drop.
#[derive(Debug)]
struct EntryLock {
    key: PathBuf,
}

impl EntryLock {
    fn acquire(path: &Path) -> PackResult<Self> {
        let key = fs::canonicalize(path)?;
        if !PATCHED_ENTRIES.insert(key.clone()) {
            return Err(PackError::EntryPointInUse(key.display().to_string()));
        }
        Ok(Self { key })
    }
}

impl Drop for EntryLock {
    fn drop(&mut self) {
        PATCHED_ENTRIES.remove(&self.key);
        tracing::trace!(entry = %self.key.display(), "entry point released");
    }
}

/// Synthetic entry source re-exporting `import_specifier`
pub fn reexport_source(import_specifier: &str) -> String {
    format!("export * from '{import_specifier}';")
}

/// Entry file contents captured before any mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPointState {
    pub path: PathBuf,
    pub original_contents: Vec<u8>,
}

/// Restores the entry file when dropped.
#[derive(Debug)]
pub struct EntryPointGuard {
    state: Option<EntryPointState>,
    lock: Option<EntryLock>,
}

impl EntryPointGuard {
    /// Read and keep the current contents of the entry file.
    ///
    /// Fails with [`PackError::EntryPointInUse`] while another guard holds
    /// the same file.
    pub fn capture(path: impl AsRef<Path>) -> PackResult<Self> {
        let path = path.as_ref().to_path_buf();
        let lock = EntryLock::acquire(&path)?;
        let original_contents = fs::read(&path)?;

        tracing::debug!(entry = %path.display(), bytes = original_contents.len(), "entry point captured");

        Ok(Self {
            state: Some(EntryPointState {
                path,
                original_contents,
            }),
            lock: Some(lock),
        })
    }

    /// Path of the captured entry file
    pub fn path(&self) -> Option<&Path> {
        self.state.as_ref().map(|s| s.path.as_path())
    }

    /// Overwrite the entry file with `contents`
    pub fn patch(&self, contents: &str) -> PackResult<()> {
        if let Some(state) = &self.state {
            fs::write(&state.path, contents)?;
            tracing::debug!(entry = %state.path.display(), "entry point patched");
        }
        Ok(())
    }

    /// Whether the original contents were already written back
    pub fn is_restored(&self) -> bool {
        self.state.is_none()
    }

    /// Write the original contents back and release the entry file. Later
    /// calls do nothing.
    pub fn restore(&mut self) -> PackResult<()> {
        let result = match self.state.take() {
            Some(state) => fs::write(&state.path, &state.original_contents)
                .map(|()| {
                    tracing::debug!(entry = %state.path.display(), "entry point restored");
                })
                .map_err(PackError::from),
            None => Ok(()),
        };
        self.lock = None;
        result
    }
}

impl Drop for EntryPointGuard {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            tracing::error!("Failed to restore entry point on drop: {}", e);
        }
    }
}
