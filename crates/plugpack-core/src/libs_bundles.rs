//! Library to bundle filename map shared within one build

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Bundle filenames recorded for split libraries during one build.
///
/// Cloning shares the same map: the vendor naming step records entries while
/// the bundler runs and the manifest transform reads them while archiving.
#[derive(Debug, Clone, Default)]
pub struct PluginLibsBundles {
    inner: Arc<Mutex<BTreeMap<String, String>>>,
}

impl PluginLibsBundles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the bundle filename of `library`, keeping the first recorded name
    pub fn record(&self, library: &str, filename: &str) -> String {
        self.inner
            .lock()
            .entry(library.to_string())
            .or_insert_with(|| filename.to_string())
            .clone()
    }

    /// Bundle filename recorded for `library`
    pub fn get(&self, library: &str) -> Option<String> {
        self.inner.lock().get(library).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Copy of the current entries
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.inner.lock().clone()
    }
}
