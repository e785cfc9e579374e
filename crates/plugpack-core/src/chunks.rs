//! Chunk splitting model

use crate::PackResult;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// A module as seen by a chunk policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Absolute path of the module's source, when it has one
    pub resource: Option<PathBuf>,
}

impl ModuleInfo {
    pub fn new(resource: impl Into<PathBuf>) -> Self {
        Self {
            resource: Some(resource.into()),
        }
    }

    /// Package the module was installed from, taken from its last
    /// `node_modules` segment. Scoped packages keep their scope.
    pub fn package_name(&self) -> Option<String> {
        let resource = self.resource.as_ref()?.to_string_lossy().replace('\\', "/");
        let (_, rest) = resource.rsplit_once("node_modules/")?;

        let mut segments = rest.split('/').filter(|s| !s.is_empty());
        let first = segments.next()?;

        if first.starts_with('@') {
            let second = segments.next()?;
            Some(format!("{first}/{second}"))
        } else {
            Some(first.to_string())
        }
    }
}

/// Decides which modules go to a cache group and how its chunk is named.
pub trait ChunkPolicy: Send + Sync + std::fmt::Debug {
    /// Whether `module` belongs to this cache group
    fn test(&self, module: &ModuleInfo) -> bool;

    /// Output filename for the chunk holding `module`.
    ///
    /// `None` leaves naming to the bundler.
    fn name(&self, module: &ModuleInfo) -> PackResult<Option<String>>;
}

/// Which chunks a split applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkSelection {
    All,
    Async,
    Initial,
}

#[derive(Debug, Clone)]
pub struct CacheGroup {
    pub policy: Arc<dyn ChunkPolicy>,
}

impl Serialize for CacheGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("policy", &format!("{:?}", self.policy))?;
        map.end()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitChunks {
    pub chunks: ChunkSelection,
    pub cache_groups: BTreeMap<String, CacheGroup>,
}

impl SplitChunks {
    /// Cache group the module falls into, first by name order
    pub fn group_for(&self, module: &ModuleInfo) -> Option<(&str, &CacheGroup)> {
        self.cache_groups
            .iter()
            .find(|(_, group)| group.policy.test(module))
            .map(|(name, group)| (name.as_str(), group))
    }
}
