//! Build invocation state machine

use serde::{Deserialize, Serialize};

/// Phases of one plugin build.
///
/// State transitions:
/// ```text
/// Idle → ConfigBuilt → OptionsNormalized → Externalized ─┬→ VendorConfigured ─┐
///                                                        └────────────────────┴→ EntryPatched
/// EntryPatched → Packaged → Built → Restored
///            EntryPatched, Packaged → Restored (preparation failed)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildState {
    /// Nothing has happened yet
    #[default]
    Idle,
    /// The base builder returned a configuration
    ConfigBuilt,
    /// Single-page-app entries were stripped and options normalized
    OptionsNormalized,
    /// Externals are installed
    Externalized,
    /// Vendor split and manifest hook are installed
    VendorConfigured,
    /// The entry file holds the synthetic re-export
    EntryPatched,
    /// Output, concat and archive steps are configured
    Packaged,
    /// The underlying build returned, successfully or not
    Built,
    /// The entry file holds its original contents again
    Restored,
}

impl BuildState {
    /// Check if this state can transition to the target state
    pub fn can_transition_to(&self, target: BuildState) -> bool {
        use BuildState::*;
        matches!(
            (self, target),
            (Idle, ConfigBuilt)
                | (ConfigBuilt, OptionsNormalized)
                | (OptionsNormalized, Externalized)
                | (Externalized, VendorConfigured)
                | (Externalized, EntryPatched)
                | (VendorConfigured, EntryPatched)
                | (EntryPatched, Packaged)
                | (Packaged, Built)
                | (Built, Restored)
                // Preparation failed after the entry was patched
                | (EntryPatched, Restored)
                | (Packaged, Restored)
        )
    }

    /// Whether the entry file currently holds synthetic contents
    pub fn entry_patched(&self) -> bool {
        matches!(
            self,
            BuildState::EntryPatched | BuildState::Packaged | BuildState::Built
        )
    }

    /// Check if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, BuildState::Restored)
    }
}

impl std::fmt::Display for BuildState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildState::Idle => write!(f, "Idle"),
            BuildState::ConfigBuilt => write!(f, "ConfigBuilt"),
            BuildState::OptionsNormalized => write!(f, "OptionsNormalized"),
            BuildState::Externalized => write!(f, "Externalized"),
            BuildState::VendorConfigured => write!(f, "VendorConfigured"),
            BuildState::EntryPatched => write!(f, "EntryPatched"),
            BuildState::Packaged => write!(f, "Packaged"),
            BuildState::Built => write!(f, "Built"),
            BuildState::Restored => write!(f, "Restored"),
        }
    }
}
