//! The document property chain.
//!
//! RizomUV stores its document data as a small fixed tree:
//!
//! ```text
//! RizomUV (Int)
//! ├── Scene (Blob)
//! └── UVSets (String)
//!     └── UVMap (String)
//!         └── RootGroup (Blob)
//! ```
//!
//! Links are listed parent-before-child, which is also the order the
//! extractor writes them in.

use serde::{Deserialize, Serialize};

use crate::container::ValueKind;

/// One level of the document chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainLink {
    pub name: &'static str,
    /// Kind used when the container holds no value for this link.
    pub kind: ValueKind,
    /// Index of the parent link; `None` for the root.
    pub parent: Option<usize>,
}

pub const DOCUMENT_CHAIN: [ChainLink; 5] = [
    ChainLink { name: "RizomUV", kind: ValueKind::Integer, parent: None },
    ChainLink { name: "Scene", kind: ValueKind::Bytes, parent: Some(0) },
    ChainLink { name: "UVSets", kind: ValueKind::Text, parent: Some(0) },
    ChainLink { name: "UVMap", kind: ValueKind::Text, parent: Some(2) },
    ChainLink { name: "RootGroup", kind: ValueKind::Bytes, parent: Some(3) },
];

/// What to do with a link that has no recorded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainPolicy {
    /// Create the property anyway, leaving it without a value.
    #[default]
    AlwaysBuild,
    /// Skip links with no recorded value. A descendant with a recorded value
    /// then has no parent to be created under and ends up
    /// [`LinkState::Invalid`]; one without a value is itself skipped.
    SkipMissing,
}

/// Per-link injection outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    #[default]
    NotAttempted,
    /// Property exists on the target; `value_set` tells whether data was applied.
    Valid { value_set: bool },
    /// Creation failed, usually because the parent link is invalid.
    Invalid,
    /// Not created under [`ChainPolicy::SkipMissing`].
    Skipped,
}

impl LinkState {
    #[inline]
    pub fn is_valid(self) -> bool {
        matches!(self, LinkState::Valid { .. })
    }
}

/// States of all chain links after injection, indexed like [`DOCUMENT_CHAIN`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChainOutcome {
    pub states: [LinkState; DOCUMENT_CHAIN.len()],
}

impl ChainOutcome {
    pub fn state(&self, name: &str) -> Option<LinkState> {
        DOCUMENT_CHAIN
            .iter()
            .position(|l| l.name == name)
            .map(|i| self.states[i])
    }

    /// Number of links that received a value.
    pub fn values_set(&self) -> usize {
        self.states
            .iter()
            .filter(|s| matches!(s, LinkState::Valid { value_set: true }))
            .count()
    }
}
