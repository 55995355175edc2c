//! Graph change notifications.

use serde::{Deserialize, Serialize};

/// What kind of mutation produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Updated,
    Removed,
    Cleared,
    Replaced,
    /// Only the highlight overlay changed; topology and labels did not.
    Recolored,
}

impl ChangeKind {
    /// Whether dependents reading nodes or edges need to recompute.
    pub fn touches_graph(&self) -> bool {
        !matches!(self, Self::Recolored)
    }
}

/// Broadcast after every store mutation. Carries no diff: subscribers
/// re-read the store in full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEvent {
    /// Graph version after the mutation.
    pub version: u64,
    pub kind: ChangeKind,
}
