//! Graph domain models.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Label given to nodes created without one.
pub const DEFAULT_NODE_LABEL: &str = "New Node";

/// Opaque node or edge identifier.
///
/// Backends hand out either integers (generated graphs) or strings
/// (ids assigned by the editor), so both are accepted and preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Int(i64),
    Str(String),
}

impl Id {
    /// Fresh store-assigned identifier.
    pub fn generate() -> Self {
        Self::Str(Uuid::new_v4().to_string())
    }

    /// Parse user input, preferring the integer form.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        match s.parse::<i64>() {
            Ok(n) => Self::Int(n),
            Err(_) => Self::Str(s.to_string()),
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

/// A labeled causal variable.
///
/// Display color is not part of the node; it lives in the store's
/// overlay map so it is never persisted with project content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default = "Id::generate")]
    pub id: Id,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<Id>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            title: None,
        }
    }
}

/// A directed causal relationship. Parallel edges and confirmed
/// self-loops are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default = "Id::generate")]
    pub id: Id,
    pub from: Id,
    pub to: Id,
}

impl Edge {
    pub fn new(id: impl Into<Id>, from: impl Into<Id>, to: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// Partial node handed to `GraphStore::add_node`.
#[derive(Debug, Clone, Default)]
pub struct NodeDraft {
    pub id: Option<Id>,
    pub label: String,
    pub title: Option<String>,
}

impl NodeDraft {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }
}

/// Serializable graph content, as exchanged with the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphContent {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl GraphContent {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}
