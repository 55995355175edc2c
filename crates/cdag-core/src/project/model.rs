//! Project and suggestion models.

use serde::{Deserialize, Serialize};

use crate::graph::model::GraphContent;

/// A named, persisted graph snapshot. Saving under an existing name
/// overwrites it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Backend row id, present in listings only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub content: GraphContent,
}

/// A node template offered to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub label: String,
    #[serde(default)]
    pub annotation: String,
}
