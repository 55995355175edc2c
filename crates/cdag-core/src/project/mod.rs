//! Named projects and node suggestions.

pub mod model;

pub use model::{Project, Suggestion};

use crate::error::{DagError, DagResult};
use crate::graph::model::{GraphContent, Id, NodeDraft};
use crate::graph::GraphStore;

/// Build a project for saving. The name must not be blank.
pub fn new_project(name: &str, content: GraphContent) -> DagResult<Project> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DagError::validation("Please provide a project name"));
    }
    Ok(Project {
        id: None,
        name: name.to_string(),
        content,
    })
}

/// Add a suggested node, carrying its annotation as the title.
pub fn add_suggestion(store: &mut GraphStore, suggestion: &Suggestion) -> DagResult<Id> {
    let title = Some(suggestion.annotation.clone()).filter(|a| !a.is_empty());
    store.add_node(NodeDraft {
        id: None,
        label: suggestion.label.clone(),
        title,
    })
}
