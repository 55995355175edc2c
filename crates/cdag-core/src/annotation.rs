//! Append-only node annotations.

use tracing::debug;

use crate::error::{DagError, DagResult};
use crate::graph::model::Id;
use crate::graph::GraphStore;

const BULLET: &str = "• ";

/// Append `text` to the node's title as a new bullet. Existing annotation
/// text is never replaced. Blank input is ignored and returns `false`.
pub fn annotate(store: &mut GraphStore, node_id: &Id, text: &str) -> DagResult<bool> {
    if text.trim().is_empty() {
        return Ok(false);
    }

    let mut node = store
        .get_node(node_id)
        .cloned()
        .ok_or_else(|| DagError::NodeNotFound(node_id.clone()))?;

    node.title = Some(append_bullet(node.title.as_deref(), text));
    store.update_node(node)?;

    debug!(node = %node_id, "Annotation appended");
    Ok(true)
}

fn append_bullet(existing: Option<&str>, text: &str) -> String {
    match existing {
        Some(prev) if !prev.is_empty() => format!("{}\n{}{}", prev, BULLET, text),
        _ => format!("{}{}", BULLET, text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::NodeDraft;

    fn store_with_node() -> (GraphStore, Id) {
        let mut store = GraphStore::new();
        let id = store.add_node(NodeDraft::labeled("Smoking")).unwrap();
        (store, id)
    }

    #[test]
    fn test_annotations_accumulate() {
        let (mut store, id) = store_with_node();
        assert!(annotate(&mut store, &id, "A").unwrap());
        assert!(annotate(&mut store, &id, "B").unwrap());
        assert_eq!(store.get_node(&id).unwrap().title.as_deref(), Some("• A\n• B"));
    }

    #[test]
    fn test_existing_title_is_kept() {
        let mut store = GraphStore::new();
        let id = store
            .add_node(NodeDraft {
                id: None,
                label: "Income".into(),
                title: Some("Household income [Smith 2020]".into()),
            })
            .unwrap();
        annotate(&mut store, &id, "check source").unwrap();
        assert_eq!(
            store.get_node(&id).unwrap().title.as_deref(),
            Some("Household income [Smith 2020]\n• check source")
        );
    }

    #[test]
    fn test_blank_is_noop() {
        let (mut store, id) = store_with_node();
        let version = store.version();
        assert!(!annotate(&mut store, &id, "   ").unwrap());
        assert_eq!(store.version(), version);
        assert!(store.get_node(&id).unwrap().title.is_none());
    }

    #[test]
    fn test_missing_node() {
        let mut store = GraphStore::new();
        assert!(matches!(
            annotate(&mut store, &Id::Int(1), "x"),
            Err(DagError::NodeNotFound(_))
        ));
    }
}
