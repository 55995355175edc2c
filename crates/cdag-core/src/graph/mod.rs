//! Canonical node/edge collections with change notification.

pub mod events;
pub mod model;

use std::collections::HashSet;

use tokio::sync::broadcast;
use tracing::debug;

use crate::error::{DagError, DagResult};
use crate::highlight::{ColorMap, NodeColor, NodeRole};
pub use events::{ChangeKind, GraphEvent};
use model::{Edge, GraphContent, Id, Node, NodeDraft, DEFAULT_NODE_LABEL};

const EVENT_CAPACITY: usize = 64;

/// Result of asking the store to create an edge.
#[derive(Debug)]
#[must_use]
pub enum EdgeProposal {
    /// The edge was created.
    Created(Id),
    /// Self-loop: nothing changed until the caller commits or cancels.
    NeedsConfirmation(PendingEdge),
}

/// A self-loop edge waiting for explicit user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct PendingEdge {
    from: Id,
    to: Id,
}

impl PendingEdge {
    pub fn source(&self) -> &Id {
        &self.from
    }

    pub fn target(&self) -> &Id {
        &self.to
    }
}

/// In-memory graph state for one editor instance.
///
/// Every mutation bumps the version counter (except overlay updates) and
/// broadcasts a `GraphEvent` to subscribers.
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    colors: ColorMap,
    version: u64,
    tx: broadcast::Sender<GraphEvent>,
}

impl GraphStore {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_CAPACITY);
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            colors: ColorMap::new(),
            version: 0,
            tx,
        }
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<GraphEvent> {
        self.tx.subscribe()
    }

    /// Monotonic counter of graph (non-overlay) mutations.
    pub fn version(&self) -> u64 {
        self.version
    }

    fn notify(&mut self, kind: ChangeKind) {
        if kind.touches_graph() {
            self.version += 1;
        }
        debug!(version = self.version, ?kind, "Graph changed");
        // No subscribers is fine.
        let _ = self.tx.send(GraphEvent {
            version: self.version,
            kind,
        });
    }

    /// Add a node, assigning an id and default label when absent.
    ///
    /// While a highlight is shown the new node gets the default color.
    pub fn add_node(&mut self, draft: NodeDraft) -> DagResult<Id> {
        let id = draft.id.unwrap_or_else(Id::generate);
        if self.contains_node(&id) {
            return Err(DagError::DuplicateId(id));
        }

        let label = if draft.label.trim().is_empty() {
            DEFAULT_NODE_LABEL.to_string()
        } else {
            draft.label
        };

        self.nodes.push(Node {
            id: id.clone(),
            label,
            title: draft.title,
        });
        if !self.colors.is_empty() {
            self.colors.insert(id.clone(), NodeRole::Default.color());
        }
        self.notify(ChangeKind::Added);
        Ok(id)
    }

    /// Create an edge between existing nodes.
    ///
    /// Self-loops are not created here; they come back as a
    /// `PendingEdge` for `commit_edge` or `cancel_edge`.
    pub fn add_edge(&mut self, from: &Id, to: &Id) -> DagResult<EdgeProposal> {
        self.check_endpoints(from, to)?;

        if from == to {
            debug!(node = %from, "Self-loop requires confirmation");
            return Ok(EdgeProposal::NeedsConfirmation(PendingEdge {
                from: from.clone(),
                to: to.clone(),
            }));
        }

        Ok(EdgeProposal::Created(self.insert_edge(from.clone(), to.clone())))
    }

    /// Create a previously proposed edge after the user confirmed it.
    pub fn commit_edge(&mut self, pending: PendingEdge) -> DagResult<Id> {
        // The node may have been removed while the prompt was open.
        self.check_endpoints(&pending.from, &pending.to)?;
        Ok(self.insert_edge(pending.from, pending.to))
    }

    /// Drop a proposed edge. The graph is unchanged.
    pub fn cancel_edge(&mut self, pending: PendingEdge) {
        debug!(from = %pending.from, to = %pending.to, "Edge proposal declined");
    }

    fn insert_edge(&mut self, from: Id, to: Id) -> Id {
        let id = Id::generate();
        self.edges.push(Edge {
            id: id.clone(),
            from,
            to,
        });
        self.notify(ChangeKind::Added);
        id
    }

    fn check_endpoints(&self, from: &Id, to: &Id) -> DagResult<()> {
        for endpoint in [from, to] {
            if !self.contains_node(endpoint) {
                return Err(DagError::DanglingEndpoint(endpoint.clone()));
            }
        }
        Ok(())
    }

    /// Replace a node's label and title, matched by id.
    pub fn update_node(&mut self, node: Node) -> DagResult<()> {
        let slot = self
            .nodes
            .iter_mut()
            .find(|n| n.id == node.id)
            .ok_or_else(|| DagError::NodeNotFound(node.id.clone()))?;
        *slot = node;
        self.notify(ChangeKind::Updated);
        Ok(())
    }

    /// Replace an edge's endpoints, matched by id.
    ///
    /// An edge cannot be turned into a self-loop here; those go through
    /// `add_edge` and `commit_edge`.
    pub fn update_edge(&mut self, edge: Edge) -> DagResult<()> {
        self.check_endpoints(&edge.from, &edge.to)?;
        let slot = self
            .edges
            .iter_mut()
            .find(|e| e.id == edge.id)
            .ok_or_else(|| DagError::EdgeNotFound(edge.id.clone()))?;
        if edge.is_self_loop() && !slot.is_self_loop() {
            return Err(DagError::validation(
                "Self-loops must be confirmed before they are created",
            ));
        }
        *slot = edge;
        self.notify(ChangeKind::Updated);
        Ok(())
    }

    /// Remove nodes and edges with the given ids. Edges touching a removed
    /// node go with it. Returns how many elements were removed.
    pub fn remove(&mut self, ids: &[Id]) -> usize {
        let ids: HashSet<&Id> = ids.iter().collect();
        let before = self.nodes.len() + self.edges.len();

        let removed_nodes: HashSet<Id> = self
            .nodes
            .iter()
            .filter(|n| ids.contains(&n.id))
            .map(|n| n.id.clone())
            .collect();

        self.nodes.retain(|n| !removed_nodes.contains(&n.id));
        self.edges.retain(|e| {
            !ids.contains(&e.id)
                && !removed_nodes.contains(&e.from)
                && !removed_nodes.contains(&e.to)
        });
        self.colors.retain(|id, _| !removed_nodes.contains(id));

        let removed = before - (self.nodes.len() + self.edges.len());
        if removed > 0 {
            self.notify(ChangeKind::Removed);
        }
        removed
    }

    /// Remove everything, including the highlight overlay.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.colors.clear();
        self.notify(ChangeKind::Cleared);
    }

    /// Swap in new content in one step. On error the store is untouched.
    ///
    /// Endpoints are not checked: backend content is authoritative and
    /// the renderer tolerates dangling edges.
    pub fn replace_all(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) -> DagResult<()> {
        let mut seen = HashSet::with_capacity(nodes.len());
        for node in &nodes {
            if !seen.insert(&node.id) {
                return Err(DagError::DuplicateId(node.id.clone()));
            }
        }

        self.nodes = nodes;
        self.edges = edges;
        self.colors.clear();
        self.notify(ChangeKind::Replaced);
        Ok(())
    }

    /// `replace_all` from serialized content.
    pub fn load(&mut self, content: GraphContent) -> DagResult<()> {
        self.replace_all(content.nodes, content.edges)
    }

    pub fn get_node(&self, id: &Id) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn get_edge(&self, id: &Id) -> Option<&Edge> {
        self.edges.iter().find(|e| &e.id == id)
    }

    pub fn contains_node(&self, id: &Id) -> bool {
        self.get_node(id).is_some()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Snapshot of the persistent content. The overlay is never included.
    pub fn content(&self) -> GraphContent {
        GraphContent::new(self.nodes.clone(), self.edges.clone())
    }

    /// Replace the highlight overlay wholesale. Entries for unknown ids
    /// are dropped.
    pub fn apply_colors(&mut self, colors: ColorMap) {
        self.colors = colors
            .into_iter()
            .filter(|(id, _)| self.nodes.iter().any(|n| &n.id == id))
            .collect();
        self.notify(ChangeKind::Recolored);
    }

    pub fn colors(&self) -> &ColorMap {
        &self.colors
    }

    pub fn color_of(&self, id: &Id) -> Option<&NodeColor> {
        self.colors.get(id)
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}
