//! cdag Core Library
//!
//! Client-side state for the causal diagram editor: the graph store and its
//! change bus, node annotations, causal query selection and the highlight
//! overlay derived from an adjustment set.

pub mod annotation;
pub mod error;
pub mod graph;
pub mod highlight;
pub mod papers;
pub mod project;
pub mod query;
pub mod selector;

pub use error::{DagError, DagResult};
pub use graph::model::{Edge, GraphContent, Id, Node, NodeDraft};
pub use graph::{ChangeKind, EdgeProposal, GraphEvent, GraphStore, PendingEdge};
pub use highlight::{compute_colors, ColorMap, NodeColor, NodeRole};
pub use query::{AdjustmentSet, CausalQuery, EffectType};
pub use selector::{SelectorOption, SelectorSync};
