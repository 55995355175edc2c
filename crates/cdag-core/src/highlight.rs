//! Highlight overlay derived from a causal query.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::graph::model::{Id, Node};
use crate::query::{AdjustmentSet, CausalQuery};

/// Overlay color for every node, keyed by node id.
pub type ColorMap = HashMap<Id, NodeColor>;

/// Background/border pair applied to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeColor {
    pub background: &'static str,
    pub border: &'static str,
}

/// Role a node plays in the current query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Default,
    Adjustment,
    Cause,
    Outcome,
}

impl NodeRole {
    pub fn color(&self) -> NodeColor {
        match self {
            Self::Default => NodeColor {
                background: "#97C2FC",
                border: "#2B7CE9",
            },
            Self::Adjustment => NodeColor {
                background: "#FB7E81",
                border: "#FA0A10",
            },
            Self::Cause => NodeColor {
                background: "#7BE141",
                border: "#41A906",
            },
            Self::Outcome => NodeColor {
                background: "#6E6EFD",
                border: "#0000FF",
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Adjustment => "adjustment",
            Self::Cause => "cause",
            Self::Outcome => "outcome",
        }
    }
}

/// Assign a role to every node. Later rules win:
/// default, then adjustment (excluding causes and outcome), then causes,
/// then the outcome unless it is itself a cause.
pub fn compute_roles(
    nodes: &[Node],
    query: &CausalQuery,
    adjustment: &AdjustmentSet,
) -> HashMap<Id, NodeRole> {
    let causes: HashSet<&Id> = query.causes.iter().collect();
    let outcome = query.outcome.as_ref();

    let mut roles: HashMap<Id, NodeRole> = nodes
        .iter()
        .map(|n| (n.id.clone(), NodeRole::Default))
        .collect();

    for id in adjustment.iter() {
        if causes.contains(id) || outcome == Some(id) {
            continue;
        }
        if let Some(role) = roles.get_mut(id) {
            *role = NodeRole::Adjustment;
        }
    }

    for id in &query.causes {
        if let Some(role) = roles.get_mut(id) {
            *role = NodeRole::Cause;
        }
    }

    if let Some(outcome) = outcome {
        if !causes.contains(outcome) {
            if let Some(role) = roles.get_mut(outcome) {
                *role = NodeRole::Outcome;
            }
        }
    }

    roles
}

/// Color map for the whole graph. Pure: neither input is modified.
pub fn compute_colors(nodes: &[Node], query: &CausalQuery, adjustment: &AdjustmentSet) -> ColorMap {
    compute_roles(nodes, query, adjustment)
        .into_iter()
        .map(|(id, role)| (id, role.color()))
        .collect()
}
