//! Causal query and adjustment set types.

use serde::{Deserialize, Serialize};

use crate::error::{DagError, DagResult};
use crate::graph::model::Id;

/// Kind of causal effect requested from the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectType {
    #[default]
    Total,
    Direct,
}

impl EffectType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "total" => Some(Self::Total),
            "direct" => Some(Self::Direct),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Total => "total",
            Self::Direct => "direct",
        }
    }
}

/// Outcome, causes and effect type picked by the user. Rebuilt from the
/// selectors for every request and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CausalQuery {
    pub outcome: Option<Id>,
    /// Distinct, in selection order.
    pub causes: Vec<Id>,
    pub effect_type: EffectType,
}

impl CausalQuery {
    pub fn new(
        outcome: Option<Id>,
        causes: impl IntoIterator<Item = Id>,
        effect_type: EffectType,
    ) -> Self {
        let mut distinct: Vec<Id> = Vec::new();
        for cause in causes {
            if !distinct.contains(&cause) {
                distinct.push(cause);
            }
        }
        Self {
            outcome,
            causes: distinct,
            effect_type,
        }
    }

    /// An outcome and at least one cause are required before asking the
    /// backend for an adjustment set.
    pub fn validate(&self) -> DagResult<()> {
        if self.outcome.is_none() {
            return Err(DagError::validation("Please select an outcome variable"));
        }
        if self.causes.is_empty() {
            return Err(DagError::validation("Please select at least one cause variable"));
        }
        Ok(())
    }
}

/// Node ids the backend says to control for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdjustmentSet(Vec<Id>);

impl AdjustmentSet {
    pub fn new(ids: Vec<Id>) -> Self {
        Self(ids)
    }

    /// The displayed set is the first one returned; no sets means an
    /// empty overlay.
    pub fn first_of(sets: Vec<Vec<Id>>) -> Self {
        Self(sets.into_iter().next().unwrap_or_default())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Id> {
        self.0.iter()
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Id] {
        &self.0
    }
}
