//! Outcome/cause selector state kept in step with the graph.

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::debug;

use crate::error::{DagError, DagResult};
use crate::graph::model::Id;
use crate::graph::{GraphEvent, GraphStore};
use crate::query::{CausalQuery, EffectType};

/// One entry in the outcome or cause list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorOption {
    pub id: Id,
    pub label: String,
}

/// Selector lists plus the current outcome/cause choice.
///
/// Selections survive any change that keeps their node; selections of
/// removed nodes are dropped silently.
#[derive(Debug, Default)]
pub struct SelectorSync {
    options: Vec<SelectorOption>,
    outcome: Option<Id>,
    causes: Vec<Id>,
    effect_type: EffectType,
    seen_version: Option<u64>,
}

impl SelectorSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build selector state for an existing store.
    pub fn for_store(store: &GraphStore) -> Self {
        let mut sync = Self::new();
        sync.sync(store);
        sync
    }

    /// Rebuild the lists from the store. Returns `false` without doing
    /// anything when the store has not changed since the last sync.
    pub fn sync(&mut self, store: &GraphStore) -> bool {
        if self.seen_version == Some(store.version()) {
            return false;
        }

        self.options = store
            .nodes()
            .iter()
            .map(|n| SelectorOption {
                id: n.id.clone(),
                label: n.label.clone(),
            })
            .collect();

        if let Some(outcome) = &self.outcome {
            if !store.contains_node(outcome) {
                debug!(node = %outcome, "Outcome selection dropped");
                self.outcome = None;
            }
        }
        self.causes.retain(|id| store.contains_node(id));

        self.seen_version = Some(store.version());
        true
    }

    /// Drain pending notifications and resync if any touched the graph.
    pub fn pump(&mut self, rx: &mut broadcast::Receiver<GraphEvent>, store: &GraphStore) -> bool {
        let mut dirty = false;
        loop {
            match rx.try_recv() {
                Ok(event) => dirty |= event.kind.touches_graph(),
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "Selector fell behind graph events");
                    dirty = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        dirty && self.sync(store)
    }

    pub fn outcome_options(&self) -> &[SelectorOption] {
        &self.options
    }

    pub fn cause_options(&self) -> &[SelectorOption] {
        &self.options
    }

    pub fn outcome(&self) -> Option<&Id> {
        self.outcome.as_ref()
    }

    pub fn causes(&self) -> &[Id] {
        &self.causes
    }

    pub fn effect_type(&self) -> EffectType {
        self.effect_type
    }

    fn check_known(&self, id: &Id) -> DagResult<()> {
        if self.options.iter().any(|o| &o.id == id) {
            Ok(())
        } else {
            Err(DagError::NodeNotFound(id.clone()))
        }
    }

    /// Select the outcome, or clear it with `None`.
    pub fn set_outcome(&mut self, outcome: Option<Id>) -> DagResult<()> {
        if let Some(id) = &outcome {
            self.check_known(id)?;
        }
        self.outcome = outcome;
        Ok(())
    }

    /// Flip a cause selection. Returns whether the node is now selected.
    pub fn toggle_cause(&mut self, id: &Id) -> DagResult<bool> {
        self.check_known(id)?;
        if let Some(pos) = self.causes.iter().position(|c| c == id) {
            self.causes.remove(pos);
            Ok(false)
        } else {
            self.causes.push(id.clone());
            Ok(true)
        }
    }

    /// Replace the cause selection.
    pub fn set_causes(&mut self, ids: Vec<Id>) -> DagResult<()> {
        for id in &ids {
            self.check_known(id)?;
        }
        self.causes.clear();
        for id in ids {
            if !self.causes.contains(&id) {
                self.causes.push(id);
            }
        }
        Ok(())
    }

    pub fn set_effect_type(&mut self, effect_type: EffectType) {
        self.effect_type = effect_type;
    }

    /// Query built from the current selection.
    pub fn query(&self) -> CausalQuery {
        CausalQuery::new(self.outcome.clone(), self.causes.clone(), self.effect_type)
    }
}
