//! Editing session: one graph store, its selectors, and the sync client.
//!
//! Backend results are applied to the store only after a successful
//! response, so a failed call never leaves partial state behind.
//! Operations that replace the whole graph hold the bulk gate for their
//! full round trip and therefore land in the order they were issued.

use std::sync::{Mutex, MutexGuard, PoisonError};

use cdag_core::graph::model::Id;
use cdag_core::papers::{render_papers, PaperEntry};
use cdag_core::project::{self, Project, Suggestion};
use cdag_core::{compute_colors, AdjustmentSet, GraphEvent, GraphStore, SelectorSync};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::client::SyncClient;
use crate::error::{SyncError, SyncResult};

struct Selectors {
    sync: SelectorSync,
    rx: broadcast::Receiver<GraphEvent>,
}

/// Outcome of a successful graph generation.
#[derive(Debug, Clone)]
pub struct Generated {
    pub nodes: usize,
    pub edges: usize,
    pub papers: Vec<PaperEntry>,
}

pub struct Session {
    client: SyncClient,
    store: Mutex<GraphStore>,
    selectors: Mutex<Selectors>,
    current_project: Mutex<Option<String>>,
    bulk_gate: tokio::sync::Mutex<()>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn log_failure(operation: &'static str, err: &SyncError) {
    match err {
        SyncError::Validation(msg) => info!(operation, reason = %msg, "Rejected locally"),
        SyncError::Backend(msg) => warn!(operation, error = %msg, "Backend reported failure"),
        other => warn!(operation, error = %other, "Request failed"),
    }
}

impl Session {
    pub fn new(client: SyncClient) -> Self {
        Self::with_store(client, GraphStore::new())
    }

    /// Start a session on an existing store.
    pub fn with_store(client: SyncClient, store: GraphStore) -> Self {
        let selectors = Selectors {
            sync: SelectorSync::for_store(&store),
            rx: store.subscribe(),
        };
        Self {
            client,
            store: Mutex::new(store),
            selectors: Mutex::new(selectors),
            current_project: Mutex::new(None),
            bulk_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Run `f` against the graph store.
    pub fn store<R>(&self, f: impl FnOnce(&mut GraphStore) -> R) -> R {
        let mut store = lock(&self.store);
        f(&mut store)
    }

    /// Run `f` against selector state, resynced with the store first.
    pub fn selectors<R>(&self, f: impl FnOnce(&mut SelectorSync) -> R) -> R {
        let store = lock(&self.store);
        let mut selectors = lock(&self.selectors);
        let Selectors { sync, rx } = &mut *selectors;
        sync.pump(rx, &store);
        f(sync)
    }

    /// Name of the last loaded or saved project.
    pub fn current_project(&self) -> Option<String> {
        lock(&self.current_project).clone()
    }

    /// Save the current graph. Without a name, the current project name
    /// is reused.
    pub async fn save(&self, name: Option<&str>) -> SyncResult<String> {
        let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(n) => n.to_string(),
            None => self.current_project().unwrap_or_default(),
        };
        let content = self.store(|s| s.content());

        self.client
            .save_project(&name, content)
            .await
            .inspect_err(|e| log_failure("save", e))?;

        info!(project = %name, "Project saved");
        *lock(&self.current_project) = Some(name.trim().to_string());
        Ok("Project saved successfully".to_string())
    }

    pub async fn refresh_projects(&self) -> SyncResult<Vec<Project>> {
        self.client
            .list_projects()
            .await
            .inspect_err(|e| log_failure("list_projects", e))
    }

    /// Replace the graph with a listed project's content.
    pub async fn load_project(&self, project: &Project) -> SyncResult<()> {
        let _gate = self.bulk_gate.lock().await;
        self.store(|s| s.load(project.content.clone()))?;
        *lock(&self.current_project) = Some(project.name.clone());
        info!(project = %project.name, "Project loaded");
        Ok(())
    }

    pub async fn suggestions(&self) -> SyncResult<Vec<Suggestion>> {
        self.client
            .suggest_nodes()
            .await
            .inspect_err(|e| log_failure("suggest_nodes", e))
    }

    /// Add a node from a suggestion.
    pub fn add_suggestion(&self, suggestion: &Suggestion) -> SyncResult<Id> {
        Ok(self.store(|s| project::add_suggestion(s, suggestion))?)
    }

    /// Export the current graph as a file payload.
    pub async fn export(&self) -> SyncResult<Vec<u8>> {
        let content = self.store(|s| s.content());
        self.client
            .export_graph(&content)
            .await
            .inspect_err(|e| log_failure("export", e))
    }

    /// Upload a graph file and replace the graph with its content.
    pub async fn import(&self, file_name: &str, data: Vec<u8>) -> SyncResult<String> {
        let _gate = self.bulk_gate.lock().await;
        let content = self
            .client
            .import_graph(file_name, data)
            .await
            .map_err(|e| match e {
                SyncError::Backend(msg) => {
                    SyncError::Backend(format!("Error importing graph: {}", msg))
                }
                other => other,
            })
            .inspect_err(|e| log_failure("import", e))?;

        let (nodes, edges) = (content.nodes.len(), content.edges.len());
        self.store(|s| s.load(content))?;
        info!(nodes, edges, "Graph imported");
        Ok("Graph imported successfully".to_string())
    }

    /// Generate a graph from a prompt and replace the current one.
    pub async fn generate(&self, prompt: &str) -> SyncResult<Generated> {
        let _gate = self.bulk_gate.lock().await;
        let generated = self
            .client
            .generate_graph(prompt)
            .await
            .map_err(|e| match e {
                SyncError::Backend(msg) => {
                    SyncError::Backend(format!("Error generating graph: {}", msg))
                }
                other => other,
            })
            .inspect_err(|e| log_failure("generate", e))?;

        let nodes = generated.graph.nodes.len();
        let edges = generated.graph.edges.len();
        self.store(|s| s.load(generated.graph))?;
        info!(nodes, edges, papers = generated.papers.len(), "Graph generated");

        Ok(Generated {
            nodes,
            edges,
            papers: render_papers(&generated.papers),
        })
    }

    /// Request an adjustment set for the current selection and recolor
    /// the graph from it. Only the first returned set is shown.
    ///
    /// If the graph changes before the response arrives, the result is
    /// dropped with `SyncError::Stale` and the overlay is left alone.
    pub async fn highlight(&self) -> SyncResult<AdjustmentSet> {
        let query = self.selectors(|s| s.query());
        query
            .validate()
            .map_err(SyncError::from)
            .inspect_err(|e| log_failure("highlight", e))?;
        let (content, version) = self.store(|s| (s.content(), s.version()));

        let sets = self
            .client
            .adjustment_sets(&content, &query)
            .await
            .inspect_err(|e| log_failure("highlight", e))?;
        let adjustment = AdjustmentSet::first_of(sets);

        self.store(|s| {
            if s.version() != version {
                return Err(SyncError::Stale);
            }
            let colors = compute_colors(s.nodes(), &query, &adjustment);
            s.apply_colors(colors);
            Ok(())
        })
        .inspect_err(|e| log_failure("highlight", e))?;
        info!(size = adjustment.len(), "Highlight applied");
        Ok(adjustment)
    }
}
