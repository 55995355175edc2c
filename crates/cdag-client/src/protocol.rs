//! Wire types for the backend endpoints.

use cdag_core::graph::model::{Edge, GraphContent, Id, Node};
use cdag_core::papers::Paper;
use cdag_core::project::{Project, Suggestion};
use cdag_core::EffectType;
use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};

pub const SAVE_PROJECT: &str = "/save_project";
pub const GET_PROJECTS: &str = "/get_projects";
pub const NODE_SUGGESTIONS: &str = "/get_node_suggestions";
pub const EXPORT_GRAPH: &str = "/export_graph";
pub const IMPORT_GRAPH: &str = "/import_graph";
pub const GENERATE_GRAPH: &str = "/admin/generate_graph";
pub const ADJUSTMENT_SETS: &str = "/get_adjustment_sets";

/// Multipart field carrying the uploaded graph file.
pub const IMPORT_FIELD: &str = "file";

/// Save requests reuse the project shape.
pub type SaveRequest = Project;

pub type ProjectList = Vec<Project>;

#[derive(Debug, Deserialize)]
pub struct SaveResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionsResponse {
    #[serde(default)]
    pub nodes: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
pub struct ImportResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub content: Option<GraphContent>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub prompt: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub graph_data: Option<GraphContent>,
    #[serde(default)]
    pub papers: Vec<Paper>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AdjustmentRequest<'a> {
    pub nodes: &'a [Node],
    pub edges: &'a [Edge],
    pub outcome: &'a Id,
    pub causes: &'a [Id],
    pub effect_type: EffectType,
}

#[derive(Debug, Deserialize)]
pub struct AdjustmentResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub adjustment_sets: Vec<Vec<Id>>,
    #[serde(default)]
    pub error: Option<String>,
}

fn failure(error: Option<String>, fallback: &str) -> SyncError {
    SyncError::backend(error.filter(|e| !e.is_empty()).unwrap_or_else(|| fallback.to_string()))
}

impl SaveResponse {
    pub fn into_result(self) -> SyncResult<()> {
        if self.success {
            Ok(())
        } else {
            Err(failure(self.error, "Failed to save project"))
        }
    }
}

impl ImportResponse {
    pub fn into_result(self) -> SyncResult<GraphContent> {
        match (self.success, self.content) {
            (true, Some(content)) => Ok(content),
            (true, None) => Err(SyncError::backend("Import response carried no graph")),
            (false, _) => Err(failure(self.error, "Import failed")),
        }
    }
}

/// Successful generation: new graph plus related literature.
#[derive(Debug, Clone)]
pub struct GeneratedGraph {
    pub graph: GraphContent,
    pub papers: Vec<Paper>,
}

impl GenerateResponse {
    pub fn into_result(self) -> SyncResult<GeneratedGraph> {
        match (self.success, self.graph_data) {
            (true, Some(graph)) => Ok(GeneratedGraph {
                graph,
                papers: self.papers,
            }),
            (true, None) => Err(SyncError::backend("Generation response carried no graph")),
            (false, _) => Err(failure(self.error, "Generation failed")),
        }
    }
}

impl AdjustmentResponse {
    pub fn into_result(self) -> SyncResult<Vec<Vec<Id>>> {
        if self.success {
            Ok(self.adjustment_sets)
        } else {
            Err(failure(self.error, "Adjustment set computation failed"))
        }
    }
}
