//! HTTP client for the diagram backend.
//!
//! Each method is one request/response exchange. Required inputs are
//! checked first so invalid calls never reach the network.

use std::time::Duration;

use cdag_core::graph::model::{GraphContent, Id};
use cdag_core::project::{self, Project, Suggestion};
use cdag_core::CausalQuery;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{SyncError, SyncResult};
use crate::protocol::{self, GeneratedGraph};

/// Stateless client for the seven backend operations.
#[derive(Clone)]
pub struct SyncClient {
    base_url: String,
    client: reqwest::Client,
}

impl SyncClient {
    /// Create a client from config.
    pub fn new(config: &ClientConfig) -> SyncResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| SyncError::Config(format!("invalid session cookie: {}", e)))?;
            headers.insert(COOKIE, value);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        debug!(base_url = %config.base_url, "SyncClient initialized");
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check_status(response: Response) -> SyncResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, "Backend returned error status");
        Err(SyncError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> SyncResult<T> {
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Save the graph under `name`, overwriting any project of that name.
    pub async fn save_project(&self, name: &str, content: GraphContent) -> SyncResult<()> {
        let request = project::new_project(name, content)?;

        info!(project = %request.name, nodes = request.content.nodes.len(), "Saving project");
        let response = self
            .client
            .post(self.url(protocol::SAVE_PROJECT))
            .json(&request)
            .send()
            .await?;

        let result: protocol::SaveResponse = Self::decode(response).await?;
        result.into_result()
    }

    /// List the user's saved projects.
    pub async fn list_projects(&self) -> SyncResult<Vec<Project>> {
        let response = self.client.get(self.url(protocol::GET_PROJECTS)).send().await?;
        let projects: protocol::ProjectList = Self::decode(response).await?;
        debug!(count = projects.len(), "Projects listed");
        Ok(projects)
    }

    /// Fetch suggested node templates.
    pub async fn suggest_nodes(&self) -> SyncResult<Vec<Suggestion>> {
        let response = self.client.get(self.url(protocol::NODE_SUGGESTIONS)).send().await?;
        let result: protocol::SuggestionsResponse = Self::decode(response).await?;
        Ok(result.nodes)
    }

    /// Ask the backend to render the graph as a downloadable file.
    pub async fn export_graph(&self, content: &GraphContent) -> SyncResult<Vec<u8>> {
        let response = self
            .client
            .post(self.url(protocol::EXPORT_GRAPH))
            .json(content)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await?;
        debug!(size = bytes.len(), "Graph exported");
        Ok(bytes.to_vec())
    }

    /// Upload a graph file and get its parsed content back.
    pub async fn import_graph(&self, file_name: &str, data: Vec<u8>) -> SyncResult<GraphContent> {
        if data.is_empty() {
            return Err(SyncError::validation("Please choose a file to import"));
        }

        let part = Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str("application/json")?;
        let form = Form::new().part(protocol::IMPORT_FIELD, part);

        info!(file = %file_name, "Importing graph");
        let response = self
            .client
            .post(self.url(protocol::IMPORT_GRAPH))
            .multipart(form)
            .send()
            .await?;

        let result: protocol::ImportResponse = Self::decode(response).await?;
        result.into_result()
    }

    /// Generate a graph from a natural-language prompt.
    pub async fn generate_graph(&self, prompt: &str) -> SyncResult<GeneratedGraph> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(SyncError::validation("Please enter a causal link prompt"));
        }

        info!(prompt_len = prompt.len(), "Generating graph");
        let response = self
            .client
            .post(self.url(protocol::GENERATE_GRAPH))
            .json(&protocol::GenerateRequest { prompt })
            .send()
            .await?;

        let result: protocol::GenerateResponse = Self::decode(response).await?;
        result.into_result()
    }

    /// Compute adjustment sets for the query over the given graph.
    pub async fn adjustment_sets(
        &self,
        content: &GraphContent,
        query: &CausalQuery,
    ) -> SyncResult<Vec<Vec<Id>>> {
        query.validate()?;
        let outcome = query
            .outcome
            .as_ref()
            .ok_or_else(|| SyncError::validation("Please select an outcome variable"))?;

        let request = protocol::AdjustmentRequest {
            nodes: &content.nodes,
            edges: &content.edges,
            outcome,
            causes: &query.causes,
            effect_type: query.effect_type,
        };

        info!(outcome = %outcome, causes = query.causes.len(), "Requesting adjustment sets");
        let response = self
            .client
            .post(self.url(protocol::ADJUSTMENT_SETS))
            .json(&request)
            .send()
            .await?;

        let result: protocol::AdjustmentResponse = Self::decode(response).await?;
        result.into_result()
    }
}
