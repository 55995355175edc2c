//! CLI command definitions and handlers.

use anyhow::{Context, Result};
use cdag_client::{ClientConfig, Session, SyncClient, SyncError};
use cdag_core::graph::model::Id;
use cdag_core::GraphStore;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

pub mod adjust;
pub mod graph;
pub mod project;

/// Causal diagram editor client
#[derive(Parser)]
#[command(name = "cdag")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Backend base URL
    #[arg(long, global = true, env = "CDAG_API_URL")]
    pub api_url: Option<String>,

    /// Session cookie sent with every request
    #[arg(long, global = true, env = "CDAG_SESSION", hide_env_values = true)]
    pub session_cookie: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Saved projects
    #[command(subcommand)]
    Project(project::ProjectCommands),

    /// List suggested nodes
    Suggest,

    /// Export a saved project through the backend
    Export(graph::ExportArgs),

    /// Import a graph file
    Import(graph::ImportArgs),

    /// Generate a graph from a prompt
    Generate(graph::GenerateArgs),

    /// Compute and show the adjustment set for a causal query
    Adjust(adjust::AdjustArgs),
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env();
        if let Some(url) = &self.api_url {
            config.base_url = url.clone();
        }
        if let Some(cookie) = &self.session_cookie {
            config.session_cookie = Some(cookie.clone());
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        config
    }

    pub async fn execute(self) -> Result<()> {
        let config = self.client_config();
        debug!(base_url = %config.base_url, timeout = config.timeout_secs, "Using backend");
        let client = SyncClient::new(&config).map_err(user_error)?;
        let session = Session::new(client);

        match self.command {
            Commands::Project(cmd) => project::execute(cmd, &session).await,
            Commands::Suggest => graph::suggest(&session).await,
            Commands::Export(args) => graph::export(args, &session).await,
            Commands::Import(args) => graph::import(args, &session).await,
            Commands::Generate(args) => graph::generate(args, &session).await,
            Commands::Adjust(args) => adjust::execute(args, &session).await,
        }
    }
}

/// Turn a sync failure into the message the user should see.
pub fn user_error(err: SyncError) -> anyhow::Error {
    anyhow::anyhow!(err.user_message())
}

/// Fetch a saved project by name and load it into the session.
pub async fn open_project(session: &Session, name: &str) -> Result<()> {
    let projects = session.refresh_projects().await.map_err(user_error)?;
    let project = projects
        .iter()
        .find(|p| p.name == name)
        .with_context(|| format!("Project '{}' not found", name))?;
    session.load_project(project).await.map_err(user_error)
}

/// Find a node by id or (case-insensitive) label.
pub fn resolve_node(store: &GraphStore, key: &str) -> Option<Id> {
    let parsed = Id::parse(key);
    if store.contains_node(&parsed) {
        return Some(parsed);
    }
    let key = key.trim();
    store
        .nodes()
        .iter()
        .find(|n| n.id.to_string() == key || n.label.eq_ignore_ascii_case(key))
        .map(|n| n.id.clone())
}

/// `resolve_node` against the session store, failing with a readable error.
pub fn require_node(session: &Session, key: &str) -> Result<Id> {
    session
        .store(|s| resolve_node(s, key))
        .with_context(|| format!("No node matches '{}'", key))
}
