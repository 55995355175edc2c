//! Project CLI commands.

use anyhow::{Context, Result};
use cdag_client::Session;
use cdag_core::annotation::annotate;
use cdag_core::graph::model::{GraphContent, NodeDraft};
use cdag_core::EdgeProposal;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use std::path::PathBuf;

use super::{open_project, require_node, user_error};
use crate::output;

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List saved projects
    List,

    /// Show a project's nodes and edges
    Show {
        /// Project name
        name: String,
    },

    /// Save a graph file as a project
    Save {
        /// Project name
        name: String,
        /// JSON file with `nodes` and `edges`
        #[arg(long)]
        from: PathBuf,
    },

    /// Add a node to a project
    AddNode {
        name: String,
        /// Node label (defaults to "New Node")
        #[arg(default_value = "")]
        label: String,
    },

    /// Connect two nodes in a project
    Connect {
        name: String,
        /// Source node id or label
        from: String,
        /// Target node id or label
        to: String,
        /// Skip the self-loop confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Remove nodes or edges from a project
    Remove {
        name: String,
        /// Node ids/labels or edge ids
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Append an annotation to a node
    Annotate {
        name: String,
        /// Node id or label
        node: String,
        /// Annotation text
        text: String,
    },
}

pub async fn execute(cmd: ProjectCommands, session: &Session) -> Result<()> {
    match cmd {
        ProjectCommands::List => cmd_list(session).await,
        ProjectCommands::Show { name } => cmd_show(session, &name).await,
        ProjectCommands::Save { name, from } => cmd_save(session, &name, from).await,
        ProjectCommands::AddNode { name, label } => cmd_add_node(session, &name, label).await,
        ProjectCommands::Connect { name, from, to, yes } => {
            cmd_connect(session, &name, &from, &to, yes).await
        }
        ProjectCommands::Remove { name, ids } => cmd_remove(session, &name, &ids).await,
        ProjectCommands::Annotate { name, node, text } => {
            cmd_annotate(session, &name, &node, &text).await
        }
    }
}

async fn cmd_list(session: &Session) -> Result<()> {
    let projects = session.refresh_projects().await.map_err(user_error)?;
    output::print_projects_table(&projects);
    Ok(())
}

async fn cmd_show(session: &Session, name: &str) -> Result<()> {
    open_project(session, name).await?;
    session.store(|s| output::print_graph(name, s, None));
    Ok(())
}

async fn save_back(session: &Session) -> Result<()> {
    let msg = session.save(None).await.map_err(user_error)?;
    println!("{}", msg.green());
    Ok(())
}

async fn cmd_save(session: &Session, name: &str, from: PathBuf) -> Result<()> {
    let raw = std::fs::read_to_string(&from)
        .with_context(|| format!("Failed to read {}", from.display()))?;
    let content: GraphContent = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a graph file", from.display()))?;

    session.store(|s| s.load(content))?;
    let msg = session.save(Some(name)).await.map_err(user_error)?;
    println!("{}", msg.green());
    Ok(())
}

async fn cmd_add_node(session: &Session, name: &str, label: String) -> Result<()> {
    open_project(session, name).await?;
    let id = session.store(|s| s.add_node(NodeDraft::labeled(label)))?;
    println!("Added node {}", id.to_string().cyan());
    save_back(session).await
}

async fn cmd_connect(session: &Session, name: &str, from: &str, to: &str, yes: bool) -> Result<()> {
    open_project(session, name).await?;
    let from = require_node(session, from)?;
    let to = require_node(session, to)?;

    let id = match session.store(|s| s.add_edge(&from, &to))? {
        EdgeProposal::Created(id) => id,
        EdgeProposal::NeedsConfirmation(pending) => {
            let confirmed = yes
                || Confirm::new()
                    .with_prompt("Do you want to connect the node to itself?")
                    .default(false)
                    .interact()?;
            if !confirmed {
                session.store(|s| s.cancel_edge(pending));
                println!("{}", "Edge not created.".dimmed());
                return Ok(());
            }
            session.store(|s| s.commit_edge(pending))?
        }
    };

    println!("Added edge {}", id.to_string().cyan());
    save_back(session).await
}

async fn cmd_remove(session: &Session, name: &str, keys: &[String]) -> Result<()> {
    open_project(session, name).await?;
    let ids: Vec<_> = keys
        .iter()
        .map(|k| {
            session
                .store(|s| super::resolve_node(s, k))
                .unwrap_or_else(|| cdag_core::Id::parse(k))
        })
        .collect();

    let removed = session.store(|s| s.remove(&ids));
    if removed == 0 {
        println!("{}", "Nothing matched; project unchanged.".dimmed());
        return Ok(());
    }
    println!("Removed {} element(s)", removed);
    save_back(session).await
}

async fn cmd_annotate(session: &Session, name: &str, node: &str, text: &str) -> Result<()> {
    open_project(session, name).await?;
    let id = require_node(session, node)?;

    if !session.store(|s| annotate(s, &id, text))? {
        println!("{}", "Empty annotation ignored.".dimmed());
        return Ok(());
    }
    save_back(session).await
}
