//! Graph transfer CLI commands: suggestions, export, import, generation.

use anyhow::{Context, Result};
use cdag_client::Session;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::{open_project, user_error};
use crate::output;

/// Default download name for exported graphs.
const EXPORT_FILE_NAME: &str = "graph_export.json";

#[derive(Args)]
pub struct ExportArgs {
    /// Project to export
    pub project: String,
    /// Output file
    #[arg(short, long, default_value = EXPORT_FILE_NAME)]
    pub out: PathBuf,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Graph file to upload
    pub file: PathBuf,
    /// Save the imported graph under this project name
    #[arg(long)]
    pub save_as: Option<String>,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Causal link prompt
    pub prompt: String,
    /// Save the generated graph under this project name
    #[arg(long)]
    pub save_as: Option<String>,
}

pub async fn suggest(session: &Session) -> Result<()> {
    let suggestions = session.suggestions().await.map_err(user_error)?;
    output::print_suggestions(&suggestions);
    Ok(())
}

pub async fn export(args: ExportArgs, session: &Session) -> Result<()> {
    open_project(session, &args.project).await?;
    let payload = session.export().await.map_err(user_error)?;
    std::fs::write(&args.out, &payload)
        .with_context(|| format!("Failed to write {}", args.out.display()))?;
    println!("Exported {} bytes to {}", payload.len(), args.out.display().to_string().cyan());
    Ok(())
}

async fn save_as(session: &Session, name: Option<&str>) -> Result<()> {
    if let Some(name) = name {
        let msg = session.save(Some(name)).await.map_err(user_error)?;
        println!("{}", msg.green());
    }
    Ok(())
}

pub async fn import(args: ImportArgs, session: &Session) -> Result<()> {
    let data = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let file_name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "graph.json".to_string());

    let msg = session.import(&file_name, data).await.map_err(user_error)?;
    println!("{}", msg.green());
    session.store(|s| output::print_graph(&file_name, s, None));
    save_as(session, args.save_as.as_deref()).await
}

pub async fn generate(args: GenerateArgs, session: &Session) -> Result<()> {
    let generated = session.generate(&args.prompt).await.map_err(user_error)?;
    println!("{}", "Graph generated successfully".green());
    session.store(|s| output::print_graph("generated", s, None));

    println!();
    println!("{}", "Related papers".bold());
    output::print_papers(&generated.papers);

    save_as(session, args.save_as.as_deref()).await
}
