//! Terminal output formatting.

use std::collections::HashMap;

use cdag_client::Session;
use cdag_core::graph::model::Id;
use cdag_core::papers::PaperEntry;
use cdag_core::project::{Project, Suggestion};
use cdag_core::{AdjustmentSet, GraphStore, NodeRole};
use colored::{ColoredString, Colorize};

fn role_label(role: NodeRole) -> ColoredString {
    match role {
        NodeRole::Default => role.as_str().dimmed(),
        NodeRole::Adjustment => role.as_str().red(),
        NodeRole::Cause => role.as_str().green(),
        NodeRole::Outcome => role.as_str().blue().bold(),
    }
}

/// Print projects as a table.
pub fn print_projects_table(projects: &[Project]) {
    if projects.is_empty() {
        println!("{}", "No projects found.".dimmed());
        return;
    }

    println!("{:<30} {:>6} {:>6}", "Name", "Nodes", "Edges");
    println!("{}", "─".repeat(44));
    for project in projects {
        println!(
            "{:<30} {:>6} {:>6}",
            truncate(&project.name, 28),
            project.content.nodes.len(),
            project.content.edges.len()
        );
    }
}

/// Print a graph, optionally with each node's role in the current query.
pub fn print_graph(name: &str, store: &GraphStore, roles: Option<&HashMap<Id, NodeRole>>) {
    println!(
        "{} {}",
        name.cyan().bold(),
        format!("({} nodes, {} edges)", store.nodes().len(), store.edges().len()).dimmed()
    );

    if store.nodes().is_empty() {
        println!("  {}", "Empty graph.".dimmed());
        return;
    }

    println!();
    println!("{}", "Nodes".bold());
    for node in store.nodes() {
        let role = roles
            .and_then(|r| r.get(&node.id))
            .map(|r| format!(" [{}]", role_label(*r)))
            .unwrap_or_default();
        println!("  {:<10} {}{}", node.id.to_string().dimmed(), node.label, role);
        if let Some(title) = &node.title {
            for line in title.lines() {
                println!("  {:<10} {}", "", line.dimmed());
            }
        }
    }

    if !store.edges().is_empty() {
        println!();
        println!("{}", "Edges".bold());
        for edge in store.edges() {
            let label = |id: &Id| {
                store
                    .get_node(id)
                    .map(|n| n.label.clone())
                    .unwrap_or_else(|| format!("{} (missing)", id))
            };
            println!("  {} → {}", label(&edge.from), label(&edge.to));
        }
    }
}

pub fn print_adjustment_set(session: &Session, adjustment: &AdjustmentSet) {
    println!();
    if adjustment.is_empty() {
        println!("{}", "Adjustment set: {} (nothing to control for)".yellow());
        return;
    }
    let labels: Vec<String> = session.store(|s| {
        adjustment
            .iter()
            .map(|id| s.get_node(id).map(|n| n.label.clone()).unwrap_or_else(|| id.to_string()))
            .collect()
    });
    println!("{} {{{}}}", "Adjustment set:".bold(), labels.join(", ").red());
}

pub fn print_suggestions(suggestions: &[Suggestion]) {
    if suggestions.is_empty() {
        println!("{}", "No suggestions available.".dimmed());
        return;
    }
    for s in suggestions {
        println!("{}", s.label.cyan());
        if !s.annotation.is_empty() {
            println!("  {}", s.annotation.dimmed());
        }
    }
}

pub fn print_papers(papers: &[PaperEntry]) {
    for entry in papers {
        match entry {
            PaperEntry::Placeholder => println!("{}", entry.to_string().dimmed()),
            PaperEntry::Paper { .. } => println!("{}\n", entry),
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
