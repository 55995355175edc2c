//! Causal query command.

use anyhow::{bail, Result};
use cdag_client::Session;
use cdag_core::highlight::compute_roles;
use cdag_core::EffectType;
use clap::Args;

use super::{open_project, require_node, user_error};
use crate::output;

#[derive(Args)]
pub struct AdjustArgs {
    /// Project to query
    pub project: String,
    /// Outcome node id or label
    #[arg(long)]
    pub outcome: String,
    /// Cause node id or label (repeatable)
    #[arg(long = "cause", required = true)]
    pub causes: Vec<String>,
    /// Effect type: total or direct
    #[arg(long, default_value = "total")]
    pub effect: String,
}

pub async fn execute(args: AdjustArgs, session: &Session) -> Result<()> {
    let Some(effect_type) = EffectType::from_str(&args.effect) else {
        bail!("Unknown effect type '{}'. Use 'total' or 'direct'.", args.effect);
    };

    open_project(session, &args.project).await?;
    let outcome = require_node(session, &args.outcome)?;
    let causes = args
        .causes
        .iter()
        .map(|c| require_node(session, c))
        .collect::<Result<Vec<_>>>()?;

    let query = session.selectors(|s| {
        s.set_outcome(Some(outcome))?;
        s.set_causes(causes)?;
        s.set_effect_type(effect_type);
        Ok::<_, cdag_core::DagError>(s.query())
    })?;

    let adjustment = session.highlight().await.map_err(user_error)?;
    let roles = session.store(|s| compute_roles(s.nodes(), &query, &adjustment));

    session.store(|s| output::print_graph(&args.project, s, Some(&roles)));
    output::print_adjustment_set(session, &adjustment);
    Ok(())
}
