//! Subcommand implementations. Each returns the text to print.

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use gatehouse_guard::SessionSnapshot;
use gatehouse_route::{RouteTable, RouteTableSpec};
use serde_json::json;
use std::path::Path;
use tracing::debug;

fn load_table(path: &Path) -> Result<RouteTable> {
    let source = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("reading route table {}", path.display()))?;
    let spec = RouteTableSpec::from_json(&source)
        .wrap_err_with(|| format!("parsing route table {}", path.display()))?;
    let table = RouteTable::build(&spec)
        .wrap_err_with(|| format!("building route table {}", path.display()))?;
    debug!(routes = table.len(), "route table built");
    Ok(table)
}

fn load_session(path: &Path) -> Result<SessionSnapshot> {
    let source = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("reading session {}", path.display()))?;
    SessionSnapshot::from_json(&source)
        .wrap_err_with(|| format!("parsing session {}", path.display()))
}

/// Build the table and summarise it
pub fn validate(routes: &Path) -> Result<String> {
    let table = load_table(routes)?;
    let guards: usize = table.routes().iter().map(|r| r.guards().len()).sum();
    Ok(format!("ok: {} routes, {} guards", table.len(), guards))
}

/// Routing outcome for one path, as JSON
pub async fn check(routes: &Path, session: &Path, path: &str) -> Result<String> {
    let table = load_table(routes)?;
    let snapshot = load_session(session)?;
    let outcome = table.authorize(path, &snapshot.eval_context()).await;
    Ok(serde_json::to_string_pretty(&outcome)?)
}

/// Guard trace for one path, as JSON
pub async fn explain(routes: &Path, session: &Path, path: &str) -> Result<String> {
    let table = load_table(routes)?;
    let snapshot = load_session(session)?;

    let (route, decision) = table
        .explain(path, &snapshot.eval_context())
        .await
        .ok_or_else(|| eyre!("no route matches {path}"))?;

    let report = match decision {
        Ok(decision) => json!({
            "route": route.pattern().as_str(),
            "allowed": decision.allowed,
            "deciding_guard": decision.deciding_guard(),
            "evaluated": decision.evaluated,
        }),
        Err(err) => json!({
            "route": route.pattern().as_str(),
            "error": err.to_string(),
        }),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Names of routes the session may enter, one per line
pub async fn menu(routes: &Path, session: &Path) -> Result<String> {
    let table = load_table(routes)?;
    let snapshot = load_session(session)?;
    let visible = table.visible_routes(&snapshot.eval_context()).await;
    Ok(visible
        .iter()
        .map(|route| route.name())
        .collect::<Vec<_>>()
        .join("\n"))
}
