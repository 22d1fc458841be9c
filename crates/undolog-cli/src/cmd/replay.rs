use crate::context::{Globals, Project};
use crate::output::{print_json, print_table};
use std::path::Path;
use undolog_core::{Replay, Scope};

pub fn undo(root: &Path, scopes: &[Scope], globals: &Globals) -> anyhow::Result<()> {
    let actor = globals.actor()?;
    let session = globals.session()?;
    let project = Project::open(root)?;
    let replay = project.handler.undo(&actor, &session, scopes)?;
    report("undo", "Undid", replay, globals.json)
}

pub fn redo(root: &Path, scopes: &[Scope], globals: &Globals) -> anyhow::Result<()> {
    let actor = globals.actor()?;
    let session = globals.session()?;
    let project = Project::open(root)?;
    let replay = project.handler.redo(&actor, &session, scopes)?;
    report("redo", "Redid", replay, globals.json)
}

fn report(op: &str, verb: &str, replay: Option<Replay>, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&serde_json::json!({ "op": op, "replay": replay }));
    }
    match replay {
        None => println!("Nothing to {op}."),
        Some(replay) => {
            for action in &replay.actions {
                println!("{verb} {}: {}", action.record, action.description);
            }
        }
    }
    Ok(())
}

pub fn history(
    root: &Path,
    scopes: &[Scope],
    limit: Option<usize>,
    globals: &Globals,
) -> anyhow::Result<()> {
    let user = globals.user()?;
    let session = globals.session()?;
    let project = Project::open(root)?;
    let limit = limit.unwrap_or(project.config.undo.history_limit);
    let entries = project.handler.history(user, &session, scopes, limit)?;

    if globals.json {
        return print_json(&entries);
    }
    if entries.is_empty() {
        println!("No actions recorded for session {session}.");
        return Ok(());
    }
    let rows = entries
        .iter()
        .map(|e| {
            let state = if e.redoable {
                format!("{} (redoable)", e.record.state)
            } else {
                e.record.state.to_string()
            };
            vec![
                e.record.id.to_string(),
                e.record.scope.to_string(),
                state,
                e.record.description.clone(),
            ]
        })
        .collect();
    print_table(&["RECORD", "SCOPE", "STATE", "DESCRIPTION"], rows);
    Ok(())
}
