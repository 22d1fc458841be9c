use crate::context::{Globals, Project};
use crate::output::{print_json, print_table};
use clap::Subcommand;
use std::path::Path;
use undolog_teams::actions::{
    CreateTeam, CreateTeamParams, DeleteTeam, DeleteTeamParams, UpdateTeam, UpdateTeamParams,
};

#[derive(Subcommand)]
pub enum TeamSubcommand {
    /// Create a team in a group
    Create {
        group_id: u64,
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// Rename a team
    Rename {
        group_id: u64,
        team_id: u64,
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// Delete a team and its subjects
    Delete { group_id: u64, team_id: u64 },
    /// List the teams of a group
    List { group_id: u64 },
}

pub fn run(root: &Path, subcmd: TeamSubcommand, globals: &Globals) -> anyhow::Result<()> {
    match subcmd {
        TeamSubcommand::Create { group_id, name } => {
            create(root, group_id, &name.join(" "), globals)
        }
        TeamSubcommand::Rename {
            group_id,
            team_id,
            name,
        } => rename(root, group_id, team_id, &name.join(" "), globals),
        TeamSubcommand::Delete { group_id, team_id } => delete(root, group_id, team_id, globals),
        TeamSubcommand::List { group_id } => list(root, group_id, globals.json),
    }
}

fn create(root: &Path, group_id: u64, name: &str, globals: &Globals) -> anyhow::Result<()> {
    let actor = globals.actor()?;
    let project = Project::open(root)?;
    let team = project.handler.perform::<CreateTeam>(
        &actor,
        &CreateTeamParams {
            group_id,
            name: name.to_string(),
        },
    )?;

    if globals.json {
        print_json(&team)?;
    } else {
        println!("Created team {}: {}", team.id, team.name);
    }
    Ok(())
}

fn rename(
    root: &Path,
    group_id: u64,
    team_id: u64,
    name: &str,
    globals: &Globals,
) -> anyhow::Result<()> {
    let actor = globals.actor()?;
    let project = Project::open(root)?;
    let team = project.handler.perform::<UpdateTeam>(
        &actor,
        &UpdateTeamParams {
            group_id,
            team_id,
            name: name.to_string(),
        },
    )?;

    if globals.json {
        print_json(&team)?;
    } else {
        println!("Renamed team {} to {}", team.id, team.name);
    }
    Ok(())
}

fn delete(root: &Path, group_id: u64, team_id: u64, globals: &Globals) -> anyhow::Result<()> {
    let actor = globals.actor()?;
    let project = Project::open(root)?;
    project
        .handler
        .perform::<DeleteTeam>(&actor, &DeleteTeamParams { group_id, team_id })?;

    if globals.json {
        print_json(&serde_json::json!({ "team_id": team_id, "deleted": true }))?;
    } else {
        println!("Deleted team {team_id}");
    }
    Ok(())
}

fn list(root: &Path, group_id: u64, json: bool) -> anyhow::Result<()> {
    let project = Project::open(root)?;
    let teams = project.directory()?.teams(group_id)?;

    if json {
        print_json(&teams)?;
        return Ok(());
    }
    if teams.is_empty() {
        println!("No teams in group {group_id}.");
        return Ok(());
    }
    let rows = teams
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.name.clone(),
                t.created_at.format("%Y-%m-%d %H:%M").to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "CREATED"], rows);
    Ok(())
}
