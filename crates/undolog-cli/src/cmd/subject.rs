use crate::context::{Globals, Project};
use crate::output::{print_json, print_table};
use clap::Subcommand;
use std::path::Path;
use undolog_core::UserId;
use undolog_teams::actions::{
    CreateTeamSubject, CreateTeamSubjectParams, DeleteTeamSubject, DeleteTeamSubjectParams,
};
use undolog_teams::{SubjectRef, AUTH_USER};

#[derive(Subcommand)]
pub enum SubjectSubcommand {
    /// Add a user to a team, by id or by email
    Add {
        group_id: u64,
        team_id: u64,
        /// Id of the user to add
        #[arg(long = "user-id", conflicts_with = "email", required_unless_present = "email")]
        user_id: Option<u64>,
        /// Email of the user to add
        #[arg(long)]
        email: Option<String>,
    },
    /// Remove a subject from its team
    Remove { group_id: u64, subject_id: u64 },
    /// List the subjects of a team
    List { team_id: u64 },
}

pub fn run(root: &Path, subcmd: SubjectSubcommand, globals: &Globals) -> anyhow::Result<()> {
    match subcmd {
        SubjectSubcommand::Add {
            group_id,
            team_id,
            user_id,
            email,
        } => {
            let subject = match (user_id, email) {
                (Some(id), _) => SubjectRef::Id { id: UserId(id) },
                (None, Some(email)) => SubjectRef::Email { email },
                (None, None) => anyhow::bail!("one of --user-id or --email is required"),
            };
            add(root, group_id, team_id, subject, globals)
        }
        SubjectSubcommand::Remove {
            group_id,
            subject_id,
        } => remove(root, group_id, subject_id, globals),
        SubjectSubcommand::List { team_id } => list(root, team_id, globals.json),
    }
}

fn add(
    root: &Path,
    group_id: u64,
    team_id: u64,
    subject: SubjectRef,
    globals: &Globals,
) -> anyhow::Result<()> {
    let actor = globals.actor()?;
    let project = Project::open(root)?;
    let subject = project.handler.perform::<CreateTeamSubject>(
        &actor,
        &CreateTeamSubjectParams {
            group_id,
            team_id,
            subject,
            subject_type: AUTH_USER.to_string(),
        },
    )?;

    if globals.json {
        print_json(&subject)?;
    } else {
        println!(
            "Added user {} to team {} as subject {}",
            subject.subject_id, subject.team_id, subject.id
        );
    }
    Ok(())
}

fn remove(root: &Path, group_id: u64, subject_id: u64, globals: &Globals) -> anyhow::Result<()> {
    let actor = globals.actor()?;
    let project = Project::open(root)?;
    project.handler.perform::<DeleteTeamSubject>(
        &actor,
        &DeleteTeamSubjectParams {
            group_id,
            subject_id,
        },
    )?;

    if globals.json {
        print_json(&serde_json::json!({ "subject_id": subject_id, "deleted": true }))?;
    } else {
        println!("Removed subject {subject_id}");
    }
    Ok(())
}

fn list(root: &Path, team_id: u64, json: bool) -> anyhow::Result<()> {
    let project = Project::open(root)?;
    let subjects = project.directory()?.subjects(team_id)?;

    if json {
        print_json(&subjects)?;
        return Ok(());
    }
    if subjects.is_empty() {
        println!("No subjects in team {team_id}.");
        return Ok(());
    }
    let rows = subjects
        .iter()
        .map(|s| {
            vec![
                s.id.to_string(),
                s.subject_type.clone(),
                s.subject_id.to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "TYPE", "USER"], rows);
    Ok(())
}
