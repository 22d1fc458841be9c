use crate::context::{Globals, Project};
use crate::output::print_json;
use clap::Subcommand;
use std::path::Path;
use undolog_core::UserId;
use undolog_teams::GroupRole;

#[derive(Subcommand)]
pub enum GroupSubcommand {
    /// Create a group administered by --user
    Add {
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// Manage group membership
    Member {
        #[command(subcommand)]
        subcommand: MemberSubcommand,
    },
}

#[derive(Subcommand)]
pub enum MemberSubcommand {
    /// Add a user to a group, or change their role
    Add {
        group_id: u64,
        user_id: u64,
        /// admin or member
        #[arg(long, default_value = "member")]
        role: GroupRole,
    },
    /// Remove a user from a group
    Remove { group_id: u64, user_id: u64 },
}

pub fn run(root: &Path, subcmd: GroupSubcommand, globals: &Globals) -> anyhow::Result<()> {
    match subcmd {
        GroupSubcommand::Add { name } => add(root, &name.join(" "), globals),
        GroupSubcommand::Member { subcommand } => match subcommand {
            MemberSubcommand::Add {
                group_id,
                user_id,
                role,
            } => add_member(root, group_id, UserId(user_id), role, globals.json),
            MemberSubcommand::Remove { group_id, user_id } => {
                remove_member(root, group_id, UserId(user_id), globals.json)
            }
        },
    }
}

fn add(root: &Path, name: &str, globals: &Globals) -> anyhow::Result<()> {
    let owner = globals.user()?;
    let project = Project::open(root)?;
    let group = project.directory()?.create_group(name, owner)?;

    if globals.json {
        print_json(&group)?;
    } else {
        println!("Created group {}: {} (admin: user {owner})", group.id, group.name);
    }
    Ok(())
}

fn add_member(
    root: &Path,
    group_id: u64,
    user: UserId,
    role: GroupRole,
    json: bool,
) -> anyhow::Result<()> {
    let project = Project::open(root)?;
    project.directory()?.add_member(group_id, user, role)?;

    if json {
        print_json(&serde_json::json!({ "group_id": group_id, "user_id": user, "role": role }))?;
    } else {
        println!("User {user} is now {role} of group {group_id}");
    }
    Ok(())
}

fn remove_member(root: &Path, group_id: u64, user: UserId, json: bool) -> anyhow::Result<()> {
    let project = Project::open(root)?;
    project.directory()?.remove_member(group_id, user)?;

    if json {
        print_json(&serde_json::json!({ "group_id": group_id, "user_id": user, "removed": true }))?;
    } else {
        println!("Removed user {user} from group {group_id}");
    }
    Ok(())
}
