use crate::context::{Globals, Project};
use crate::output::print_json;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum UserSubcommand {
    /// Register a user by email
    Add { email: String },
}

pub fn run(root: &Path, subcmd: UserSubcommand, globals: &Globals) -> anyhow::Result<()> {
    match subcmd {
        UserSubcommand::Add { email } => add(root, &email, globals.json),
    }
}

fn add(root: &Path, email: &str, json: bool) -> anyhow::Result<()> {
    let project = Project::open(root)?;
    let user = project.directory()?.create_user(email)?;

    if json {
        print_json(&user)?;
    } else {
        println!("Created user {}: {}", user.id, user.email);
    }
    Ok(())
}
