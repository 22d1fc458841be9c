//! Undoable team actions.
//!
//! Every action is scoped `teams:<group_id>` and requires the actor to be an
//! admin of that group, both when applied and when undone or redone.

mod subject;
mod team;

pub use subject::{
    CreateTeamSubject, CreateTeamSubjectParams, CreatedSubject, DeleteTeamSubject,
    DeleteTeamSubjectParams, DeletedSubject,
};
pub use team::{
    CreateTeam, CreateTeamParams, CreatedTeam, DeleteTeam, DeleteTeamParams, DeletedTeam,
    PreviousName, UpdateTeam, UpdateTeamParams,
};

use std::sync::Arc;

use undolog_core::{ActionError, ActionTypeRegistry, RegistryBuilder};

use crate::error::TeamsError;

/// Register every team action type on `builder`.
pub fn register(builder: &mut RegistryBuilder) -> undolog_core::Result<()> {
    builder
        .register(CreateTeam)?
        .register(UpdateTeam)?
        .register(DeleteTeam)?
        .register(CreateTeamSubject)?
        .register(DeleteTeamSubject)?;
    Ok(())
}

/// A registry holding only the team action types.
pub fn registry() -> undolog_core::Result<Arc<ActionTypeRegistry>> {
    let mut builder = RegistryBuilder::new();
    register(&mut builder)?;
    Ok(builder.build())
}

fn team_name(name: &str) -> Result<&str, TeamsError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TeamsError::EmptyName);
    }
    Ok(name)
}

/// A constraint that blocks restoring an entity makes the action irreversible.
fn unrestorable(e: TeamsError) -> ActionError {
    ActionError::Irreversible(e.to_string())
}
