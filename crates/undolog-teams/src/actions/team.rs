use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use undolog_core::{ActionContext, ActionError, ActionType, Applied, Scope};

use crate::model::{teams_scope, Team, TeamSubject};
use crate::repo::{self, Repo};

use super::{team_name, unrestorable};

// ---------------------------------------------------------------------------
// create_team
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeamParams {
    pub group_id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedTeam {
    pub team_id: u64,
    pub created_at: DateTime<Utc>,
}

/// Undone by deleting the team, redone by recreating it under the same id.
pub struct CreateTeam;

impl ActionType for CreateTeam {
    const TYPE: &'static str = "create_team";
    type Params = CreateTeamParams;
    type Output = Team;
    type Reversal = CreatedTeam;

    fn scope(&self, params: &CreateTeamParams) -> Scope {
        teams_scope(params.group_id)
    }

    fn describe(&self, params: &CreateTeamParams) -> String {
        format!("Create team {:?}", params.name)
    }

    fn apply(
        &self,
        ctx: &ActionContext<'_>,
        params: &CreateTeamParams,
    ) -> Result<Applied<Team, CreatedTeam>, ActionError> {
        let repo = Repo::new(ctx.tx);
        repo.require_admin(params.group_id, ctx.actor.user)?;
        let name = team_name(&params.name)?;
        repo.check_name_free(params.group_id, name, None)?;

        let team = Team {
            id: repo::next_id(ctx.tx, "team")?,
            group_id: params.group_id,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        repo.put_team(&team)?;
        let reversal = CreatedTeam {
            team_id: team.id,
            created_at: team.created_at,
        };
        Ok(Applied::new(team, reversal))
    }

    fn undo(
        &self,
        ctx: &ActionContext<'_>,
        params: &CreateTeamParams,
        reversal: &CreatedTeam,
    ) -> Result<(), ActionError> {
        let repo = Repo::new(ctx.tx);
        repo.require_admin(params.group_id, ctx.actor.user)?;
        let team = repo.team_in(params.group_id, reversal.team_id)?;
        if team.name != team_name(&params.name)? {
            ctx.drift(format!("team {} was renamed to {:?}", team.id, team.name))?;
        }
        let subjects = repo.subjects(team.id)?;
        if !subjects.is_empty() {
            ctx.drift(format!(
                "team {} gained {} subject(s) since it was created",
                team.id,
                subjects.len()
            ))?;
        }
        for subject in &subjects {
            repo.remove_subject(subject.id)?;
        }
        repo.remove_team(team.id)?;
        Ok(())
    }

    fn redo(
        &self,
        ctx: &ActionContext<'_>,
        params: &CreateTeamParams,
        reversal: &CreatedTeam,
    ) -> Result<Applied<Team, CreatedTeam>, ActionError> {
        let repo = Repo::new(ctx.tx);
        repo.require_admin(params.group_id, ctx.actor.user)?;
        if repo.team(reversal.team_id)?.is_some() {
            return Err(ActionError::Irreversible(format!(
                "team {} already exists",
                reversal.team_id
            )));
        }
        let name = team_name(&params.name)?;
        repo.check_name_free(params.group_id, name, None)
            .map_err(unrestorable)?;

        let team = Team {
            id: reversal.team_id,
            group_id: params.group_id,
            name: name.to_string(),
            created_at: reversal.created_at,
        };
        repo.put_team(&team)?;
        Ok(Applied::new(team, reversal.clone()))
    }
}

// ---------------------------------------------------------------------------
// update_team
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTeamParams {
    pub group_id: u64,
    pub team_id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviousName {
    pub previous_name: String,
}

/// Renames a team; undone by restoring the previous name.
pub struct UpdateTeam;

impl ActionType for UpdateTeam {
    const TYPE: &'static str = "update_team";
    type Params = UpdateTeamParams;
    type Output = Team;
    type Reversal = PreviousName;

    fn scope(&self, params: &UpdateTeamParams) -> Scope {
        teams_scope(params.group_id)
    }

    fn describe(&self, params: &UpdateTeamParams) -> String {
        format!("Rename team {} to {:?}", params.team_id, params.name)
    }

    fn apply(
        &self,
        ctx: &ActionContext<'_>,
        params: &UpdateTeamParams,
    ) -> Result<Applied<Team, PreviousName>, ActionError> {
        let repo = Repo::new(ctx.tx);
        repo.require_admin(params.group_id, ctx.actor.user)?;
        let mut team = repo.team_in(params.group_id, params.team_id)?;
        let name = team_name(&params.name)?;
        repo.check_name_free(params.group_id, name, Some(team.id))?;

        let previous_name = std::mem::replace(&mut team.name, name.to_string());
        repo.put_team(&team)?;
        Ok(Applied::new(team, PreviousName { previous_name }))
    }

    fn undo(
        &self,
        ctx: &ActionContext<'_>,
        params: &UpdateTeamParams,
        reversal: &PreviousName,
    ) -> Result<(), ActionError> {
        let repo = Repo::new(ctx.tx);
        repo.require_admin(params.group_id, ctx.actor.user)?;
        let mut team = repo.team_in(params.group_id, params.team_id)?;
        if team.name != team_name(&params.name)? {
            ctx.drift(format!(
                "team {} was renamed to {:?} since",
                team.id, team.name
            ))?;
        }
        repo.check_name_free(params.group_id, &reversal.previous_name, Some(team.id))
            .map_err(unrestorable)?;
        team.name = reversal.previous_name.clone();
        repo.put_team(&team)?;
        Ok(())
    }

    fn redo(
        &self,
        ctx: &ActionContext<'_>,
        params: &UpdateTeamParams,
        reversal: &PreviousName,
    ) -> Result<Applied<Team, PreviousName>, ActionError> {
        let repo = Repo::new(ctx.tx);
        repo.require_admin(params.group_id, ctx.actor.user)?;
        let mut team = repo.team_in(params.group_id, params.team_id)?;
        if team.name != reversal.previous_name {
            ctx.drift(format!(
                "team {} was renamed to {:?} since",
                team.id, team.name
            ))?;
        }
        let name = team_name(&params.name)?;
        repo.check_name_free(params.group_id, name, Some(team.id))
            .map_err(unrestorable)?;

        let previous_name = std::mem::replace(&mut team.name, name.to_string());
        repo.put_team(&team)?;
        Ok(Applied::new(team, PreviousName { previous_name }))
    }
}

// ---------------------------------------------------------------------------
// delete_team
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTeamParams {
    pub group_id: u64,
    pub team_id: u64,
}

/// Everything needed to put a deleted team back exactly as it was.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedTeam {
    pub team: Team,
    pub subjects: Vec<TeamSubject>,
}

/// Deletes a team and its subjects; undo reconstructs both with the same ids.
pub struct DeleteTeam;

impl DeleteTeam {
    fn delete(repo: &Repo<'_>, group_id: u64, team_id: u64) -> Result<DeletedTeam, ActionError> {
        let team = repo.team_in(group_id, team_id)?;
        let subjects = repo.subjects(team.id)?;
        for subject in &subjects {
            repo.remove_subject(subject.id)?;
        }
        repo.remove_team(team.id)?;
        Ok(DeletedTeam { team, subjects })
    }
}

impl ActionType for DeleteTeam {
    const TYPE: &'static str = "delete_team";
    type Params = DeleteTeamParams;
    type Output = ();
    type Reversal = DeletedTeam;

    fn scope(&self, params: &DeleteTeamParams) -> Scope {
        teams_scope(params.group_id)
    }

    fn describe(&self, params: &DeleteTeamParams) -> String {
        format!("Delete team {}", params.team_id)
    }

    fn apply(
        &self,
        ctx: &ActionContext<'_>,
        params: &DeleteTeamParams,
    ) -> Result<Applied<(), DeletedTeam>, ActionError> {
        let repo = Repo::new(ctx.tx);
        repo.require_admin(params.group_id, ctx.actor.user)?;
        let deleted = Self::delete(&repo, params.group_id, params.team_id)?;
        Ok(Applied::new((), deleted))
    }

    fn undo(
        &self,
        ctx: &ActionContext<'_>,
        params: &DeleteTeamParams,
        reversal: &DeletedTeam,
    ) -> Result<(), ActionError> {
        let repo = Repo::new(ctx.tx);
        repo.require_admin(params.group_id, ctx.actor.user)?;
        let team = &reversal.team;
        if repo.team(team.id)?.is_some() {
            return Err(ActionError::Irreversible(format!(
                "team {} already exists",
                team.id
            )));
        }
        repo.check_name_free(team.group_id, &team.name, None)
            .map_err(unrestorable)?;

        repo.put_team(team)?;
        for subject in &reversal.subjects {
            if repo.user(subject.subject_id)?.is_none() {
                ctx.drift(format!(
                    "subject user {} no longer exists",
                    subject.subject_id
                ))?;
                continue;
            }
            repo.put_subject(subject)?;
        }
        Ok(())
    }

    fn redo(
        &self,
        ctx: &ActionContext<'_>,
        params: &DeleteTeamParams,
        _reversal: &DeletedTeam,
    ) -> Result<Applied<(), DeletedTeam>, ActionError> {
        let repo = Repo::new(ctx.tx);
        repo.require_admin(params.group_id, ctx.actor.user)?;
        let deleted = Self::delete(&repo, params.group_id, params.team_id)?;
        Ok(Applied::new((), deleted))
    }
}
