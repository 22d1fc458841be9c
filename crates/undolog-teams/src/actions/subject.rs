use serde::{Deserialize, Serialize};
use undolog_core::{ActionContext, ActionError, ActionType, Applied, Scope, UserId};

use crate::error::TeamsError;
use crate::model::{teams_scope, SubjectRef, TeamSubject, User, AUTH_USER};
use crate::repo::{self, Repo};

fn default_subject_type() -> String {
    AUTH_USER.to_string()
}

fn resolve_user(repo: &Repo<'_>, subject: &SubjectRef) -> Result<User, TeamsError> {
    let user = match subject {
        SubjectRef::Id { id } => repo.user(*id)?,
        SubjectRef::Email { email } => repo.user_by_email(email)?,
    };
    user.ok_or_else(|| TeamsError::UserNotFound(subject.to_string()))
}

// ---------------------------------------------------------------------------
// create_team_subject
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeamSubjectParams {
    pub group_id: u64,
    pub team_id: u64,
    pub subject: SubjectRef,
    #[serde(default = "default_subject_type")]
    pub subject_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedSubject {
    pub subject_id: u64,
    pub user: UserId,
}

/// Adds a user to a team, named either by id or by email.
pub struct CreateTeamSubject;

impl ActionType for CreateTeamSubject {
    const TYPE: &'static str = "create_team_subject";
    type Params = CreateTeamSubjectParams;
    type Output = TeamSubject;
    type Reversal = CreatedSubject;

    fn scope(&self, params: &CreateTeamSubjectParams) -> Scope {
        teams_scope(params.group_id)
    }

    fn describe(&self, params: &CreateTeamSubjectParams) -> String {
        format!("Add {} to team {}", params.subject, params.team_id)
    }

    fn apply(
        &self,
        ctx: &ActionContext<'_>,
        params: &CreateTeamSubjectParams,
    ) -> Result<Applied<TeamSubject, CreatedSubject>, ActionError> {
        let repo = Repo::new(ctx.tx);
        repo.require_admin(params.group_id, ctx.actor.user)?;
        if params.subject_type != AUTH_USER {
            return Err(TeamsError::UnsupportedSubjectType(params.subject_type.clone()).into());
        }
        let team = repo.team_in(params.group_id, params.team_id)?;
        let user = resolve_user(&repo, &params.subject)?;
        if repo.find_subject(team.id, user.id)?.is_some() {
            return Err(TeamsError::DuplicateSubject {
                team: team.id,
                user: user.id,
            }
            .into());
        }

        let subject = TeamSubject {
            id: repo::next_id(ctx.tx, "subject")?,
            team_id: team.id,
            subject_type: params.subject_type.clone(),
            subject_id: user.id,
        };
        repo.put_subject(&subject)?;
        let reversal = CreatedSubject {
            subject_id: subject.id,
            user: user.id,
        };
        Ok(Applied::new(subject, reversal))
    }

    fn undo(
        &self,
        ctx: &ActionContext<'_>,
        params: &CreateTeamSubjectParams,
        reversal: &CreatedSubject,
    ) -> Result<(), ActionError> {
        let repo = Repo::new(ctx.tx);
        repo.require_admin(params.group_id, ctx.actor.user)?;
        if !repo.remove_subject(reversal.subject_id)? {
            return Err(TeamsError::SubjectNotFound(reversal.subject_id).into());
        }
        Ok(())
    }

    fn redo(
        &self,
        ctx: &ActionContext<'_>,
        params: &CreateTeamSubjectParams,
        reversal: &CreatedSubject,
    ) -> Result<Applied<TeamSubject, CreatedSubject>, ActionError> {
        let repo = Repo::new(ctx.tx);
        repo.require_admin(params.group_id, ctx.actor.user)?;
        let team = repo.team_in(params.group_id, params.team_id)?;
        if repo.user(reversal.user)?.is_none() {
            return Err(TeamsError::UserNotFound(reversal.user.to_string()).into());
        }
        if let Some(existing) = repo.find_subject(team.id, reversal.user)? {
            return Err(ActionError::Irreversible(format!(
                "user {} was added to team {} again as subject {}",
                reversal.user, team.id, existing.id
            )));
        }

        let subject = TeamSubject {
            id: reversal.subject_id,
            team_id: team.id,
            subject_type: params.subject_type.clone(),
            subject_id: reversal.user,
        };
        repo.put_subject(&subject)?;
        Ok(Applied::new(subject, reversal.clone()))
    }
}

// ---------------------------------------------------------------------------
// delete_team_subject
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTeamSubjectParams {
    pub group_id: u64,
    pub subject_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedSubject {
    pub subject: TeamSubject,
}

pub struct DeleteTeamSubject;

impl DeleteTeamSubject {
    fn delete(repo: &Repo<'_>, group_id: u64, subject_id: u64) -> Result<TeamSubject, ActionError> {
        let subject = repo
            .subject(subject_id)?
            .ok_or(TeamsError::SubjectNotFound(subject_id))?;
        // The subject's team must sit in the scope the action is recorded under.
        repo.team_in(group_id, subject.team_id)?;
        repo.remove_subject(subject.id)?;
        Ok(subject)
    }
}

impl ActionType for DeleteTeamSubject {
    const TYPE: &'static str = "delete_team_subject";
    type Params = DeleteTeamSubjectParams;
    type Output = ();
    type Reversal = DeletedSubject;

    fn scope(&self, params: &DeleteTeamSubjectParams) -> Scope {
        teams_scope(params.group_id)
    }

    fn describe(&self, params: &DeleteTeamSubjectParams) -> String {
        format!("Remove team subject {}", params.subject_id)
    }

    fn apply(
        &self,
        ctx: &ActionContext<'_>,
        params: &DeleteTeamSubjectParams,
    ) -> Result<Applied<(), DeletedSubject>, ActionError> {
        let repo = Repo::new(ctx.tx);
        repo.require_admin(params.group_id, ctx.actor.user)?;
        let subject = Self::delete(&repo, params.group_id, params.subject_id)?;
        Ok(Applied::new((), DeletedSubject { subject }))
    }

    fn undo(
        &self,
        ctx: &ActionContext<'_>,
        params: &DeleteTeamSubjectParams,
        reversal: &DeletedSubject,
    ) -> Result<(), ActionError> {
        let repo = Repo::new(ctx.tx);
        repo.require_admin(params.group_id, ctx.actor.user)?;
        let subject = &reversal.subject;
        let team = repo.team_in(params.group_id, subject.team_id)?;
        if repo.subject(subject.id)?.is_some() {
            return Err(ActionError::Irreversible(format!(
                "team subject {} already exists",
                subject.id
            )));
        }
        if let Some(existing) = repo.find_subject(team.id, subject.subject_id)? {
            // Someone re-added the user; the membership is already in place.
            ctx.drift(format!(
                "user {} was re-added to team {} as subject {}",
                subject.subject_id, team.id, existing.id
            ))?;
            return Ok(());
        }
        if repo.user(subject.subject_id)?.is_none() {
            return Err(TeamsError::UserNotFound(subject.subject_id.to_string()).into());
        }
        repo.put_subject(subject)?;
        Ok(())
    }

    fn redo(
        &self,
        ctx: &ActionContext<'_>,
        params: &DeleteTeamSubjectParams,
        _reversal: &DeletedSubject,
    ) -> Result<Applied<(), DeletedSubject>, ActionError> {
        let repo = Repo::new(ctx.tx);
        repo.require_admin(params.group_id, ctx.actor.user)?;
        let subject = Self::delete(&repo, params.group_id, params.subject_id)?;
        Ok(Applied::new((), DeletedSubject { subject }))
    }
}
