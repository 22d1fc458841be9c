//! redb tables for the teams domain.
//!
//! The tables live in the action store's database so a team change and the
//! action record describing it commit in the same write transaction.
//! Entity bodies are stored as JSON keyed by their numeric id.

use redb::{ReadableTable, TableDefinition, WriteTransaction};
use serde::de::DeserializeOwned;
use serde::Serialize;
use undolog_core::UserId;

use crate::error::{Result, TeamsError};
use crate::model::{Group, GroupRole, Team, TeamSubject, User};

pub(crate) const USERS: TableDefinition<u64, &[u8]> = TableDefinition::new("teams_users");
pub(crate) const USER_EMAILS: TableDefinition<&str, u64> =
    TableDefinition::new("teams_user_emails");
pub(crate) const GROUPS: TableDefinition<u64, &[u8]> = TableDefinition::new("teams_groups");
/// `(group_id, user_id) → role code`.
pub(crate) const MEMBERS: TableDefinition<(u64, u64), u8> =
    TableDefinition::new("teams_members");
pub(crate) const TEAMS: TableDefinition<u64, &[u8]> = TableDefinition::new("teams_teams");
pub(crate) const SUBJECTS: TableDefinition<u64, &[u8]> = TableDefinition::new("teams_subjects");
const COUNTERS: TableDefinition<&str, u64> = TableDefinition::new("teams_counters");

pub(crate) fn create_tables(tx: &WriteTransaction) -> Result<()> {
    tx.open_table(USERS)?;
    tx.open_table(USER_EMAILS)?;
    tx.open_table(GROUPS)?;
    tx.open_table(MEMBERS)?;
    tx.open_table(TEAMS)?;
    tx.open_table(SUBJECTS)?;
    tx.open_table(COUNTERS)?;
    Ok(())
}

/// Allocate the next id for `kind`. Ids start at 1 and are never reused, so
/// an entity restored by undo can take its old id back.
pub(crate) fn next_id(tx: &WriteTransaction, kind: &str) -> Result<u64> {
    let mut counters = tx.open_table(COUNTERS)?;
    let id = counters.get(kind)?.map(|v| v.value()).unwrap_or(1);
    counters.insert(kind, id + 1)?;
    Ok(id)
}

pub(crate) fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(TeamsError::InvalidEmail(email));
    }
    Ok(email)
}

// ---------------------------------------------------------------------------
// Scans shared by read and write transactions
// ---------------------------------------------------------------------------

pub(crate) fn get_json<T, Tb>(table: &Tb, id: u64) -> Result<Option<T>>
where
    T: DeserializeOwned,
    Tb: ReadableTable<u64, &'static [u8]>,
{
    match table.get(id)? {
        Some(raw) => Ok(Some(serde_json::from_slice(raw.value())?)),
        None => Ok(None),
    }
}

pub(crate) fn role_in<Tb>(members: &Tb, group_id: u64, user: UserId) -> Result<Option<GroupRole>>
where
    Tb: ReadableTable<(u64, u64), u8>,
{
    Ok(members
        .get((group_id, user.0))?
        .and_then(|v| GroupRole::from_code(v.value())))
}

pub(crate) fn teams_in<Tb>(teams: &Tb, group_id: u64) -> Result<Vec<Team>>
where
    Tb: ReadableTable<u64, &'static [u8]>,
{
    let mut result = Vec::new();
    for entry in teams.iter()? {
        let (_, raw) = entry?;
        let team: Team = serde_json::from_slice(raw.value())?;
        if team.group_id == group_id {
            result.push(team);
        }
    }
    Ok(result)
}

pub(crate) fn subjects_of<Tb>(subjects: &Tb, team_id: u64) -> Result<Vec<TeamSubject>>
where
    Tb: ReadableTable<u64, &'static [u8]>,
{
    let mut result = Vec::new();
    for entry in subjects.iter()? {
        let (_, raw) = entry?;
        let subject: TeamSubject = serde_json::from_slice(raw.value())?;
        if subject.team_id == team_id {
            result.push(subject);
        }
    }
    Ok(result)
}

// ---------------------------------------------------------------------------
// Repo: typed access inside one write transaction
// ---------------------------------------------------------------------------

/// Domain reads and writes bound to the handler's write transaction.
pub(crate) struct Repo<'a> {
    tx: &'a WriteTransaction,
}

impl<'a> Repo<'a> {
    pub(crate) fn new(tx: &'a WriteTransaction) -> Self {
        Self { tx }
    }

    fn put<T: Serialize>(
        &self,
        def: TableDefinition<'_, u64, &'static [u8]>,
        id: u64,
        value: &T,
    ) -> Result<()> {
        let raw = serde_json::to_vec(value)?;
        let mut table = self.tx.open_table(def)?;
        table.insert(id, raw.as_slice())?;
        Ok(())
    }

    fn remove(&self, def: TableDefinition<'_, u64, &'static [u8]>, id: u64) -> Result<bool> {
        let mut table = self.tx.open_table(def)?;
        let removed = table.remove(id)?.is_some();
        Ok(removed)
    }

    // -- users / groups ----------------------------------------------------

    pub(crate) fn user(&self, id: UserId) -> Result<Option<User>> {
        get_json(&self.tx.open_table(USERS)?, id.0)
    }

    pub(crate) fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = normalize_email(email)?;
        let id = self
            .tx
            .open_table(USER_EMAILS)?
            .get(email.as_str())?
            .map(|v| v.value());
        match id {
            Some(id) => self.user(UserId(id)),
            None => Ok(None),
        }
    }

    pub(crate) fn insert_user(&self, user: &User) -> Result<()> {
        self.put(USERS, user.id.0, user)?;
        self.tx
            .open_table(USER_EMAILS)?
            .insert(user.email.as_str(), user.id.0)?;
        Ok(())
    }

    pub(crate) fn group(&self, id: u64) -> Result<Option<Group>> {
        get_json(&self.tx.open_table(GROUPS)?, id)
    }

    pub(crate) fn insert_group(&self, group: &Group) -> Result<()> {
        self.put(GROUPS, group.id, group)
    }

    pub(crate) fn role(&self, group_id: u64, user: UserId) -> Result<Option<GroupRole>> {
        role_in(&self.tx.open_table(MEMBERS)?, group_id, user)
    }

    pub(crate) fn set_role(&self, group_id: u64, user: UserId, role: GroupRole) -> Result<()> {
        self.tx
            .open_table(MEMBERS)?
            .insert((group_id, user.0), role.code())?;
        Ok(())
    }

    pub(crate) fn remove_member(&self, group_id: u64, user: UserId) -> Result<bool> {
        let removed = self.tx.open_table(MEMBERS)?.remove((group_id, user.0))?.is_some();
        Ok(removed)
    }

    /// Fails with `NotAdmin` unless `user` administers `group_id`.
    pub(crate) fn require_admin(&self, group_id: u64, user: UserId) -> Result<Group> {
        let group = self
            .group(group_id)?
            .ok_or(TeamsError::GroupNotFound(group_id))?;
        match self.role(group_id, user)? {
            Some(GroupRole::Admin) => Ok(group),
            _ => Err(TeamsError::NotAdmin {
                group: group_id,
                user,
            }),
        }
    }

    // -- teams ---------------------------------------------------------------

    pub(crate) fn team(&self, id: u64) -> Result<Option<Team>> {
        get_json(&self.tx.open_table(TEAMS)?, id)
    }

    /// The team `id`, provided it belongs to `group_id`.
    pub(crate) fn team_in(&self, group_id: u64, id: u64) -> Result<Team> {
        match self.team(id)? {
            Some(team) if team.group_id == group_id => Ok(team),
            _ => Err(TeamsError::TeamNotFound(id)),
        }
    }

    pub(crate) fn team_by_name(&self, group_id: u64, name: &str) -> Result<Option<Team>> {
        Ok(teams_in(&self.tx.open_table(TEAMS)?, group_id)?
            .into_iter()
            .find(|t| t.name == name))
    }

    /// Fails with `TeamNameTaken` if a team other than `except` uses `name`.
    pub(crate) fn check_name_free(
        &self,
        group_id: u64,
        name: &str,
        except: Option<u64>,
    ) -> Result<()> {
        match self.team_by_name(group_id, name)? {
            Some(t) if Some(t.id) != except => Err(TeamsError::TeamNameTaken(name.to_string())),
            _ => Ok(()),
        }
    }

    pub(crate) fn put_team(&self, team: &Team) -> Result<()> {
        self.put(TEAMS, team.id, team)
    }

    pub(crate) fn remove_team(&self, id: u64) -> Result<bool> {
        self.remove(TEAMS, id)
    }

    // -- subjects ------------------------------------------------------------

    pub(crate) fn subject(&self, id: u64) -> Result<Option<TeamSubject>> {
        get_json(&self.tx.open_table(SUBJECTS)?, id)
    }

    pub(crate) fn subjects(&self, team_id: u64) -> Result<Vec<TeamSubject>> {
        subjects_of(&self.tx.open_table(SUBJECTS)?, team_id)
    }

    pub(crate) fn find_subject(&self, team_id: u64, user: UserId) -> Result<Option<TeamSubject>> {
        Ok(self
            .subjects(team_id)?
            .into_iter()
            .find(|s| s.subject_id == user))
    }

    pub(crate) fn put_subject(&self, subject: &TeamSubject) -> Result<()> {
        self.put(SUBJECTS, subject.id, subject)
    }

    pub(crate) fn remove_subject(&self, id: u64) -> Result<bool> {
        self.remove(SUBJECTS, id)
    }
}
