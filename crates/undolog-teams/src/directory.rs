//! Users, groups and memberships, plus read access to teams.
//!
//! Directory writes are setup, not actions: they are not logged and cannot be
//! undone. Each one commits its own write transaction.

use redb::{ReadTransaction, WriteTransaction};
use undolog_core::{ActionStore, UserId};

use crate::error::{Result, TeamsError};
use crate::model::{Group, GroupRole, Team, TeamSubject, User};
use crate::repo::{self, Repo};

pub struct Directory<'a> {
    store: &'a ActionStore,
}

impl<'a> Directory<'a> {
    /// Bind to `store`, creating the domain tables if needed.
    pub fn open(store: &'a ActionStore) -> Result<Self> {
        let dir = Self { store };
        dir.write(repo::create_tables)?;
        Ok(dir)
    }

    fn write<T>(&self, f: impl FnOnce(&WriteTransaction) -> Result<T>) -> Result<T> {
        let tx = self.store.begin_write()?;
        match f(&tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(e) => {
                tx.abort()?;
                Err(e)
            }
        }
    }

    fn read(&self) -> Result<ReadTransaction> {
        Ok(self.store.begin_read()?)
    }

    // -----------------------------------------------------------------------
    // Setup
    // -----------------------------------------------------------------------

    pub fn create_user(&self, email: &str) -> Result<User> {
        let email = repo::normalize_email(email)?;
        let user = self.write(|tx| {
            let repo = Repo::new(tx);
            if repo.user_by_email(&email)?.is_some() {
                return Err(TeamsError::EmailTaken(email.clone()));
            }
            let user = User {
                id: UserId(repo::next_id(tx, "user")?),
                email: email.clone(),
            };
            repo.insert_user(&user)?;
            Ok(user)
        })?;
        tracing::debug!(user = %user.id, email = %user.email, "created user");
        Ok(user)
    }

    /// Create a group administered by `owner`.
    pub fn create_group(&self, name: &str, owner: UserId) -> Result<Group> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TeamsError::EmptyName);
        }
        let group = self.write(|tx| {
            let repo = Repo::new(tx);
            if repo.user(owner)?.is_none() {
                return Err(TeamsError::UserNotFound(owner.to_string()));
            }
            let group = Group {
                id: repo::next_id(tx, "group")?,
                name: name.to_string(),
            };
            repo.insert_group(&group)?;
            repo.set_role(group.id, owner, GroupRole::Admin)?;
            Ok(group)
        })?;
        tracing::debug!(group = group.id, owner = %owner, "created group");
        Ok(group)
    }

    /// Add `user` to `group_id`, or change their role if already a member.
    pub fn add_member(&self, group_id: u64, user: UserId, role: GroupRole) -> Result<()> {
        self.write(|tx| {
            let repo = Repo::new(tx);
            if repo.group(group_id)?.is_none() {
                return Err(TeamsError::GroupNotFound(group_id));
            }
            if repo.user(user)?.is_none() {
                return Err(TeamsError::UserNotFound(user.to_string()));
            }
            repo.set_role(group_id, user, role)
        })
    }

    pub fn remove_member(&self, group_id: u64, user: UserId) -> Result<()> {
        self.write(|tx| {
            if !Repo::new(tx).remove_member(group_id, user)? {
                return Err(TeamsError::NotAMember {
                    group: group_id,
                    user,
                });
            }
            Ok(())
        })
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub fn user(&self, id: UserId) -> Result<Option<User>> {
        repo::get_json(&self.read()?.open_table(repo::USERS)?, id.0)
    }

    pub fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = repo::normalize_email(email)?;
        let rt = self.read()?;
        let id = rt
            .open_table(repo::USER_EMAILS)?
            .get(email.as_str())?
            .map(|v| v.value());
        match id {
            Some(id) => repo::get_json(&rt.open_table(repo::USERS)?, id),
            None => Ok(None),
        }
    }

    pub fn group(&self, id: u64) -> Result<Option<Group>> {
        repo::get_json(&self.read()?.open_table(repo::GROUPS)?, id)
    }

    pub fn role(&self, group_id: u64, user: UserId) -> Result<Option<GroupRole>> {
        repo::role_in(&self.read()?.open_table(repo::MEMBERS)?, group_id, user)
    }

    pub fn team(&self, id: u64) -> Result<Option<Team>> {
        repo::get_json(&self.read()?.open_table(repo::TEAMS)?, id)
    }

    /// Teams of `group_id`, ordered by id.
    pub fn teams(&self, group_id: u64) -> Result<Vec<Team>> {
        repo::teams_in(&self.read()?.open_table(repo::TEAMS)?, group_id)
    }

    pub fn subject(&self, id: u64) -> Result<Option<TeamSubject>> {
        repo::get_json(&self.read()?.open_table(repo::SUBJECTS)?, id)
    }

    /// Subjects of `team_id`, ordered by id.
    pub fn subjects(&self, team_id: u64) -> Result<Vec<TeamSubject>> {
        repo::subjects_of(&self.read()?.open_table(repo::SUBJECTS)?, team_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_tmp() -> (TempDir, ActionStore) {
        let dir = TempDir::new().unwrap();
        let store = ActionStore::open(&dir.path().join("actions.redb")).unwrap();
        (dir, store)
    }

    #[test]
    fn users_get_sequential_ids_and_unique_emails() {
        let (_dir, store) = open_tmp();
        let dir = Directory::open(&store).unwrap();
        let a = dir.create_user("Alice@Example.com").unwrap();
        let b = dir.create_user("bob@example.com").unwrap();
        assert_eq!(a.id, UserId(1));
        assert_eq!(b.id, UserId(2));
        assert_eq!(a.email, "alice@example.com");

        assert!(matches!(
            dir.create_user(" alice@example.com "),
            Err(TeamsError::EmailTaken(_))
        ));
        assert!(matches!(
            dir.create_user("not-an-email"),
            Err(TeamsError::InvalidEmail(_))
        ));
        assert_eq!(dir.user_by_email("ALICE@example.com").unwrap(), Some(a));
    }

    #[test]
    fn group_owner_is_admin() {
        let (_dir, store) = open_tmp();
        let dir = Directory::open(&store).unwrap();
        let owner = dir.create_user("owner@example.com").unwrap();
        let group = dir.create_group("Acme", owner.id).unwrap();
        assert_eq!(dir.role(group.id, owner.id).unwrap(), Some(GroupRole::Admin));
        assert_eq!(dir.group(group.id).unwrap().unwrap().name, "Acme");
    }

    #[test]
    fn membership_can_be_added_changed_and_removed() {
        let (_dir, store) = open_tmp();
        let dir = Directory::open(&store).unwrap();
        let owner = dir.create_user("owner@example.com").unwrap();
        let other = dir.create_user("other@example.com").unwrap();
        let group = dir.create_group("Acme", owner.id).unwrap();

        dir.add_member(group.id, other.id, GroupRole::Member).unwrap();
        assert_eq!(dir.role(group.id, other.id).unwrap(), Some(GroupRole::Member));
        dir.add_member(group.id, other.id, GroupRole::Admin).unwrap();
        assert_eq!(dir.role(group.id, other.id).unwrap(), Some(GroupRole::Admin));

        dir.remove_member(group.id, other.id).unwrap();
        assert_eq!(dir.role(group.id, other.id).unwrap(), None);
        assert!(matches!(
            dir.remove_member(group.id, other.id),
            Err(TeamsError::NotAMember { .. })
        ));
    }

    #[test]
    fn setup_errors_leave_nothing_behind() {
        let (_dir, store) = open_tmp();
        let dir = Directory::open(&store).unwrap();
        assert!(matches!(
            dir.create_group("Acme", UserId(9)),
            Err(TeamsError::UserNotFound(_))
        ));
        assert!(dir.group(1).unwrap().is_none());
        assert!(matches!(
            dir.add_member(5, UserId(1), GroupRole::Member),
            Err(TeamsError::GroupNotFound(5))
        ));
        assert!(matches!(dir.create_group("  ", UserId(1)), Err(TeamsError::EmptyName)));
    }

    #[test]
    fn directory_writes_are_not_logged() {
        let (_dir, store) = open_tmp();
        let dir = Directory::open(&store).unwrap();
        let owner = dir.create_user("owner@example.com").unwrap();
        dir.create_group("Acme", owner.id).unwrap();
        assert!(store.is_empty().unwrap());
    }
}
