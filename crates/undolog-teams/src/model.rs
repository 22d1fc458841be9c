use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use undolog_core::{Scope, UserId};

/// Scope kind every team action is recorded under: `teams:<group_id>`.
pub const TEAMS_SCOPE: &str = "teams";

/// The only subject type teams currently accept.
pub const AUTH_USER: &str = "auth_user";

pub fn teams_scope(group_id: u64) -> Scope {
    Scope::new(TEAMS_SCOPE, group_id)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupRole {
    Admin,
    Member,
}

impl GroupRole {
    pub fn as_str(self) -> &'static str {
        match self {
            GroupRole::Admin => "admin",
            GroupRole::Member => "member",
        }
    }

    pub(crate) fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(GroupRole::Admin),
            1 => Some(GroupRole::Member),
            _ => None,
        }
    }

    pub(crate) fn code(self) -> u8 {
        match self {
            GroupRole::Admin => 0,
            GroupRole::Member => 1,
        }
    }
}

impl fmt::Display for GroupRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GroupRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(GroupRole::Admin),
            "member" => Ok(GroupRole::Member),
            other => Err(format!("unknown group role '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: u64,
    pub group_id: u64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSubject {
    pub id: u64,
    pub team_id: u64,
    pub subject_type: String,
    pub subject_id: UserId,
}

/// How a caller names the user to add to a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubjectRef {
    Id { id: UserId },
    Email { email: String },
}

impl fmt::Display for SubjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectRef::Id { id } => write!(f, "user {id}"),
            SubjectRef::Email { email } => f.write_str(email),
        }
    }
}
