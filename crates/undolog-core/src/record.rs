//! Action record data model.
//!
//! An `ActionRecord` is one entry in the action log: which action type ran,
//! for whom, in which session and scope, with the params it ran with and the
//! reversal state its action type captured.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, UndoError};
use crate::scope::Scope;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Position of a record in the log. Assigned by the store on append and
/// strictly increasing, so it doubles as the ordering key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(UndoError::InvalidSession(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Groups several records so they undo and redo as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionGroupId(pub Uuid);

impl ActionGroupId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActionGroupId {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// Who performs an action, and under which session it is recorded.
///
/// Actions performed without a session are logged but never become
/// undo/redo targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user: UserId,
    #[serde(default)]
    pub session: Option<SessionId>,
    #[serde(default)]
    pub action_group: Option<ActionGroupId>,
}

impl Actor {
    pub fn new(user: UserId) -> Self {
        Self {
            user,
            session: None,
            action_group: None,
        }
    }

    pub fn with_session(mut self, session: SessionId) -> Self {
        self.session = Some(session);
        self
    }

    pub fn with_action_group(mut self, group: ActionGroupId) -> Self {
        self.action_group = Some(group);
        self
    }
}

// ---------------------------------------------------------------------------
// RecordState
// ---------------------------------------------------------------------------

/// Transitions: `Applied → Undone` (undo), `Undone → Applied` (redo).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordState {
    Applied,
    Undone,
}

impl RecordState {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordState::Applied => "applied",
            RecordState::Undone => "undone",
        }
    }
}

impl fmt::Display for RecordState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ActionRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// `RecordId(0)` until the store assigns the real sequence on append.
    pub id: RecordId,
    pub type_key: String,
    pub actor: UserId,
    pub session: Option<SessionId>,
    pub scope: Scope,
    #[serde(default)]
    pub action_group: Option<ActionGroupId>,
    /// Human-readable summary, e.g. `Create team "sales"`.
    pub description: String,
    pub params: serde_json::Value,
    pub reversal: serde_json::Value,
    pub state: RecordState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ActionRecord {
    /// A freshly applied record, not yet appended.
    pub fn applied(
        type_key: impl Into<String>,
        actor: &Actor,
        scope: Scope,
        description: impl Into<String>,
        params: serde_json::Value,
        reversal: serde_json::Value,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId(0),
            type_key: type_key.into(),
            actor: actor.user,
            session: actor.session.clone(),
            scope,
            action_group: actor.action_group,
            description: description.into(),
            params,
            reversal,
            state: RecordState::Applied,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_applied(&self) -> bool {
        self.state == RecordState::Applied
    }

    pub fn is_undone(&self) -> bool {
        self.state == RecordState::Undone
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_rejects_blank() {
        assert!(matches!(
            SessionId::new("  "),
            Err(UndoError::InvalidSession(_))
        ));
        assert_eq!(SessionId::new("s-1").unwrap().as_str(), "s-1");
    }

    #[test]
    fn applied_record_copies_actor_context() {
        let group = ActionGroupId::new();
        let actor = Actor::new(UserId(7))
            .with_session(SessionId::new("s").unwrap())
            .with_action_group(group);
        let record = ActionRecord::applied(
            "create_team",
            &actor,
            Scope::new("teams", 1),
            "Create team",
            serde_json::json!({"name": "a"}),
            serde_json::json!({"team_id": 1}),
        );
        assert_eq!(record.actor, UserId(7));
        assert_eq!(record.session.as_ref().map(|s| s.as_str()), Some("s"));
        assert_eq!(record.action_group, Some(group));
        assert!(record.is_applied());
        assert_eq!(record.id, RecordId(0));
    }

    #[test]
    fn record_state_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&RecordState::Undone).unwrap(),
            "\"undone\""
        );
    }
}
