//! Scopes partition the action log for undo/redo isolation.
//!
//! A scope renders as `<kind>:<id>` (e.g. `teams:42`). The kind names a
//! family of actions, the id the entity that owns them. Matching is exact:
//! an undo/redo request lists the scopes it may touch and a record is
//! eligible when its scope equals any of them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UndoError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Scope {
    kind: String,
    id: String,
}

impl Scope {
    /// Build a scope from a kind and the owning entity's id.
    pub fn new(kind: impl Into<String>, id: impl fmt::Display) -> Self {
        Self {
            kind: kind.into(),
            id: id.to_string(),
        }
    }

    /// Fails with `InvalidScope` unless the scope renders to a string that
    /// parses back to itself: kind and id non-empty, no `:` in the kind.
    ///
    /// Records are stored with their scope rendered, so a scope that fails
    /// this could be written but never read back.
    pub fn validate(&self) -> Result<(), UndoError> {
        if self.kind.is_empty() || self.id.is_empty() || self.kind.contains(':') {
            return Err(UndoError::InvalidScope(self.to_string()));
        }
        Ok(())
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

impl FromStr for Scope {
    type Err = UndoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s
            .split_once(':')
            .ok_or_else(|| UndoError::InvalidScope(s.to_string()))?;
        let scope = Scope::new(kind, id);
        scope.validate()?;
        Ok(scope)
    }
}

impl TryFrom<String> for Scope {
    type Error = UndoError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        scope.to_string()
    }
}

/// True when `record_scope` equals any of the `requested` scopes.
pub fn matches(record_scope: &Scope, requested: &[Scope]) -> bool {
    requested.iter().any(|s| s == record_scope)
}

/// Drop repeated scopes while keeping the caller's order.
pub(crate) fn dedup(scopes: &[Scope]) -> Vec<Scope> {
    let mut out: Vec<Scope> = Vec::with_capacity(scopes.len());
    for s in scopes {
        if !out.contains(s) {
            out.push(s.clone());
        }
    }
    out
}
