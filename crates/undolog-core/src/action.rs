//! The reversible action contract.
//!
//! Domain modules implement [`ActionType`] with their own typed params,
//! output and reversal state. The registry stores them behind the
//! object-safe [`DynActionType`], which every `ActionType` gets for free and
//! which exchanges JSON values with the log.
//!
//! # Invariants
//!
//! - `undo` after `apply` restores state equivalent to before `apply`.
//! - `redo` after `undo` restores state equivalent to after `apply`. It may
//!   hand back a fresh reversal state (e.g. a new id), which replaces the
//!   stored one.
//! - `scope` is pure: the same params always map to the same scope.

use redb::WriteTransaction;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ConflictPolicy;
use crate::error::{ActionError, Result, UndoError};
use crate::record::Actor;
use crate::scope::Scope;

// ---------------------------------------------------------------------------
// ActionContext
// ---------------------------------------------------------------------------

/// Everything an action type may touch while running.
///
/// `tx` is the write transaction the handler will also use to append or
/// update the action record. Domain writes made through it commit or roll
/// back together with the record.
pub struct ActionContext<'a> {
    pub tx: &'a WriteTransaction,
    pub actor: &'a Actor,
    pub conflicts: ConflictPolicy,
}

impl ActionContext<'_> {
    /// Report that state changed underneath the action since it was applied.
    ///
    /// Under `Strict` this refuses the reversal; under `BestEffort` it logs
    /// and lets the action type carry on.
    pub fn drift(&self, reason: impl Into<String>) -> std::result::Result<(), ActionError> {
        let reason = reason.into();
        match self.conflicts {
            ConflictPolicy::Strict => Err(ActionError::Irreversible(reason)),
            ConflictPolicy::BestEffort => {
                tracing::warn!(user = %self.actor.user, "proceeding despite drift: {reason}");
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Applied
// ---------------------------------------------------------------------------

/// Result of a forward apply: the public output and the state needed to
/// reverse it later.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied<O, R> {
    pub output: O,
    pub reversal: R,
}

impl<O, R> Applied<O, R> {
    pub fn new(output: O, reversal: R) -> Self {
        Self { output, reversal }
    }
}

// ---------------------------------------------------------------------------
// ActionType
// ---------------------------------------------------------------------------

pub trait ActionType: Send + Sync + 'static {
    /// Stable key the action is registered and logged under.
    const TYPE: &'static str;

    type Params: Serialize + DeserializeOwned;
    type Output: Serialize + DeserializeOwned;
    type Reversal: Serialize + DeserializeOwned;

    fn scope(&self, params: &Self::Params) -> Scope;

    fn describe(&self, _params: &Self::Params) -> String {
        Self::TYPE.to_string()
    }

    fn apply(
        &self,
        ctx: &ActionContext<'_>,
        params: &Self::Params,
    ) -> std::result::Result<Applied<Self::Output, Self::Reversal>, ActionError>;

    fn undo(
        &self,
        ctx: &ActionContext<'_>,
        params: &Self::Params,
        reversal: &Self::Reversal,
    ) -> std::result::Result<(), ActionError>;

    fn redo(
        &self,
        ctx: &ActionContext<'_>,
        params: &Self::Params,
        reversal: &Self::Reversal,
    ) -> std::result::Result<Applied<Self::Output, Self::Reversal>, ActionError>;
}

// ---------------------------------------------------------------------------
// DynActionType
// ---------------------------------------------------------------------------

pub type Value = serde_json::Value;

/// Object-safe, JSON-facing view of an [`ActionType`].
pub trait DynActionType: Send + Sync {
    fn type_key(&self) -> &'static str;

    fn scope_of(&self, params: &Value) -> Result<Scope>;

    fn describe(&self, params: &Value) -> Result<String>;

    fn apply(
        &self,
        ctx: &ActionContext<'_>,
        params: &Value,
    ) -> std::result::Result<Applied<Value, Value>, ActionError>;

    fn undo(
        &self,
        ctx: &ActionContext<'_>,
        params: &Value,
        reversal: &Value,
    ) -> std::result::Result<(), ActionError>;

    fn redo(
        &self,
        ctx: &ActionContext<'_>,
        params: &Value,
        reversal: &Value,
    ) -> std::result::Result<Applied<Value, Value>, ActionError>;
}

fn decode<T: DeserializeOwned>(value: &Value) -> std::result::Result<T, ActionError> {
    Ok(T::deserialize(value)?)
}

fn encode<O: Serialize, R: Serialize>(
    applied: Applied<O, R>,
) -> std::result::Result<Applied<Value, Value>, ActionError> {
    Ok(Applied {
        output: serde_json::to_value(applied.output)?,
        reversal: serde_json::to_value(applied.reversal)?,
    })
}

impl<T: ActionType> DynActionType for T {
    fn type_key(&self) -> &'static str {
        T::TYPE
    }

    fn scope_of(&self, params: &Value) -> Result<Scope> {
        let params: T::Params =
            T::Params::deserialize(params).map_err(|source| UndoError::InvalidParams {
                type_key: T::TYPE.to_string(),
                source,
            })?;
        Ok(self.scope(&params))
    }

    fn describe(&self, params: &Value) -> Result<String> {
        let params: T::Params =
            T::Params::deserialize(params).map_err(|source| UndoError::InvalidParams {
                type_key: T::TYPE.to_string(),
                source,
            })?;
        Ok(<T as ActionType>::describe(self, &params))
    }

    fn apply(
        &self,
        ctx: &ActionContext<'_>,
        params: &Value,
    ) -> std::result::Result<Applied<Value, Value>, ActionError> {
        let params: T::Params = decode(params)?;
        encode(<T as ActionType>::apply(self, ctx, &params)?)
    }

    fn undo(
        &self,
        ctx: &ActionContext<'_>,
        params: &Value,
        reversal: &Value,
    ) -> std::result::Result<(), ActionError> {
        let params: T::Params = decode(params)?;
        let reversal: T::Reversal = decode(reversal)?;
        <T as ActionType>::undo(self, ctx, &params, &reversal)
    }

    fn redo(
        &self,
        ctx: &ActionContext<'_>,
        params: &Value,
        reversal: &Value,
    ) -> std::result::Result<Applied<Value, Value>, ActionError> {
        let params: T::Params = decode(params)?;
        let reversal: T::Reversal = decode(reversal)?;
        encode(<T as ActionType>::redo(self, ctx, &params, &reversal)?)
    }
}
