//! Orchestrates perform, undo and redo.
//!
//! Every call runs inside one redb write transaction spanning the domain
//! effect and the action record change. Any error aborts the transaction, so
//! either both land or neither does.
//!
//! Undo/redo targets are located on a read snapshot, then re-derived inside
//! the write transaction. If the two disagree another call won the race and
//! this one reports "nothing to do" instead of reversing something the caller
//! never saw.

use std::path::Path;
use std::sync::Arc;

use redb::WriteTransaction;
use serde::Serialize;

use crate::action::{ActionContext, ActionType, Value};
use crate::config::{Config, ConflictPolicy};
use crate::cursor::batch_ids;
use crate::error::{store_err, ActionError, Result, UndoError};
use crate::record::{ActionRecord, Actor, RecordId, SessionId, UserId};
use crate::registry::ActionTypeRegistry;
use crate::scope::{self, Scope};
use crate::store::{ActionStore, HistoryEntry};

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Output of a successful perform together with the record it produced.
#[derive(Debug, Clone)]
pub struct Performed {
    pub output: Value,
    pub record: ActionRecord,
}

/// One record reversed or re-applied by an undo/redo call.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayedAction {
    pub record: RecordId,
    pub type_key: String,
    pub description: String,
    pub scope: Scope,
    /// The re-applied output for redo; `None` for undo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

/// Everything one undo/redo call changed, in the order it was applied.
#[derive(Debug, Clone, Serialize)]
pub struct Replay {
    pub actions: Vec<ReplayedAction>,
}

impl Replay {
    /// Output of the last re-applied action, if this was a redo.
    pub fn last_result(&self) -> Option<&Value> {
        self.actions.last().and_then(|a| a.result.as_ref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Undo,
    Redo,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Direction::Undo => "undo",
            Direction::Redo => "redo",
        }
    }
}

// ---------------------------------------------------------------------------
// ActionHandler
// ---------------------------------------------------------------------------

pub struct ActionHandler {
    registry: Arc<ActionTypeRegistry>,
    store: ActionStore,
    conflicts: ConflictPolicy,
}

impl ActionHandler {
    pub fn new(registry: Arc<ActionTypeRegistry>, store: ActionStore) -> Self {
        Self {
            registry,
            store,
            conflicts: ConflictPolicy::default(),
        }
    }

    pub fn with_conflict_policy(mut self, conflicts: ConflictPolicy) -> Self {
        self.conflicts = conflicts;
        self
    }

    /// Open the store configured for the project at `root`.
    pub fn open(root: &Path, config: &Config, registry: Arc<ActionTypeRegistry>) -> Result<Self> {
        let store = ActionStore::open(&config.store_path(root))?;
        Ok(Self::new(registry, store).with_conflict_policy(config.undo.conflict_policy))
    }

    pub fn registry(&self) -> &ActionTypeRegistry {
        &self.registry
    }

    pub fn store(&self) -> &ActionStore {
        &self.store
    }

    pub fn conflict_policy(&self) -> ConflictPolicy {
        self.conflicts
    }

    // -----------------------------------------------------------------------
    // perform
    // -----------------------------------------------------------------------

    /// Perform a typed action and return its output.
    pub fn perform<T: ActionType>(&self, actor: &Actor, params: &T::Params) -> Result<T::Output> {
        let params = serde_json::to_value(params)?;
        let performed = self.perform_raw(actor, T::TYPE, params)?;
        Ok(serde_json::from_value(performed.output)?)
    }

    /// Perform the action registered under `type_key` with JSON params.
    ///
    /// Fails with `ActionFailed` wrapping the action type's own error,
    /// including a refused actor; nothing is recorded in that case.
    pub fn perform_raw(&self, actor: &Actor, type_key: &str, params: Value) -> Result<Performed> {
        let action = self.registry.lookup(type_key)?;
        let scope = action.scope_of(&params)?;
        scope.validate()?;
        let description = action.describe(&params)?;

        let performed = self.in_transaction(|tx| {
            let ctx = self.context(tx, actor);
            let applied = action
                .apply(&ctx, &params)
                .map_err(|source| UndoError::ActionFailed {
                    type_key: type_key.to_string(),
                    source,
                })?;
            let record = ActionRecord::applied(
                type_key,
                actor,
                scope.clone(),
                description.as_str(),
                params.clone(),
                applied.reversal,
            );
            let record = self.store.append(tx, record)?;
            Ok(Performed {
                output: applied.output,
                record,
            })
        })?;

        tracing::info!(
            record = %performed.record.id,
            type_key,
            scope = %performed.record.scope,
            user = %actor.user,
            "performed action"
        );
        Ok(performed)
    }

    // -----------------------------------------------------------------------
    // undo / redo
    // -----------------------------------------------------------------------

    /// Undo the session's most recent applied action in `scopes`.
    ///
    /// Returns `Ok(None)` when there is nothing to undo, including when a
    /// concurrent call undid the target first.
    pub fn undo(
        &self,
        actor: &Actor,
        session: &SessionId,
        scopes: &[Scope],
    ) -> Result<Option<Replay>> {
        self.replay(Direction::Undo, actor, session, scopes)
    }

    /// Redo the session's earliest still-redoable action in `scopes`.
    ///
    /// Returns `Ok(None)` when nothing is redoable, including records fenced
    /// by a newer applied action.
    pub fn redo(
        &self,
        actor: &Actor,
        session: &SessionId,
        scopes: &[Scope],
    ) -> Result<Option<Replay>> {
        self.replay(Direction::Redo, actor, session, scopes)
    }

    fn replay(
        &self,
        direction: Direction,
        actor: &Actor,
        session: &SessionId,
        scopes: &[Scope],
    ) -> Result<Option<Replay>> {
        let scopes = scope::dedup(scopes);
        let snapshot = self.store.cursor(session, actor.user, &scopes)?;
        let expected = match direction {
            Direction::Undo => batch_ids(&snapshot.undo_batch()),
            Direction::Redo => batch_ids(&snapshot.redo_batch()),
        };
        if expected.is_empty() {
            tracing::debug!(%session, op = direction.as_str(), "nothing to replay");
            return Ok(None);
        }

        let outcome = self.in_transaction(|tx| {
            let cursor = self.store.cursor_in(tx, session, actor.user, &scopes)?;
            let batch = match direction {
                Direction::Undo => cursor.undo_batch(),
                Direction::Redo => cursor.redo_batch(),
            };
            if batch_ids(&batch) != expected {
                return Err(UndoError::StaleRecord(expected[0]));
            }

            let mut actions = Vec::with_capacity(batch.len());
            for record in batch {
                actions.push(self.replay_one(direction, tx, actor, record)?);
            }
            Ok(Replay { actions })
        });

        match outcome {
            Ok(replay) => {
                for action in &replay.actions {
                    tracing::info!(
                        record = %action.record,
                        type_key = %action.type_key,
                        scope = %action.scope,
                        %session,
                        op = direction.as_str(),
                        "replayed action"
                    );
                }
                Ok(Some(replay))
            }
            Err(UndoError::StaleRecord(id)) => {
                tracing::debug!(record = %id, %session, op = direction.as_str(), "lost race, nothing to replay");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn replay_one(
        &self,
        direction: Direction,
        tx: &WriteTransaction,
        actor: &Actor,
        record: &ActionRecord,
    ) -> Result<ReplayedAction> {
        let action = self.registry.lookup(&record.type_key)?;
        let ctx = self.context(tx, actor);
        let result = match direction {
            Direction::Undo => {
                action
                    .undo(&ctx, &record.params, &record.reversal)
                    .map_err(|e| reversal_error(record, e))?;
                self.store.mark_undone(tx, record.id)?;
                None
            }
            Direction::Redo => {
                let applied = action
                    .redo(&ctx, &record.params, &record.reversal)
                    .map_err(|e| reversal_error(record, e))?;
                self.store.mark_redone(tx, record.id, applied.reversal)?;
                Some(applied.output)
            }
        };
        Ok(ReplayedAction {
            record: record.id,
            type_key: record.type_key.clone(),
            description: record.description.clone(),
            scope: record.scope.clone(),
            result,
        })
    }

    // -----------------------------------------------------------------------
    // Audit
    // -----------------------------------------------------------------------

    /// The session's records in `scopes`, newest first.
    pub fn history(
        &self,
        user: UserId,
        session: &SessionId,
        scopes: &[Scope],
        limit: usize,
    ) -> Result<Vec<HistoryEntry>> {
        self.store
            .history(session, user, &scope::dedup(scopes), limit)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn context<'a>(&self, tx: &'a WriteTransaction, actor: &'a Actor) -> ActionContext<'a> {
        ActionContext {
            tx,
            actor,
            conflicts: self.conflicts,
        }
    }

    /// Run `f` in a write transaction, committing on `Ok` and aborting on `Err`.
    fn in_transaction<T>(&self, f: impl FnOnce(&WriteTransaction) -> Result<T>) -> Result<T> {
        let tx = self.store.begin_write()?;
        match f(&tx) {
            Ok(value) => {
                tx.commit().map_err(store_err)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(abort) = tx.abort() {
                    tracing::warn!("failed to abort action transaction: {abort}");
                }
                Err(e)
            }
        }
    }
}

/// Classify an action type's failure during undo/redo.
fn reversal_error(record: &ActionRecord, e: ActionError) -> UndoError {
    match e {
        ActionError::Irreversible(reason) | ActionError::NotFound(reason) => {
            UndoError::IrreversibleAction {
                record: record.id,
                type_key: record.type_key.clone(),
                reason,
            }
        }
        ActionError::PermissionDenied(reason) => UndoError::PermissionDenied {
            record: Some(record.id),
            reason,
        },
        source => UndoError::ActionFailed {
            type_key: record.type_key.clone(),
            source,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
