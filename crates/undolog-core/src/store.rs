//! Persistent action log using redb.
//!
//! # Table design
//!
//! `action_records` maps the record sequence (`u64`) to the JSON-encoded
//! `ActionRecord`. redb orders `u64` keys numerically, so iteration order is
//! log order.
//!
//! `action_index` holds one entry per session-bound record, keyed by a
//! length-prefixed composite:
//! ```text
//! [ len: u32 BE | session bytes | len: u32 BE | scope bytes | seq: u64 BE ]
//! ```
//! All records of one `(session, scope)` pair share a prefix and sort by
//! sequence, so a single range scan yields that pair's history in order.
//! Records appended without a session are not indexed.
//!
//! Undo and redo only need the tail of a session's subsequence: the `Undone`
//! records above the last `Applied` one, that record, and the rest of its
//! action group. [`ActionStore::cursor`] walks the index newest first and
//! stops there, so its cost follows the redo stack rather than the log.
//! Audit listings still read the whole subsequence.
//!
//! `action_meta` holds the next sequence number. Sequences start at 1 and are
//! assigned inside the appending write transaction, which redb serializes, so
//! they are gap-free and never reused.

use std::collections::BTreeSet;
use std::iter::Peekable;
use std::path::Path;

use chrono::Utc;
use redb::{
    Database, ReadTransaction, ReadableTable, ReadableTableMetadata, StorageError,
    TableDefinition, WriteTransaction,
};
use serde::Serialize;

use crate::cursor::SessionCursor;
use crate::error::{store_err, Result, UndoError};
use crate::record::{ActionGroupId, ActionRecord, RecordId, RecordState, SessionId, UserId};
use crate::scope::Scope;

// ---------------------------------------------------------------------------
// Table definitions
// ---------------------------------------------------------------------------

const RECORDS: TableDefinition<u64, &[u8]> = TableDefinition::new("action_records");
const INDEX: TableDefinition<&[u8], u64> = TableDefinition::new("action_index");
const META: TableDefinition<&str, u64> = TableDefinition::new("action_meta");

const NEXT_SEQ: &str = "next_seq";

// ---------------------------------------------------------------------------
// Key helpers
// ---------------------------------------------------------------------------

fn index_prefix(session: &SessionId, scope: &Scope) -> Vec<u8> {
    let session = session.as_str().as_bytes();
    let scope = scope.to_string();
    let scope = scope.as_bytes();
    let mut key = Vec::with_capacity(8 + session.len() + scope.len() + 8);
    key.extend_from_slice(&(session.len() as u32).to_be_bytes());
    key.extend_from_slice(session);
    key.extend_from_slice(&(scope.len() as u32).to_be_bytes());
    key.extend_from_slice(scope);
    key
}

fn index_key(session: &SessionId, scope: &Scope, seq: u64) -> Vec<u8> {
    let mut key = index_prefix(session, scope);
    key.extend_from_slice(&seq.to_be_bytes());
    key
}

/// Inclusive bounds covering every sequence of one `(session, scope)` pair.
fn index_bounds(session: &SessionId, scope: &Scope) -> (Vec<u8>, Vec<u8>) {
    (index_key(session, scope, 0), index_key(session, scope, u64::MAX))
}

// ---------------------------------------------------------------------------
// Scans shared by read and write transactions
// ---------------------------------------------------------------------------

/// Load a session's records in the given scopes, ascending by sequence.
fn collect_subsequence<I, R>(
    index: &I,
    records: &R,
    session: &SessionId,
    user: UserId,
    scopes: &[Scope],
) -> Result<Vec<ActionRecord>>
where
    I: ReadableTable<&'static [u8], u64>,
    R: ReadableTable<u64, &'static [u8]>,
{
    let mut seqs = BTreeSet::new();
    for scope in scopes {
        let (lower, upper) = index_bounds(session, scope);
        for entry in index
            .range(lower.as_slice()..=upper.as_slice())
            .map_err(store_err)?
        {
            let (_, v) = entry.map_err(store_err)?;
            seqs.insert(v.value());
        }
    }

    let mut result = Vec::with_capacity(seqs.len());
    for seq in seqs {
        let record = load_record(records, RecordId(seq))?
            .ok_or_else(|| UndoError::Store(format!("index points at missing record #{seq}")))?;
        if record.actor == user {
            result.push(record);
        }
    }
    Ok(result)
}

/// Pop the highest pending sequence across per-scope iterators that each
/// yield descending sequences.
fn next_highest<I>(ranges: &mut [Peekable<I>]) -> Result<Option<u64>>
where
    I: Iterator<Item = std::result::Result<u64, StorageError>>,
{
    let mut best: Option<(usize, u64)> = None;
    for (i, range) in ranges.iter_mut().enumerate() {
        match range.peek() {
            Some(Ok(seq)) => {
                if best.map_or(true, |(_, top)| *seq > top) {
                    best = Some((i, *seq));
                }
            }
            Some(Err(_)) => {
                if let Some(Err(e)) = range.next() {
                    return Err(store_err(e));
                }
            }
            None => {}
        }
    }
    if let Some((i, _)) = best {
        ranges[i].next();
    }
    Ok(best.map(|(_, seq)| seq))
}

/// Load the part of a session's subsequence that undo and redo can reach,
/// ascending by sequence.
fn collect_tail<I, R>(
    index: &I,
    records: &R,
    session: &SessionId,
    user: UserId,
    scopes: &[Scope],
) -> Result<Vec<ActionRecord>>
where
    I: ReadableTable<&'static [u8], u64>,
    R: ReadableTable<u64, &'static [u8]>,
{
    let bounds: Vec<(Vec<u8>, Vec<u8>)> = scopes
        .iter()
        .map(|scope| index_bounds(session, scope))
        .collect();
    let mut ranges = Vec::with_capacity(bounds.len());
    for (lower, upper) in &bounds {
        let range = index
            .range(lower.as_slice()..=upper.as_slice())
            .map_err(store_err)?;
        ranges.push(range.rev().map(|entry| entry.map(|(_, v)| v.value())).peekable());
    }

    let mut tail = Vec::new();
    // Set once the newest applied record is found; holds its action group.
    let mut fence: Option<Option<ActionGroupId>> = None;
    while let Some(seq) = next_highest(&mut ranges)? {
        let record = load_record(records, RecordId(seq))?
            .ok_or_else(|| UndoError::Store(format!("index points at missing record #{seq}")))?;
        if record.actor != user {
            continue;
        }
        match fence {
            None if record.is_applied() => {
                let group = record.action_group;
                tail.push(record);
                if group.is_none() {
                    break;
                }
                fence = Some(group);
            }
            None => tail.push(record),
            Some(group) => {
                if !record.is_applied() || record.action_group != group {
                    break;
                }
                tail.push(record);
            }
        }
    }
    tail.reverse();
    Ok(tail)
}

fn load_record<R>(records: &R, id: RecordId) -> Result<Option<ActionRecord>>
where
    R: ReadableTable<u64, &'static [u8]>,
{
    match records.get(id.0).map_err(store_err)? {
        Some(raw) => Ok(Some(serde_json::from_slice(raw.value())?)),
        None => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// HistoryEntry
// ---------------------------------------------------------------------------

/// One row of an audit listing.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub record: ActionRecord,
    /// False for `Undone` records fenced by a later applied action.
    pub redoable: bool,
}

// ---------------------------------------------------------------------------
// ActionStore
// ---------------------------------------------------------------------------

/// Durable, ordered log of `ActionRecord`s.
///
/// The store owns the redb `Database`. Domain modules share it: their tables
/// live in the same file so a domain effect and its record commit together.
pub struct ActionStore {
    db: Database,
}

impl ActionStore {
    /// Open or create the redb database at `path`.
    ///
    /// Creates the log tables if they don't already exist.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            crate::io::ensure_dir(parent)?;
        }
        let db = Database::create(path).map_err(store_err)?;
        let wt = db.begin_write().map_err(store_err)?;
        {
            wt.open_table(RECORDS).map_err(store_err)?;
            wt.open_table(INDEX).map_err(store_err)?;
            wt.open_table(META).map_err(store_err)?;
        }
        wt.commit().map_err(store_err)?;
        Ok(Self { db })
    }

    pub fn begin_write(&self) -> Result<WriteTransaction> {
        self.db.begin_write().map_err(store_err)
    }

    pub fn begin_read(&self) -> Result<ReadTransaction> {
        self.db.begin_read().map_err(store_err)
    }

    /// Append `record` inside `tx`, assigning the next sequence.
    ///
    /// Returns the record with its `id` set. Nothing is visible until the
    /// caller commits `tx`.
    pub fn append(&self, tx: &WriteTransaction, mut record: ActionRecord) -> Result<ActionRecord> {
        let seq = {
            let mut meta = tx.open_table(META).map_err(store_err)?;
            let seq = meta
                .get(NEXT_SEQ)
                .map_err(store_err)?
                .map(|v| v.value())
                .unwrap_or(1);
            meta.insert(NEXT_SEQ, seq + 1).map_err(store_err)?;
            seq
        };
        record.id = RecordId(seq);

        let value = serde_json::to_vec(&record)?;
        {
            let mut records = tx.open_table(RECORDS).map_err(store_err)?;
            records
                .insert(seq, value.as_slice())
                .map_err(store_err)?;
        }
        if let Some(session) = &record.session {
            let key = index_key(session, &record.scope, seq);
            let mut index = tx.open_table(INDEX).map_err(store_err)?;
            index.insert(key.as_slice(), seq).map_err(store_err)?;
        }
        Ok(record)
    }

    /// Fetch a single record by id.
    pub fn get(&self, id: RecordId) -> Result<Option<ActionRecord>> {
        let rt = self.begin_read()?;
        let records = rt.open_table(RECORDS).map_err(store_err)?;
        load_record(&records, id)
    }

    /// Total number of records in the log.
    pub fn len(&self) -> Result<u64> {
        let rt = self.begin_read()?;
        let records = rt.open_table(RECORDS).map_err(store_err)?;
        records.len().map_err(store_err)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Derive the session cursor from a read snapshot.
    ///
    /// The cursor holds only the tail undo and redo can reach; fenced and
    /// older records are not loaded.
    pub fn cursor(
        &self,
        session: &SessionId,
        user: UserId,
        scopes: &[Scope],
    ) -> Result<SessionCursor> {
        let rt = self.begin_read()?;
        let index = rt.open_table(INDEX).map_err(store_err)?;
        let records = rt.open_table(RECORDS).map_err(store_err)?;
        let tail = collect_tail(&index, &records, session, user, scopes)?;
        Ok(SessionCursor::new(tail))
    }

    /// Derive the session cursor as seen by an open write transaction.
    pub fn cursor_in(
        &self,
        tx: &WriteTransaction,
        session: &SessionId,
        user: UserId,
        scopes: &[Scope],
    ) -> Result<SessionCursor> {
        let index = tx.open_table(INDEX).map_err(store_err)?;
        let records = tx.open_table(RECORDS).map_err(store_err)?;
        let tail = collect_tail(&index, &records, session, user, scopes)?;
        Ok(SessionCursor::new(tail))
    }

    /// Highest-sequence `Applied` record of the session in `scopes`.
    pub fn find_undo_target(
        &self,
        session: &SessionId,
        user: UserId,
        scopes: &[Scope],
    ) -> Result<Option<ActionRecord>> {
        Ok(self
            .cursor(session, user, scopes)?
            .undo_target()
            .cloned())
    }

    /// Lowest-sequence `Undone` record of the session in `scopes` that no
    /// later `Applied` record fences.
    pub fn find_redo_target(
        &self,
        session: &SessionId,
        user: UserId,
        scopes: &[Scope],
    ) -> Result<Option<ActionRecord>> {
        Ok(self
            .cursor(session, user, scopes)?
            .redo_target()
            .cloned())
    }

    /// Compare-and-set `Applied → Undone`.
    ///
    /// Fails with `StaleRecord` if the record is no longer `Applied`.
    pub fn mark_undone(&self, tx: &WriteTransaction, id: RecordId) -> Result<ActionRecord> {
        self.transition(tx, id, RecordState::Applied, RecordState::Undone, None)
    }

    /// Compare-and-set `Undone → Applied`, storing the refreshed reversal state.
    ///
    /// Fails with `StaleRecord` if the record is no longer `Undone`.
    pub fn mark_redone(
        &self,
        tx: &WriteTransaction,
        id: RecordId,
        reversal: serde_json::Value,
    ) -> Result<ActionRecord> {
        self.transition(
            tx,
            id,
            RecordState::Undone,
            RecordState::Applied,
            Some(reversal),
        )
    }

    fn transition(
        &self,
        tx: &WriteTransaction,
        id: RecordId,
        expected: RecordState,
        next: RecordState,
        reversal: Option<serde_json::Value>,
    ) -> Result<ActionRecord> {
        let mut records = tx.open_table(RECORDS).map_err(store_err)?;
        let mut record = load_record(&records, id)?.ok_or(UndoError::RecordNotFound(id))?;
        if record.state != expected {
            return Err(UndoError::StaleRecord(id));
        }
        record.state = next;
        if let Some(reversal) = reversal {
            record.reversal = reversal;
        }
        record.updated_at = Utc::now();

        let value = serde_json::to_vec(&record)?;
        records
            .insert(id.0, value.as_slice())
            .map_err(store_err)?;
        Ok(record)
    }

    /// Audit listing of a session's records in `scopes`, newest first.
    pub fn history(
        &self,
        session: &SessionId,
        user: UserId,
        scopes: &[Scope],
        limit: usize,
    ) -> Result<Vec<HistoryEntry>> {
        let rt = self.begin_read()?;
        let index = rt.open_table(INDEX).map_err(store_err)?;
        let records = rt.open_table(RECORDS).map_err(store_err)?;
        let cursor = SessionCursor::new(collect_subsequence(
            &index, &records, session, user, scopes,
        )?);
        let redoable: Vec<RecordId> = cursor.redoable().map(|r| r.id).collect();
        Ok(cursor
            .records()
            .iter()
            .rev()
            .take(limit)
            .map(|record| HistoryEntry {
                redoable: redoable.contains(&record.id),
                record: record.clone(),
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Actor;
    use tempfile::TempDir;

    fn open_tmp() -> (TempDir, ActionStore) {
        let dir = TempDir::new().unwrap();
        let store = ActionStore::open(&dir.path().join("log/actions.redb")).unwrap();
        (dir, store)
    }

    fn session(id: &str) -> SessionId {
        SessionId::new(id).unwrap()
    }

    fn actor(user: u64, session_id: Option<&str>) -> Actor {
        let actor = Actor::new(UserId(user));
        match session_id {
            Some(s) => actor.with_session(session(s)),
            None => actor,
        }
    }

    fn append(store: &ActionStore, actor: &Actor, scope: &Scope, label: &str) -> ActionRecord {
        let record = ActionRecord::applied(
            "noop",
            actor,
            scope.clone(),
            label,
            serde_json::json!({ "label": label }),
            serde_json::Value::Null,
        );
        let wt = store.begin_write().unwrap();
        let record = store.append(&wt, record).unwrap();
        wt.commit().unwrap();
        record
    }

    fn undo(store: &ActionStore, id: RecordId) {
        let wt = store.begin_write().unwrap();
        store.mark_undone(&wt, id).unwrap();
        wt.commit().unwrap();
    }

    #[test]
    fn append_assigns_increasing_sequences() {
        let (_dir, store) = open_tmp();
        let a = actor(1, Some("s"));
        let scope = Scope::new("teams", 1);
        let first = append(&store, &a, &scope, "first");
        let second = append(&store, &a, &scope, "second");
        assert_eq!(first.id, RecordId(1));
        assert_eq!(second.id, RecordId(2));
        assert_eq!(store.len().unwrap(), 2);
        assert_eq!(store.get(second.id).unwrap().unwrap().description, "second");
    }

    #[test]
    fn uncommitted_append_leaves_no_trace() {
        let (_dir, store) = open_tmp();
        let a = actor(1, Some("s"));
        {
            let wt = store.begin_write().unwrap();
            let record = ActionRecord::applied(
                "noop",
                &a,
                Scope::new("teams", 1),
                "dropped",
                serde_json::Value::Null,
                serde_json::Value::Null,
            );
            store.append(&wt, record).unwrap();
            wt.abort().unwrap();
        }
        assert!(store.is_empty().unwrap());
        let next = append(&store, &a, &Scope::new("teams", 1), "kept");
        assert_eq!(next.id, RecordId(1));
    }

    #[test]
    fn undo_target_is_latest_applied_in_scope() {
        let (_dir, store) = open_tmp();
        let a = actor(1, Some("s"));
        let g1 = Scope::new("teams", 1);
        let g2 = Scope::new("teams", 2);
        let first = append(&store, &a, &g1, "first");
        append(&store, &a, &g2, "other scope");

        let target = store.find_undo_target(&session("s"), UserId(1), &[g1.clone()]).unwrap();
        assert_eq!(target.map(|r| r.id), Some(first.id));

        let both = store
            .find_undo_target(&session("s"), UserId(1), &[g1, g2])
            .unwrap();
        assert_eq!(both.map(|r| r.description), Some("other scope".to_string()));
    }

    #[test]
    fn lookups_are_isolated_by_session_and_user() {
        let (_dir, store) = open_tmp();
        let scope = Scope::new("teams", 1);
        append(&store, &actor(1, Some("s1")), &scope, "mine");
        append(&store, &actor(2, Some("s2")), &scope, "theirs");
        append(&store, &actor(1, None), &scope, "sessionless");

        let target = store
            .find_undo_target(&session("s1"), UserId(1), &[scope.clone()])
            .unwrap();
        assert_eq!(target.map(|r| r.description), Some("mine".to_string()));
        assert!(store
            .find_undo_target(&session("s2"), UserId(1), &[scope])
            .unwrap()
            .is_none());
    }

    #[test]
    fn session_prefix_does_not_leak_into_longer_session() {
        let (_dir, store) = open_tmp();
        let scope = Scope::new("teams", 1);
        append(&store, &actor(1, Some("ab")), &scope, "ab");
        assert!(store
            .find_undo_target(&session("a"), UserId(1), &[scope])
            .unwrap()
            .is_none());
    }

    #[test]
    fn mark_undone_is_compare_and_set() {
        let (_dir, store) = open_tmp();
        let a = actor(1, Some("s"));
        let record = append(&store, &a, &Scope::new("teams", 1), "once");
        undo(&store, record.id);

        let wt = store.begin_write().unwrap();
        let err = store.mark_undone(&wt, record.id).unwrap_err();
        assert!(matches!(err, UndoError::StaleRecord(id) if id == record.id));
    }

    #[test]
    fn mark_redone_refreshes_reversal_state() {
        let (_dir, store) = open_tmp();
        let a = actor(1, Some("s"));
        let record = append(&store, &a, &Scope::new("teams", 1), "redo me");
        undo(&store, record.id);

        let wt = store.begin_write().unwrap();
        let updated = store
            .mark_redone(&wt, record.id, serde_json::json!({ "team_id": 9 }))
            .unwrap();
        wt.commit().unwrap();
        assert_eq!(updated.state, RecordState::Applied);

        let stored = store.get(record.id).unwrap().unwrap();
        assert_eq!(stored.reversal, serde_json::json!({ "team_id": 9 }));
        assert!(stored.is_applied());
    }

    #[test]
    fn mark_on_missing_record_is_not_found() {
        let (_dir, store) = open_tmp();
        let wt = store.begin_write().unwrap();
        assert!(matches!(
            store.mark_undone(&wt, RecordId(42)),
            Err(UndoError::RecordNotFound(RecordId(42)))
        ));
    }

    #[test]
    fn redo_target_is_fenced_by_later_applied_record() {
        let (_dir, store) = open_tmp();
        let a = actor(1, Some("s"));
        let scope = Scope::new("teams", 1);
        let first = append(&store, &a, &scope, "a");
        undo(&store, first.id);

        let redo = store
            .find_redo_target(&session("s"), UserId(1), &[scope.clone()])
            .unwrap();
        assert_eq!(redo.map(|r| r.id), Some(first.id));

        append(&store, &a, &scope, "c");
        assert!(store
            .find_redo_target(&session("s"), UserId(1), &[scope])
            .unwrap()
            .is_none());
    }

    #[test]
    fn cursor_stops_below_newest_applied_record() {
        let (_dir, store) = open_tmp();
        let a = actor(1, Some("s"));
        let g1 = Scope::new("teams", 1);
        let g2 = Scope::new("teams", 2);
        for label in ["old", "older still", "oldest"] {
            append(&store, &a, &g1, label);
        }
        let fence = append(&store, &a, &g2, "fence");
        let pending = append(&store, &a, &g1, "pending");
        undo(&store, pending.id);

        let cursor = store
            .cursor(&session("s"), UserId(1), &[g1.clone(), g2])
            .unwrap();
        let ids: Vec<RecordId> = cursor.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![fence.id, pending.id]);
        assert_eq!(cursor.undo_target().map(|r| r.id), Some(fence.id));
        assert_eq!(cursor.redo_target().map(|r| r.id), Some(pending.id));

        // The audit listing still sees everything.
        let history = store.history(&session("s"), UserId(1), &[g1], 10).unwrap();
        assert_eq!(history.len(), 4);
    }

    #[test]
    fn cursor_keeps_the_whole_top_action_group() {
        let (_dir, store) = open_tmp();
        let scope = Scope::new("teams", 1);
        let solo = actor(1, Some("s"));
        let grouped = actor(1, Some("s")).with_action_group(ActionGroupId::new());
        append(&store, &solo, &scope, "before");
        let first = append(&store, &grouped, &scope, "grouped 1");
        let second = append(&store, &grouped, &scope, "grouped 2");
        // Another user's record in the same session sits inside the run.
        append(&store, &actor(2, Some("s")), &scope, "someone else");
        let third = append(&store, &grouped, &scope, "grouped 3");

        let cursor = store.cursor(&session("s"), UserId(1), &[scope]).unwrap();
        let batch: Vec<RecordId> = cursor.undo_batch().iter().map(|r| r.id).collect();
        assert_eq!(batch, vec![third.id, second.id, first.id]);
        assert_eq!(cursor.records().len(), 3);
    }

    #[test]
    fn fully_undone_session_keeps_every_record_redoable() {
        let (_dir, store) = open_tmp();
        let a = actor(1, Some("s"));
        let scope = Scope::new("teams", 1);
        let first = append(&store, &a, &scope, "first");
        let second = append(&store, &a, &scope, "second");
        undo(&store, second.id);
        undo(&store, first.id);

        let cursor = store.cursor(&session("s"), UserId(1), &[scope]).unwrap();
        assert!(cursor.undo_target().is_none());
        assert_eq!(cursor.redo_target().map(|r| r.id), Some(first.id));
        assert_eq!(cursor.redoable().count(), 2);
    }

    #[test]
    fn history_lists_newest_first_with_redoability() {
        let (_dir, store) = open_tmp();
        let a = actor(1, Some("s"));
        let scope = Scope::new("teams", 1);
        let fenced = append(&store, &a, &scope, "fenced");
        undo(&store, fenced.id);
        let applied = append(&store, &a, &scope, "applied");
        let pending = append(&store, &a, &scope, "pending");
        undo(&store, pending.id);

        let history = store
            .history(&session("s"), UserId(1), &[scope.clone()], 10)
            .unwrap();
        let rows: Vec<(RecordId, bool)> =
            history.iter().map(|h| (h.record.id, h.redoable)).collect();
        assert_eq!(
            rows,
            vec![(pending.id, true), (applied.id, false), (fenced.id, false)]
        );

        let limited = store.history(&session("s"), UserId(1), &[scope], 1).unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn reopen_keeps_log_and_sequence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("actions.redb");
        let a = actor(1, Some("s"));
        let scope = Scope::new("teams", 1);
        {
            let store = ActionStore::open(&path).unwrap();
            append(&store, &a, &scope, "before restart");
        }
        let store = ActionStore::open(&path).unwrap();
        let next = append(&store, &a, &scope, "after restart");
        assert_eq!(next.id, RecordId(2));
        let target = store
            .find_undo_target(&session("s"), UserId(1), &[scope])
            .unwrap();
        assert_eq!(target.map(|r| r.id), Some(next.id));
    }
}
