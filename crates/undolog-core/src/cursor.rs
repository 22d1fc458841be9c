//! Session undo/redo cursor.
//!
//! The cursor is never stored. It is derived from a session's subsequence of
//! the log (its records in the requested scopes, ascending by sequence), so
//! it can never drift from the records themselves.
//!
//! ```text
//!   seq:    1        2        3       4       5
//!   state:  Undone   Applied  Applied Undone  Undone
//!                             ^undo   ^redo
//! ```
//!
//! The undo target is the last `Applied` record. The redo target is the first
//! `Undone` record after it; `Undone` records before it (seq 1 above) are
//! fenced and stay audit-only.

use crate::record::{ActionGroupId, ActionRecord, RecordId};

#[derive(Debug, Clone)]
pub struct SessionCursor {
    records: Vec<ActionRecord>,
    /// Index of the last `Applied` record, if any.
    fence: Option<usize>,
}

impl SessionCursor {
    /// `records` must be ascending by sequence.
    pub fn new(records: Vec<ActionRecord>) -> Self {
        let fence = records.iter().rposition(|r| r.is_applied());
        Self { records, fence }
    }

    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }

    pub fn undo_target(&self) -> Option<&ActionRecord> {
        self.fence.map(|i| &self.records[i])
    }

    pub fn redo_target(&self) -> Option<&ActionRecord> {
        self.redoable().next()
    }

    /// `Undone` records above the fence, in redo order.
    pub fn redoable(&self) -> impl Iterator<Item = &ActionRecord> {
        let start = self.fence.map_or(0, |i| i + 1);
        self.records[start..].iter().filter(|r| r.is_undone())
    }

    /// Records undone together by the next undo, newest first.
    ///
    /// A target that belongs to an action group pulls in the applied records
    /// of the same group directly below it.
    pub fn undo_batch(&self) -> Vec<&ActionRecord> {
        let Some(fence) = self.fence else {
            return Vec::new();
        };
        let target = &self.records[fence];
        let Some(group) = target.action_group else {
            return vec![target];
        };
        self.records[..=fence]
            .iter()
            .rev()
            .take_while(|r| r.is_applied() && in_group(r, group))
            .collect()
    }

    /// Records redone together by the next redo, oldest first.
    pub fn redo_batch(&self) -> Vec<&ActionRecord> {
        let start = self.fence.map_or(0, |i| i + 1);
        let Some(offset) = self.records[start..].iter().position(|r| r.is_undone()) else {
            return Vec::new();
        };
        let target = &self.records[start + offset];
        let Some(group) = target.action_group else {
            return vec![target];
        };
        self.records[start + offset..]
            .iter()
            .take_while(|r| r.is_undone() && in_group(r, group))
            .collect()
    }
}

fn in_group(record: &ActionRecord, group: ActionGroupId) -> bool {
    record.action_group == Some(group)
}

/// Ids of a batch, used to compare a snapshot against the write transaction.
pub(crate) fn batch_ids(batch: &[&ActionRecord]) -> Vec<RecordId> {
    batch.iter().map(|r| r.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Actor, RecordState, SessionId, UserId};
    use crate::scope::Scope;

    fn record(seq: u64, state: RecordState, group: Option<ActionGroupId>) -> ActionRecord {
        let mut actor = Actor::new(UserId(1)).with_session(SessionId::new("s").unwrap());
        actor.action_group = group;
        let mut r = ActionRecord::applied(
            "noop",
            &actor,
            Scope::new("teams", 1),
            format!("r{seq}"),
            serde_json::Value::Null,
            serde_json::Value::Null,
        );
        r.id = RecordId(seq);
        r.state = state;
        r
    }

    fn ids(batch: Vec<&ActionRecord>) -> Vec<u64> {
        batch.iter().map(|r| r.id.0).collect()
    }

    use RecordState::{Applied, Undone};

    #[test]
    fn empty_cursor_has_no_targets() {
        let cursor = SessionCursor::new(Vec::new());
        assert!(cursor.undo_target().is_none());
        assert!(cursor.redo_target().is_none());
        assert!(cursor.undo_batch().is_empty());
        assert!(cursor.redo_batch().is_empty());
    }

    #[test]
    fn targets_split_at_last_applied() {
        let cursor = SessionCursor::new(vec![
            record(1, Undone, None),
            record(2, Applied, None),
            record(3, Applied, None),
            record(4, Undone, None),
            record(5, Undone, None),
        ]);
        assert_eq!(cursor.undo_target().map(|r| r.id.0), Some(3));
        assert_eq!(cursor.redo_target().map(|r| r.id.0), Some(4));
        assert_eq!(cursor.redoable().count(), 2);
    }

    #[test]
    fn everything_undone_is_redoable_from_the_start() {
        let cursor = SessionCursor::new(vec![record(1, Undone, None), record(2, Undone, None)]);
        assert!(cursor.undo_target().is_none());
        assert_eq!(cursor.redo_target().map(|r| r.id.0), Some(1));
    }

    #[test]
    fn fenced_undone_records_are_not_redoable() {
        let cursor = SessionCursor::new(vec![record(1, Undone, None), record(2, Applied, None)]);
        assert!(cursor.redo_target().is_none());
        assert!(cursor.redo_batch().is_empty());
    }

    #[test]
    fn group_batches_stop_at_group_boundary() {
        let g = ActionGroupId::new();
        let other = ActionGroupId::new();
        let cursor = SessionCursor::new(vec![
            record(1, Applied, Some(other)),
            record(2, Applied, Some(g)),
            record(3, Applied, Some(g)),
        ]);
        assert_eq!(ids(cursor.undo_batch()), vec![3, 2]);
    }

    #[test]
    fn redo_batch_follows_group_upwards() {
        let g = ActionGroupId::new();
        let cursor = SessionCursor::new(vec![
            record(1, Applied, None),
            record(2, Undone, Some(g)),
            record(3, Undone, Some(g)),
            record(4, Undone, None),
        ]);
        assert_eq!(ids(cursor.redo_batch()), vec![2, 3]);
    }

    #[test]
    fn ungrouped_batches_are_single_records() {
        let cursor = SessionCursor::new(vec![
            record(1, Applied, None),
            record(2, Applied, None),
            record(3, Undone, None),
        ]);
        assert_eq!(ids(cursor.undo_batch()), vec![2]);
        assert_eq!(ids(cursor.redo_batch()), vec![3]);
    }
}
