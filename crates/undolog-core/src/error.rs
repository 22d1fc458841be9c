use thiserror::Error;

use crate::record::RecordId;

#[derive(Debug, Error)]
pub enum UndoError {
    #[error("not initialized: run 'undolog init'")]
    NotInitialized,

    #[error("action type already registered: {0}")]
    DuplicateType(String),

    #[error("unknown action type: {0}")]
    UnknownType(String),

    #[error("action '{type_key}' failed: {source}")]
    ActionFailed {
        type_key: String,
        #[source]
        source: ActionError,
    },

    #[error("action {record} ({type_key}) can no longer be reversed: {reason}")]
    IrreversibleAction {
        record: RecordId,
        type_key: String,
        reason: String,
    },

    #[error("permission denied: {reason}")]
    PermissionDenied {
        record: Option<RecordId>,
        reason: String,
    },

    #[error("action {0} changed state concurrently")]
    StaleRecord(RecordId),

    #[error("action record not found: {0}")]
    RecordNotFound(RecordId),

    #[error("invalid params for '{type_key}': {source}")]
    InvalidParams {
        type_key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid session id '{0}': must be non-empty")]
    InvalidSession(String),

    #[error("invalid scope '{0}': expected '<kind>:<id>'")]
    InvalidScope(String),

    #[error("action store error: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, UndoError>;

/// Stringify a redb error into [`UndoError::Store`].
pub(crate) fn store_err(e: impl std::fmt::Display) -> UndoError {
    UndoError::Store(e.to_string())
}

// ---------------------------------------------------------------------------
// ActionError
// ---------------------------------------------------------------------------

/// Failure reported by an action type's forward or reverse logic.
///
/// A forward apply wraps any of these in [`UndoError::ActionFailed`]. On
/// undo/redo the handler classifies them: `Irreversible` and `NotFound`
/// become [`UndoError::IrreversibleAction`], `PermissionDenied` becomes
/// [`UndoError::PermissionDenied`], everything else `ActionFailed`.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{0}")]
    Rejected(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("{0}")]
    Irreversible(String),

    #[error("storage: {0}")]
    Store(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

macro_rules! impl_store_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ActionError {
                fn from(e: $ty) -> Self {
                    ActionError::Store(e.to_string())
                }
            }
        )*
    };
}

impl_store_from!(
    redb::StorageError,
    redb::TableError,
    redb::TransactionError,
    redb::CommitError,
);

impl From<UndoError> for ActionError {
    fn from(e: UndoError) -> Self {
        ActionError::Store(e.to_string())
    }
}
