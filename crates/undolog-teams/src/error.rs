use thiserror::Error;
use undolog_core::{ActionError, UndoError, UserId};

#[derive(Debug, Error)]
pub enum TeamsError {
    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("email already registered: {0}")]
    EmailTaken(String),

    #[error("invalid email: '{0}'")]
    InvalidEmail(String),

    #[error("group not found: {0}")]
    GroupNotFound(u64),

    #[error("team not found: {0}")]
    TeamNotFound(u64),

    #[error("team subject not found: {0}")]
    SubjectNotFound(u64),

    #[error("a team named '{0}' already exists in this group")]
    TeamNameTaken(String),

    #[error("name must not be empty")]
    EmptyName,

    #[error("unsupported subject type '{0}'")]
    UnsupportedSubjectType(String),

    #[error("user {user} is already a subject of team {team}")]
    DuplicateSubject { team: u64, user: UserId },

    #[error("user {user} is not a member of group {group}")]
    NotAMember { group: u64, user: UserId },

    #[error("user {user} is not an admin of group {group}")]
    NotAdmin { group: u64, user: UserId },

    #[error("storage: {0}")]
    Store(String),

    #[error(transparent)]
    Core(#[from] UndoError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TeamsError>;

macro_rules! impl_store_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for TeamsError {
                fn from(e: $ty) -> Self {
                    TeamsError::Store(e.to_string())
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

impl From<TeamsError> for ActionError {
    fn from(e: TeamsError) -> Self {
        match e {
            TeamsError::UserNotFound(_)
            | TeamsError::GroupNotFound(_)
            | TeamsError::TeamNotFound(_)
            | TeamsError::SubjectNotFound(_) => ActionError::NotFound(e.to_string()),
            TeamsError::NotAdmin { .. } | TeamsError::NotAMember { .. } => {
                ActionError::PermissionDenied(e.to_string())
            }
            TeamsError::Store(msg) => ActionError::Store(msg),
            TeamsError::Json(e) => ActionError::Json(e),
            other => ActionError::Rejected(other.to_string()),
        }
    }
}
