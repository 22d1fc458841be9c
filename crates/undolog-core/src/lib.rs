pub mod action;
pub mod config;
pub mod cursor;
pub mod error;
pub mod handler;
pub mod io;
pub mod paths;
pub mod record;
pub mod registry;
pub mod scope;
pub mod store;

pub use action::{ActionContext, ActionType, Applied, DynActionType, Value};
pub use config::{Config, ConflictPolicy};
pub use error::{ActionError, Result, UndoError};
pub use handler::{ActionHandler, Performed, Replay, ReplayedAction};
pub use record::{ActionGroupId, ActionRecord, Actor, RecordId, RecordState, SessionId, UserId};
pub use registry::{ActionTypeRegistry, RegistryBuilder};
pub use scope::Scope;
pub use store::{ActionStore, HistoryEntry};
