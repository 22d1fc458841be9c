pub mod actions;
pub mod directory;
pub mod error;
pub mod model;
mod repo;

pub use actions::{register, registry};
pub use directory::Directory;
pub use error::{Result, TeamsError};
pub use model::{
    teams_scope, Group, GroupRole, SubjectRef, Team, TeamSubject, User, AUTH_USER, TEAMS_SCOPE,
};
