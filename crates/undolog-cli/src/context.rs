use anyhow::Context;
use std::path::Path;
use undolog_core::{ActionGroupId, ActionHandler, Actor, Config, SessionId, UserId};
use undolog_teams::Directory;
use uuid::Uuid;

/// Flags shared by every subcommand.
pub struct Globals {
    pub json: bool,
    pub user: Option<u64>,
    pub session: Option<String>,
    pub action_group: Option<Uuid>,
}

impl Globals {
    pub fn user(&self) -> anyhow::Result<UserId> {
        self.user
            .map(UserId)
            .context("--user is required (or set UNDOLOG_USER)")
    }

    pub fn session(&self) -> anyhow::Result<SessionId> {
        let raw = self
            .session
            .as_deref()
            .context("--session is required (or set UNDOLOG_SESSION)")?;
        Ok(SessionId::new(raw)?)
    }

    /// The acting user. Without `--session` the action is logged but can't
    /// be undone.
    pub fn actor(&self) -> anyhow::Result<Actor> {
        let mut actor = Actor::new(self.user()?);
        if let Some(raw) = self.session.as_deref() {
            actor = actor.with_session(SessionId::new(raw)?);
        }
        if let Some(group) = self.action_group {
            actor = actor.with_action_group(ActionGroupId(group));
        }
        Ok(actor)
    }
}

/// An opened project: config plus a handler over its action store.
pub struct Project {
    pub config: Config,
    pub handler: ActionHandler,
}

impl Project {
    pub fn open(root: &Path) -> anyhow::Result<Self> {
        let config = Config::load(root).context("failed to load config")?;
        let registry = undolog_teams::registry()?;
        let handler = ActionHandler::open(root, &config, registry).with_context(|| {
            format!("failed to open action store {}", config.store_path(root).display())
        })?;
        Ok(Self { config, handler })
    }

    pub fn directory(&self) -> anyhow::Result<Directory<'_>> {
        Ok(Directory::open(self.handler.store())?)
    }
}
