mod cmd;
mod context;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    config::ConfigSubcommand, group::GroupSubcommand, subject::SubjectSubcommand,
    team::TeamSubcommand, user::UserSubcommand,
};
use context::Globals;
use std::path::PathBuf;
use undolog_core::Scope;
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "undolog",
    about = "Manage teams through undoable actions and step back through them per session",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .undolog/)
    #[arg(long, global = true, env = "UNDOLOG_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Session the action is recorded under; required for undo, redo and history
    #[arg(long, global = true, env = "UNDOLOG_SESSION")]
    session: Option<String>,

    /// Id of the acting user
    #[arg(long, global = true, env = "UNDOLOG_USER")]
    user: Option<u64>,

    /// Record the action in this action group so it undoes with its siblings
    #[arg(long, global = true, value_name = "UUID")]
    action_group: Option<Uuid>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize undolog in the current project
    Init,

    /// Manage users
    User {
        #[command(subcommand)]
        subcommand: UserSubcommand,
    },

    /// Manage groups and their members
    Group {
        #[command(subcommand)]
        subcommand: GroupSubcommand,
    },

    /// Create, rename, delete and list teams (undoable)
    Team {
        #[command(subcommand)]
        subcommand: TeamSubcommand,
    },

    /// Add and remove team subjects (undoable)
    Subject {
        #[command(subcommand)]
        subcommand: SubjectSubcommand,
    },

    /// Undo the session's most recent action in the given scopes
    Undo {
        #[command(flatten)]
        scopes: ScopeArgs,
    },

    /// Redo the session's most recently undone action in the given scopes
    Redo {
        #[command(flatten)]
        scopes: ScopeArgs,
    },

    /// List the session's actions in the given scopes, newest first
    History {
        #[command(flatten)]
        scopes: ScopeArgs,
        /// Maximum rows (default: undo.history_limit from config)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Inspect the project config
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Scopes an undo/redo/history call is restricted to.
#[derive(clap::Args)]
struct ScopeArgs {
    /// Group id; shorthand for --scope teams:<id>
    #[arg(long = "group", value_name = "ID")]
    groups: Vec<u64>,

    /// Raw scope in kind:id form
    #[arg(long = "scope", value_name = "SCOPE")]
    scopes: Vec<Scope>,
}

impl ScopeArgs {
    fn into_scopes(self) -> anyhow::Result<Vec<Scope>> {
        let mut scopes: Vec<Scope> = self
            .groups
            .into_iter()
            .map(undolog_teams::teams_scope)
            .collect();
        scopes.extend(self.scopes);
        if scopes.is_empty() {
            anyhow::bail!("at least one --group or --scope is required");
        }
        Ok(scopes)
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let globals = Globals {
        json: cli.json,
        user: cli.user,
        session: cli.session,
        action_group: cli.action_group,
    };

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::User { subcommand } => cmd::user::run(&root, subcommand, &globals),
        Commands::Group { subcommand } => cmd::group::run(&root, subcommand, &globals),
        Commands::Team { subcommand } => cmd::team::run(&root, subcommand, &globals),
        Commands::Subject { subcommand } => cmd::subject::run(&root, subcommand, &globals),
        Commands::Undo { scopes } => scopes
            .into_scopes()
            .and_then(|scopes| cmd::replay::undo(&root, &scopes, &globals)),
        Commands::Redo { scopes } => scopes
            .into_scopes()
            .and_then(|scopes| cmd::replay::redo(&root, &scopes, &globals)),
        Commands::History { scopes, limit } => scopes
            .into_scopes()
            .and_then(|scopes| cmd::replay::history(&root, &scopes, limit, &globals)),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, globals.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
