use crate::error::{Result, UndoError};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ConflictPolicy
// ---------------------------------------------------------------------------

/// What an undo/redo does when the entity it reverses was changed by
/// someone else since the action was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Refuse with `IrreversibleAction`; the record stays where it is.
    #[default]
    Strict,
    /// Log a warning and reverse anyway.
    BestEffort,
}

impl ConflictPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictPolicy::Strict => "strict",
            ConflictPolicy::BestEffort => "best_effort",
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "strict" => Ok(ConflictPolicy::Strict),
            "best_effort" | "best-effort" => Ok(ConflictPolicy::BestEffort),
            other => Err(format!("unknown conflict policy '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// StoreConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// redb file, relative to the project root unless absolute.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(paths::DEFAULT_STORE_FILE)
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

// ---------------------------------------------------------------------------
// UndoConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UndoConfig {
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,
    /// Default number of rows returned by history listings.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_history_limit() -> usize {
    50
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self {
            conflict_policy: ConflictPolicy::default(),
            history_limit: default_history_limit(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub undo: UndoConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            store: StoreConfig::default(),
            undo: UndoConfig::default(),
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(UndoError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Absolute location of the action store for a project rooted at `root`.
    pub fn store_path(&self, root: &Path) -> PathBuf {
        paths::store_path(root, &self.store.path)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.version != 1 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("unsupported config version {}", self.version),
            });
        }

        if self.store.path.as_os_str().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "store.path is empty".to_string(),
            });
        }

        if self.undo.history_limit == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "undo.history_limit is 0; history listings will be empty".to_string(),
            });
        }

        if self.undo.conflict_policy == ConflictPolicy::BestEffort {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "undo.conflict_policy is best_effort: undo may overwrite \
                          changes made by other sessions"
                    .to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
