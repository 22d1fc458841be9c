use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const UNDOLOG_DIR: &str = ".undolog";
pub const CONFIG_FILE: &str = ".undolog/config.yaml";
pub const DEFAULT_STORE_FILE: &str = ".undolog/actions.redb";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn undolog_dir(root: &Path) -> PathBuf {
    root.join(UNDOLOG_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Resolve the configured store path against `root` unless it is absolute.
pub fn store_path(root: &Path, configured: &Path) -> PathBuf {
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        root.join(configured)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
