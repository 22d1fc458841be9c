use anyhow::Context;
use std::path::Path;
use undolog_core::{io, paths, ActionStore, Config};
use undolog_teams::Directory;

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Initializing undolog in: {}", root.display());

    let dir = paths::undolog_dir(root);
    io::ensure_dir(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let config_path = paths::config_path(root);
    let config = if config_path.exists() {
        println!("  exists:  {}", paths::CONFIG_FILE);
        Config::load(root).context("failed to load config")?
    } else {
        let config = Config::default();
        config.save(root).context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
        config
    };

    let store_path = config.store_path(root);
    let existed = store_path.exists();
    let store = ActionStore::open(&store_path)
        .with_context(|| format!("failed to open {}", store_path.display()))?;
    Directory::open(&store).context("failed to create team tables")?;
    let label = if existed { "exists: " } else { "created:" };
    println!("  {label} {}", store_path.display());

    Ok(())
}
