use anyhow::Context;
use attendant_core::{config::Config, io, paths};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Initializing attendant in: {}", root.display());

    for dir in [paths::ATTENDANT_DIR, paths::EVENTS_DIR] {
        let p = root.join(dir);
        io::ensure_dir(&p).with_context(|| format!("failed to create {}", p.display()))?;
    }

    if paths::config_path(root).exists() {
        println!("  exists:  {}", paths::CONFIG_FILE);
    } else {
        Config::new()
            .save(root)
            .context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
    }

    Ok(())
}
