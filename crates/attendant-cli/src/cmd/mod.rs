pub mod config;
pub mod init;
pub mod position;
pub mod reconcile;
pub mod serve;

use anyhow::Context;
use attendant_core::config::Config;
use attendant_core::store::{self, PositionStore};
use std::path::Path;

/// Load the project config and open the store it points at.
pub(crate) fn open_store(root: &Path) -> anyhow::Result<(Config, Box<dyn PositionStore>)> {
    let config = Config::load_or_default(root).context("failed to load config")?;
    let store = store::open(root, &config).context("failed to open position store")?;
    Ok((config, store))
}
