//! Position persistence behind a single trait.
//!
//! The reconciliation engine only ever talks to [`PositionStore`]. Adapters:
//! [`MemoryStore`] for tests and embedding, [`FileStore`] for the local YAML
//! layout under `.attendant/`, and [`HttpStore`] for a remote positions API.

mod file;
mod http;
mod memory;

pub use file::FileStore;
pub use http::HttpStore;
pub use memory::MemoryStore;

use crate::config::{Config, StoreBackend};
use crate::error::Result;
use crate::types::{NewPosition, Position, PositionUpdate};
use std::path::Path;

/// Upper bound on positions fetched in one listing.
pub const DEFAULT_LIST_LIMIT: usize = 1000;

pub trait PositionStore: Send + Sync {
    /// Positions for an event ordered by (sequence, number), at most `limit`.
    fn list_positions(
        &self,
        event_id: &str,
        include_inactive: bool,
        limit: usize,
    ) -> Result<Vec<Position>>;

    /// Create a position. Fails when any position of the event already holds
    /// the number.
    fn create_position(&self, event_id: &str, data: &NewPosition) -> Result<Position>;

    fn update_position(
        &self,
        event_id: &str,
        position_id: &str,
        data: &PositionUpdate,
    ) -> Result<Position>;
}

/// Open the store the project config points at.
pub fn open(root: &Path, config: &Config) -> Result<Box<dyn PositionStore>> {
    match &config.store {
        StoreBackend::File => Ok(Box::new(FileStore::new(root))),
        StoreBackend::Http {
            base_url,
            timeout_secs,
        } => Ok(Box::new(HttpStore::new(base_url, *timeout_secs)?)),
    }
}

/// Shared ordering and filtering used by the local adapters.
pub(crate) fn select(
    mut positions: Vec<Position>,
    include_inactive: bool,
    limit: usize,
) -> Vec<Position> {
    positions.retain(|p| include_inactive || p.is_active);
    positions.sort_by_key(|p| (p.sequence, p.position_number));
    positions.truncate(limit);
    positions
}
