use super::{select, PositionStore};
use crate::error::{AttendantError, Result};
use crate::types::{NewPosition, Position, PositionUpdate};
use crate::{io, paths};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Positions stored as one YAML list per event under
/// `.attendant/events/<event>/positions.yaml`.
///
/// Each call is a full read-modify-write. The mutex serializes writers in
/// this process; cross-process writers are not coordinated.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn load(&self, event_id: &str) -> Result<Vec<Position>> {
        paths::validate_event_id(event_id)?;
        let path = paths::positions_path(&self.root, event_id);
        match io::read_optional(&path)? {
            Some(data) if !data.trim().is_empty() => Ok(serde_yaml::from_str(&data)?),
            _ => Ok(Vec::new()),
        }
    }

    fn save(&self, event_id: &str, positions: &[Position]) -> Result<()> {
        let path = paths::positions_path(&self.root, event_id);
        let data = serde_yaml::to_string(positions)?;
        io::atomic_write(&path, data.as_bytes())
    }
}

impl PositionStore for FileStore {
    fn list_positions(
        &self,
        event_id: &str,
        include_inactive: bool,
        limit: usize,
    ) -> Result<Vec<Position>> {
        Ok(select(self.load(event_id)?, include_inactive, limit))
    }

    fn create_position(&self, event_id: &str, data: &NewPosition) -> Result<Position> {
        data.validate()?;
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut positions = self.load(event_id)?;
        if positions
            .iter()
            .any(|p| p.position_number == data.position_number)
        {
            return Err(AttendantError::PositionNumberTaken(data.position_number));
        }
        let position = Position::from_new(uuid::Uuid::new_v4().to_string(), event_id, data);
        positions.push(position.clone());
        self.save(event_id, &positions)?;
        Ok(position)
    }

    fn update_position(
        &self,
        event_id: &str,
        position_id: &str,
        data: &PositionUpdate,
    ) -> Result<Position> {
        data.validate()?;
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut positions = self.load(event_id)?;
        let position = positions
            .iter_mut()
            .find(|p| p.id == position_id)
            .ok_or_else(|| AttendantError::PositionNotFound(position_id.to_string()))?;
        position.apply(data);
        let updated = position.clone();
        self.save(event_id, &positions)?;
        Ok(updated)
    }
}
