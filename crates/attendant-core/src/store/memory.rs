use super::{select, PositionStore};
use crate::error::{AttendantError, Result};
use crate::types::{NewPosition, Position, PositionUpdate};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// In-process store keyed by event id.
///
/// `fail_reads` / `fail_writes` make every corresponding call error, which is
/// how callers exercise degraded paths without a real backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: Mutex<HashMap<String, Vec<Position>>>,
    next_id: Mutex<u64>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed positions as-is, bypassing validation.
    pub fn with_positions(positions: Vec<Position>) -> Self {
        let store = Self::new();
        {
            let mut events = store.lock();
            for p in positions {
                events.entry(p.event_id.clone()).or_default().push(p);
            }
        }
        store
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Every stored position of an event, in insertion order.
    pub fn snapshot(&self, event_id: &str) -> Vec<Position> {
        self.lock().get(event_id).cloned().unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<Position>>> {
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn mint_id(&self) -> String {
        let mut n = self.next_id.lock().unwrap_or_else(|e| e.into_inner());
        *n += 1;
        format!("mem-{}", *n)
    }

    fn check_writes(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AttendantError::Store("store unavailable".to_string()));
        }
        Ok(())
    }
}

impl PositionStore for MemoryStore {
    fn list_positions(
        &self,
        event_id: &str,
        include_inactive: bool,
        limit: usize,
    ) -> Result<Vec<Position>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AttendantError::Store("store unavailable".to_string()));
        }
        Ok(select(self.snapshot(event_id), include_inactive, limit))
    }

    fn create_position(&self, event_id: &str, data: &NewPosition) -> Result<Position> {
        self.check_writes()?;
        data.validate()?;
        let id = self.mint_id();
        let mut events = self.lock();
        let positions = events.entry(event_id.to_string()).or_default();
        if positions
            .iter()
            .any(|p| p.position_number == data.position_number)
        {
            return Err(AttendantError::PositionNumberTaken(data.position_number));
        }
        let position = Position::from_new(id, event_id, data);
        positions.push(position.clone());
        Ok(position)
    }

    fn update_position(
        &self,
        event_id: &str,
        position_id: &str,
        data: &PositionUpdate,
    ) -> Result<Position> {
        self.check_writes()?;
        data.validate()?;
        let mut events = self.lock();
        let position = events
            .get_mut(event_id)
            .and_then(|ps| ps.iter_mut().find(|p| p.id == position_id))
            .ok_or_else(|| AttendantError::PositionNotFound(position_id.to_string()))?;
        position.apply(data);
        Ok(position.clone())
    }
}
