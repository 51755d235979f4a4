use crate::error::{AttendantError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const ATTENDANT_DIR: &str = ".attendant";
pub const EVENTS_DIR: &str = ".attendant/events";
pub const CONFIG_FILE: &str = ".attendant/config.yaml";
pub const POSITIONS_FILE: &str = "positions.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn events_dir(root: &Path) -> PathBuf {
    root.join(EVENTS_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn event_dir(root: &Path, event_id: &str) -> PathBuf {
    events_dir(root).join(event_id)
}

pub fn positions_path(root: &Path, event_id: &str) -> PathBuf {
    event_dir(root, event_id).join(POSITIONS_FILE)
}

// ---------------------------------------------------------------------------
// Event id validation
// ---------------------------------------------------------------------------

static EVENT_ID_RE: OnceLock<Regex> = OnceLock::new();

fn event_id_re() -> &'static Regex {
    EVENT_ID_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_\-]*$").unwrap())
}

/// Event ids become directory names, so only plain id characters pass.
pub fn validate_event_id(event_id: &str) -> Result<()> {
    if event_id.is_empty() || event_id.len() > 64 || !event_id_re().is_match(event_id) {
        return Err(AttendantError::InvalidEventId(event_id.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
