use crate::error::{AttendantError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest position number an event may use.
pub const MIN_POSITION_NUMBER: u32 = 1;
/// Highest position number an event may use.
pub const MAX_POSITION_NUMBER: u32 = 1000;

pub fn is_valid_number(n: u32) -> bool {
    (MIN_POSITION_NUMBER..=MAX_POSITION_NUMBER).contains(&n)
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A named, numbered post at an event.
///
/// Serialized camelCase. The snake_case aliases let one type absorb both
/// spellings that turn up in stored data and API payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    #[serde(alias = "event_id")]
    pub event_id: String,
    pub name: String,
    #[serde(alias = "position_number")]
    pub position_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub sequence: u32,
    #[serde(default = "default_active", alias = "is_active")]
    pub is_active: bool,
    #[serde(default, alias = "created_at", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updated_at", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl Position {
    /// Materialize a stored position from a create request.
    pub fn from_new(id: impl Into<String>, event_id: impl Into<String>, data: &NewPosition) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            event_id: event_id.into(),
            name: data.name.clone(),
            position_number: data.position_number,
            area: data.area.clone(),
            description: data.description.clone(),
            sequence: data.sequence.unwrap_or(data.position_number),
            is_active: true,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Apply the fields present in `update`, leaving the rest untouched.
    pub fn apply(&mut self, update: &PositionUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(area) = &update.area {
            self.area = Some(area.clone());
        }
        if let Some(description) = &update.description {
            self.description = Some(description.clone());
        }
        if let Some(sequence) = update.sequence {
            self.sequence = sequence;
        }
        if let Some(active) = update.is_active {
            self.is_active = active;
        }
        self.updated_at = Some(Utc::now());
    }
}

// ---------------------------------------------------------------------------
// NewPosition / PositionUpdate
// ---------------------------------------------------------------------------

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPosition {
    pub position_number: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,
}

impl NewPosition {
    pub fn new(position_number: u32, name: impl Into<String>) -> Self {
        Self {
            position_number,
            name: name.into(),
            area: None,
            description: None,
            sequence: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !is_valid_number(self.position_number) {
            return Err(AttendantError::InvalidPositionNumber(self.position_number));
        }
        if self.name.trim().is_empty() {
            return Err(AttendantError::EmptyPositionName);
        }
        Ok(())
    }
}

/// Body of an update request. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl PositionUpdate {
    pub fn validate(&self) -> Result<()> {
        if matches!(&self.name, Some(n) if n.trim().is_empty()) {
            return Err(AttendantError::EmptyPositionName);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
