use crate::error::{AttendantError, Result};
use crate::execute::{execute, Summary};
use crate::index::PositionIndex;
use crate::paths::validate_event_id;
use crate::plan::{Decision, Numbering};
use crate::store::{PositionStore, DEFAULT_LIST_LIMIT};
use crate::types::is_valid_number;
use serde::{Deserialize, Serialize};

/// Most positions one range request may create.
pub const MAX_RANGE_SIZE: u32 = 100;

/// Create "<prefix> <n>" for every n in `start..=end`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeRequest {
    #[serde(rename = "startNumber")]
    pub start: u32,
    #[serde(rename = "endNumber")]
    pub end: u32,
    #[serde(rename = "namePrefix", default = "default_prefix")]
    pub prefix: String,
    #[serde(default)]
    pub area: Option<String>,
}

fn default_prefix() -> String {
    "Position".to_string()
}

impl RangeRequest {
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            start,
            end,
            prefix: default_prefix(),
            area: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !is_valid_number(self.start) || !is_valid_number(self.end) {
            return Err(AttendantError::InvalidRange(
                "numbers must be between 1 and 1000".to_string(),
            ));
        }
        if self.end < self.start {
            return Err(AttendantError::InvalidRange(
                "end number must be greater than or equal to start number".to_string(),
            ));
        }
        if self.end - self.start + 1 > MAX_RANGE_SIZE {
            return Err(AttendantError::InvalidRange(format!(
                "cannot create more than {MAX_RANGE_SIZE} positions at once"
            )));
        }
        if self.prefix.trim().is_empty() {
            return Err(AttendantError::EmptyPositionName);
        }
        Ok(())
    }
}

/// Turn a range request into create decisions.
///
/// All-or-nothing: any existing position (active or inactive) inside the
/// range rejects the request.
pub fn plan_range(request: &RangeRequest, index: &PositionIndex) -> Result<Vec<Decision>> {
    request.validate()?;

    let conflicts: Vec<u32> = (request.start..=request.end)
        .filter(|n| index.holds_number(*n))
        .collect();
    if !conflicts.is_empty() {
        return Err(AttendantError::RangeConflict(conflicts));
    }

    let prefix = request.prefix.trim();
    let area = request
        .area
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string);
    Ok((request.start..=request.end)
        .map(|n| Decision::Create {
            name: format!("{prefix} {n}"),
            position_number: n,
            area: area.clone(),
            numbering: Numbering::Requested,
        })
        .collect())
}

/// Validate, check for conflicts against the store, then create the range.
///
/// Unlike reconciliation, a failed listing is an error here: the conflict
/// check cannot be skipped.
pub fn create_range(
    store: &dyn PositionStore,
    event_id: &str,
    request: &RangeRequest,
) -> Result<Summary> {
    validate_event_id(event_id)?;
    let existing = store.list_positions(event_id, true, DEFAULT_LIST_LIMIT)?;
    let decisions = plan_range(request, &PositionIndex::build(&existing))?;
    tracing::info!(
        event_id,
        start = request.start,
        end = request.end,
        "creating position range"
    );
    Ok(execute(event_id, &decisions, store))
}
