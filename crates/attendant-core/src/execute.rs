use crate::plan::Decision;
use crate::store::PositionStore;
use crate::types::{NewPosition, PositionUpdate};
use serde::Serialize;
use std::fmt;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeAction {
    Reused,
    Reactivated,
    Created,
    Failed,
}

impl fmt::Display for OutcomeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutcomeAction::Reused => "reused",
            OutcomeAction::Reactivated => "reactivated",
            OutcomeAction::Created => "created",
            OutcomeAction::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Result of applying one decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub name: String,
    pub action: OutcomeAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_id: Option<String>,
    pub position_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub created_count: usize,
    pub reactivated_count: usize,
    pub reused_count: usize,
    pub failed_count: usize,
    pub message: String,
    pub outcomes: Vec<Outcome>,
}

impl Summary {
    pub fn from_outcomes(outcomes: Vec<Outcome>) -> Self {
        let count = |a: OutcomeAction| outcomes.iter().filter(|o| o.action == a).count();
        let mut summary = Summary {
            created_count: count(OutcomeAction::Created),
            reactivated_count: count(OutcomeAction::Reactivated),
            reused_count: count(OutcomeAction::Reused),
            failed_count: count(OutcomeAction::Failed),
            message: String::new(),
            outcomes,
        };
        summary.message = summary.recap();
        summary
    }

    /// "12 created, 3 reactivated, 1 already active, 0 failed"
    pub fn recap(&self) -> String {
        format!(
            "{} created, {} reactivated, {} already active, {} failed",
            self.created_count, self.reactivated_count, self.reused_count, self.failed_count
        )
    }

    pub fn succeeded_count(&self) -> usize {
        self.created_count + self.reactivated_count + self.reused_count
    }

    /// Nothing succeeded and at least one item failed.
    pub fn is_total_failure(&self) -> bool {
        self.succeeded_count() == 0 && self.failed_count > 0
    }
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Apply every decision against the store, one at a time.
///
/// Failures are recorded per item and never abort the batch. Reuse
/// decisions make no store call.
pub fn execute(event_id: &str, decisions: &[Decision], store: &dyn PositionStore) -> Summary {
    let outcomes: Vec<Outcome> = decisions
        .iter()
        .map(|d| apply(event_id, d, store))
        .collect();
    let summary = Summary::from_outcomes(outcomes);

    if summary.is_total_failure() {
        tracing::warn!(event_id, "{}", summary.message);
    } else {
        tracing::info!(event_id, "{}", summary.message);
    }
    summary
}

fn apply(event_id: &str, decision: &Decision, store: &dyn PositionStore) -> Outcome {
    let result = match decision {
        Decision::Reuse { position_id, .. } => Ok((OutcomeAction::Reused, position_id.clone())),
        Decision::Reactivate {
            position_id,
            name,
            area,
            ..
        } => {
            let update = PositionUpdate {
                name: Some(name.clone()),
                area: area.clone(),
                is_active: Some(true),
                ..Default::default()
            };
            store
                .update_position(event_id, position_id, &update)
                .map(|p| (OutcomeAction::Reactivated, p.id))
        }
        Decision::Create {
            name,
            position_number,
            area,
            ..
        } => {
            let data = NewPosition {
                position_number: *position_number,
                name: name.clone(),
                area: area.clone(),
                description: None,
                sequence: Some(*position_number),
            };
            store
                .create_position(event_id, &data)
                .map(|p| (OutcomeAction::Created, p.id))
        }
    };

    match result {
        Ok((action, id)) => Outcome {
            name: decision.name().to_string(),
            action,
            position_id: Some(id),
            position_number: decision.position_number(),
            error: None,
        },
        Err(e) => {
            tracing::warn!(
                event_id,
                name = decision.name(),
                action = decision.label(),
                error = %e,
                "position write failed"
            );
            Outcome {
                name: decision.name().to_string(),
                action: OutcomeAction::Failed,
                position_id: decision.position_id().map(str::to_string),
                position_number: decision.position_number(),
                error: Some(e.to_string()),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
