use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::{blocking, envelope};
use crate::error::AppError;
use crate::state::AppState;
use attendant_core::execute::Summary;
use attendant_core::range::{create_range, RangeRequest};
use attendant_core::reconcile::{reconcile, resolve_area, ReconcileRequest};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileBody {
    pub positions_text: String,
    #[serde(default)]
    pub default_area: Option<String>,
}

/// POST /api/events/:id/positions/reconcile — reuse, reactivate or create a
/// position for every line of `positionsText`.
///
/// Item failures are part of the summary. A blank `defaultArea` falls back
/// to the configured one.
pub async fn reconcile_positions(
    State(app): State<AppState>,
    Path(event_id): Path<String>,
    Json(body): Json<ReconcileBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let request = ReconcileRequest {
        event_id,
        positions_text: body.positions_text,
        default_area: resolve_area(body.default_area.as_deref(), app.default_area.as_deref()),
    };
    let store = app.store.clone();
    let summary = blocking(move || reconcile(store.as_ref(), &request)).await?;
    Ok(summary_response(summary, StatusCode::OK))
}

/// POST /api/events/:id/positions/bulk-create — create "<prefix> <n>" for a
/// numbered range. Rejected as a whole when any number is already used;
/// reported like reconcile when every write fails.
pub async fn bulk_create(
    State(app): State<AppState>,
    Path(event_id): Path<String>,
    Json(body): Json<RangeRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let store = app.store.clone();
    let summary = blocking(move || create_range(store.as_ref(), &event_id, &body)).await?;
    Ok(summary_response(summary, StatusCode::CREATED))
}

/// Wrap a batch summary. When nothing succeeded the envelope carries
/// `success: false` and the message, with the summary still in `data`.
fn summary_response(summary: Summary, status: StatusCode) -> (StatusCode, Json<serde_json::Value>) {
    if summary.is_total_failure() {
        let body = serde_json::json!({
            "success": false,
            "error": summary.message,
            "data": summary,
        });
        return (StatusCode::OK, Json(body));
    }
    (status, envelope(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use attendant_core::execute::{Outcome, OutcomeAction};

    fn outcome(action: OutcomeAction) -> Outcome {
        Outcome {
            name: "Position 1".to_string(),
            action,
            position_id: None,
            position_number: 1,
            error: (action == OutcomeAction::Failed).then(|| "store unavailable".to_string()),
        }
    }

    #[test]
    fn total_failure_is_not_success() {
        let summary = Summary::from_outcomes(vec![
            outcome(OutcomeAction::Failed),
            outcome(OutcomeAction::Failed),
        ]);
        let (status, Json(body)) = summary_response(summary, StatusCode::CREATED);

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "0 created, 0 reactivated, 0 already active, 2 failed");
        assert_eq!(body["data"]["failedCount"], 2);
    }

    #[test]
    fn partial_failure_keeps_status() {
        let summary = Summary::from_outcomes(vec![
            outcome(OutcomeAction::Created),
            outcome(OutcomeAction::Failed),
        ]);
        let (status, Json(body)) = summary_response(summary, StatusCode::CREATED);

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["createdCount"], 1);
    }
}
