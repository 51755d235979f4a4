use crate::error::{AttendantError, Result};
use crate::execute::{execute, Summary};
use crate::index::PositionIndex;
use crate::paths::validate_event_id;
use crate::plan::{parse_requested_names, plan, Decision};
use crate::store::{PositionStore, DEFAULT_LIST_LIMIT};
use serde::{Deserialize, Serialize};

/// What an operator submits: an event, newline-separated names, and an
/// optional area for every position in the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileRequest {
    pub event_id: String,
    pub positions_text: String,
    #[serde(default)]
    pub default_area: Option<String>,
}

/// Pick the area for a batch: the requested one, else `fallback`. Values
/// are trimmed and blank ones count as absent.
pub fn resolve_area(requested: Option<&str>, fallback: Option<&str>) -> Option<String> {
    let present = |a: &str| {
        let a = a.trim();
        (!a.is_empty()).then(|| a.to_string())
    };
    requested.and_then(present).or_else(|| fallback.and_then(present))
}

/// Plan a batch without touching the store beyond the initial listing.
pub fn preview(store: &dyn PositionStore, request: &ReconcileRequest) -> Result<Vec<Decision>> {
    validate_event_id(&request.event_id)?;
    let names = parse_requested_names(&request.positions_text);
    if names.is_empty() {
        return Err(AttendantError::NoPositionNames);
    }
    let index = load_index(store, &request.event_id);
    let area = resolve_area(request.default_area.as_deref(), None);
    Ok(plan(&names, &index, area.as_deref()))
}

/// Reconcile the requested names against the event's positions and apply
/// the result.
///
/// Only request validation errors are returned. Store failures end up in
/// the summary.
pub fn reconcile(store: &dyn PositionStore, request: &ReconcileRequest) -> Result<Summary> {
    let decisions = preview(store, request)?;
    tracing::info!(
        event_id = %request.event_id,
        count = decisions.len(),
        "reconciling positions"
    );
    Ok(execute(&request.event_id, &decisions, store))
}

/// Index every position of the event, active and inactive, up to the store
/// cap. A failed listing is treated as an event with no positions so the
/// batch can still make progress.
pub fn load_index(store: &dyn PositionStore, event_id: &str) -> PositionIndex {
    match store.list_positions(event_id, true, DEFAULT_LIST_LIMIT) {
        Ok(positions) => {
            if positions.len() >= DEFAULT_LIST_LIMIT {
                tracing::warn!(
                    event_id,
                    cap = DEFAULT_LIST_LIMIT,
                    "listing hit the store cap; positions beyond it are not reconciled"
                );
            }
            PositionIndex::build(&positions)
        }
        Err(e) => {
            tracing::warn!(
                event_id,
                error = %e,
                "could not list existing positions; creating without reconciliation"
            );
            PositionIndex::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execute::OutcomeAction;
    use crate::store::MemoryStore;
    use crate::types::{NewPosition, Position, PositionUpdate};

    fn request(text: &str) -> ReconcileRequest {
        ReconcileRequest {
            event_id: "ev1".to_string(),
            positions_text: text.to_string(),
            default_area: None,
        }
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.create_position("ev1", &NewPosition::new(1, "Station 1")).unwrap();
        let two = store.create_position("ev1", &NewPosition::new(2, "Station 2")).unwrap();
        store
            .update_position(
                "ev1",
                &two.id,
                &PositionUpdate {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        store
    }

    #[test]
    fn station_scenario() {
        let store = seeded();
        let summary = reconcile(&store, &request("Station 1\nStation 2\nStation 3")).unwrap();

        assert_eq!(summary.message, "1 created, 1 reactivated, 1 already active, 0 failed");
        let actions: Vec<_> = summary.outcomes.iter().map(|o| o.action).collect();
        assert_eq!(
            actions,
            vec![
                OutcomeAction::Reused,
                OutcomeAction::Reactivated,
                OutcomeAction::Created
            ]
        );
        assert_eq!(summary.outcomes[1].position_number, 2);
        assert_eq!(summary.outcomes[2].position_number, 3);

        let active = store.list_positions("ev1", false, 1000).unwrap();
        assert_eq!(active.len(), 3);
    }

    #[test]
    fn reuse_is_idempotent_across_batches() {
        let store = seeded();
        for _ in 0..2 {
            let summary = reconcile(&store, &request("Station 1")).unwrap();
            assert_eq!(summary.reused_count, 1);
            assert_eq!(summary.created_count, 0);
        }
        assert_eq!(store.snapshot("ev1").len(), 2);
    }

    #[test]
    fn rerun_after_create_reuses() {
        let store = MemoryStore::new();
        let text = "Door\nLobby\n";
        let first = reconcile(&store, &request(text)).unwrap();
        assert_eq!(first.created_count, 2);
        let second = reconcile(&store, &request(text)).unwrap();
        assert_eq!(second.reused_count, 2);
        assert_eq!(store.snapshot("ev1").len(), 2);
    }

    #[test]
    fn blank_text_is_rejected() {
        let store = MemoryStore::new();
        let err = reconcile(&store, &request("\n  \n")).unwrap_err();
        assert!(matches!(err, AttendantError::NoPositionNames));
    }

    #[test]
    fn invalid_event_id_is_rejected() {
        let store = MemoryStore::new();
        let mut req = request("Door");
        req.event_id = "../../etc".to_string();
        assert!(matches!(
            reconcile(&store, &req),
            Err(AttendantError::InvalidEventId(_))
        ));
    }

    #[test]
    fn failed_listing_degrades_to_create_only() {
        let store = MemoryStore::new();
        store.set_fail_reads(true);
        let summary = reconcile(&store, &request("Door\nLobby")).unwrap();
        assert_eq!(summary.created_count, 2);
        let numbers: Vec<u32> = summary.outcomes.iter().map(|o| o.position_number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn default_area_is_trimmed_and_applied() {
        let store = MemoryStore::new();
        let mut req = request("Door");
        req.default_area = Some("  Lobby ".to_string());
        reconcile(&store, &req).unwrap();
        let created: Vec<Position> = store.snapshot("ev1");
        assert_eq!(created[0].area.as_deref(), Some("Lobby"));

        let mut blank = request("Gate");
        blank.default_area = Some("   ".to_string());
        reconcile(&store, &blank).unwrap();
        assert!(store.snapshot("ev1")[1].area.is_none());
    }

    #[test]
    fn preview_does_not_write() {
        let store = MemoryStore::new();
        let decisions = preview(&store, &request("Station 4\nDoor")).unwrap();
        assert_eq!(decisions.len(), 2);
        assert!(store.snapshot("ev1").is_empty());
    }

    #[test]
    fn request_deserializes_from_form_json() {
        let req: ReconcileRequest = serde_json::from_str(
            r#"{"eventId": "ev1", "positionsText": "A\nB", "defaultArea": "Lobby"}"#,
        )
        .unwrap();
        assert_eq!(req.default_area.as_deref(), Some("Lobby"));
    }

    fn stored(id: &str, number: u32, name: &str, active: bool) -> Position {
        let mut p = Position::from_new(id, "ev1", &NewPosition::new(number, name));
        p.is_active = active;
        p
    }

    #[test]
    fn every_existing_position_is_indexed() {
        let store = MemoryStore::with_positions(vec![
            stored("a", 1, "Door", true),
            stored("b", 2, "Lobby", true),
            stored("c", 3, "Gate", true),
        ]);
        let summary = reconcile(&store, &request("Gate\nLobby")).unwrap();

        assert_eq!(summary.reused_count, 2);
        assert_eq!(summary.failed_count, 0);
        assert_eq!(summary.outcomes[0].position_id.as_deref(), Some("c"));
        assert_eq!(summary.outcomes[1].position_id.as_deref(), Some("b"));
    }

    #[test]
    fn index_reads_up_to_store_cap() {
        let positions = (1..=DEFAULT_LIST_LIMIT as u32)
            .map(|n| stored(&format!("p{n}"), n, &format!("Post {n}"), true))
            .collect();
        let store = MemoryStore::with_positions(positions);

        let index = load_index(&store, "ev1");
        assert_eq!(index.by_number.len(), DEFAULT_LIST_LIMIT);
        assert_eq!(index.max_number, 1000);
    }

    #[test]
    fn duplicate_names_in_store_last_one_wins() {
        let store = MemoryStore::with_positions(vec![
            stored("old", 1, "Door", false),
            stored("new", 2, "door ", true),
        ]);
        assert_eq!(load_index(&store, "ev1").duplicate_names, vec!["door"]);

        let summary = reconcile(&store, &request("Door")).unwrap();
        assert_eq!(summary.outcomes[0].action, OutcomeAction::Reused);
        assert_eq!(summary.outcomes[0].position_id.as_deref(), Some("new"));
        assert_eq!(summary.outcomes[0].position_number, 2);
    }

    #[test]
    fn duplicate_numbers_in_store_last_one_wins() {
        let store = MemoryStore::with_positions(vec![
            stored("first", 5, "Gate", false),
            stored("second", 5, "Exit", false),
        ]);
        assert_eq!(load_index(&store, "ev1").duplicate_numbers, vec![5]);

        let summary = reconcile(&store, &request("Station 5")).unwrap();
        assert_eq!(summary.outcomes[0].action, OutcomeAction::Reactivated);
        assert_eq!(summary.outcomes[0].position_id.as_deref(), Some("second"));

        let snapshot = store.snapshot("ev1");
        assert!(!snapshot[0].is_active);
        assert!(snapshot[1].is_active);
        assert_eq!(snapshot[1].name, "Station 5");
    }

    #[test]
    fn resolve_area_skips_blank_values() {
        assert_eq!(resolve_area(Some(" Hall "), Some("Lobby")).as_deref(), Some("Hall"));
        assert_eq!(resolve_area(Some(""), Some("Lobby")).as_deref(), Some("Lobby"));
        assert_eq!(resolve_area(Some("  "), Some(" Lobby ")).as_deref(), Some("Lobby"));
        assert_eq!(resolve_area(None, Some("   ")), None);
        assert_eq!(resolve_area(None, None), None);
    }
}
