use super::PositionStore;
use crate::error::{AttendantError, Result};
use crate::types::{NewPosition, Position, PositionUpdate};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Remote store speaking the scheduler's positions API:
///
/// - `GET  {base}/api/events/{event}/positions?includeInactive=..&limit=..`
/// - `POST {base}/api/events/{event}/positions`
/// - `PUT  {base}/api/events/{event}/positions/{id}`
///
/// Responses use the `{ success, data, error }` envelope.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PositionPage {
    positions: Vec<Position>,
}

impl HttpStore {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn positions_url(&self, event_id: &str) -> String {
        format!("{}/api/events/{}/positions", self.base_url, event_id)
    }
}

/// Unwrap the `{ success, data, error }` envelope.
fn read<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text()?;
    let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|_| {
        AttendantError::Store(format!("unexpected response ({status}): {}", truncate(&body)))
    })?;
    match envelope {
        Envelope {
            success: true,
            data: Some(data),
            ..
        } if status.is_success() => Ok(data),
        Envelope { error, .. } => Err(AttendantError::Store(
            error.unwrap_or_else(|| format!("request failed with status {status}")),
        )),
    }
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((i, _)) => &body[..i],
        None => body,
    }
}

impl PositionStore for HttpStore {
    fn list_positions(
        &self,
        event_id: &str,
        include_inactive: bool,
        limit: usize,
    ) -> Result<Vec<Position>> {
        let request = self.client.get(self.positions_url(event_id)).query(&[
            ("includeInactive", include_inactive.to_string()),
            ("limit", limit.to_string()),
        ]);
        let page: PositionPage = read(request.send()?)?;
        tracing::debug!(event_id, count = page.positions.len(), "listed remote positions");
        Ok(page.positions)
    }

    fn create_position(&self, event_id: &str, data: &NewPosition) -> Result<Position> {
        data.validate()?;
        let mut body = data.clone();
        body.sequence.get_or_insert(data.position_number);
        let response = self.client.post(self.positions_url(event_id)).json(&body).send()?;
        read(response)
    }

    fn update_position(
        &self,
        event_id: &str,
        position_id: &str,
        data: &PositionUpdate,
    ) -> Result<Position> {
        let url = format!("{}/{}", self.positions_url(event_id), position_id);
        let response = self.client.put(url).json(data).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(AttendantError::PositionNotFound(position_id.to_string()));
        }
        read(response)
    }
}
