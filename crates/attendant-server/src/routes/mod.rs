pub mod positions;
pub mod reconcile;

use crate::error::AppError;
use axum::Json;
use serde::Serialize;

/// `{ "success": true, "data": ... }`
pub(crate) fn envelope<T: Serialize>(data: T) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "success": true, "data": data }))
}

/// Run blocking store work off the async runtime.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> attendant_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(result)
}
