use attendant_core::error::AttendantError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
///
/// Rendered as `{ "success": false, "error": "..." }`, the same envelope the
/// positions API uses for successful responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn status(&self) -> StatusCode {
        let Some(e) = self.0.downcast_ref::<AttendantError>() else {
            return StatusCode::INTERNAL_SERVER_ERROR;
        };
        match e {
            AttendantError::PositionNotFound(_) => StatusCode::NOT_FOUND,
            AttendantError::PositionNumberTaken(_) | AttendantError::RangeConflict(_) => {
                StatusCode::CONFLICT
            }
            AttendantError::InvalidEventId(_)
            | AttendantError::InvalidPositionNumber(_)
            | AttendantError::EmptyPositionName
            | AttendantError::NoPositionNames
            | AttendantError::InvalidRange(_) => StatusCode::BAD_REQUEST,
            AttendantError::Store(_) | AttendantError::Http(_) => StatusCode::BAD_GATEWAY,
            AttendantError::NotInitialized
            | AttendantError::Io(_)
            | AttendantError::Yaml(_)
            | AttendantError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = serde_json::json!({ "success": false, "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
