/**
 * Error Conversion
 *
 * HTTP errors are rendered uniformly as
 *
 * ```json
 * { "status": "fail", "message": "Incorrect OTP!" }
 * ```
 *
 * Socket errors become an `error` event for the originating connection.
 */

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use crate::backend::error::types::BackendError;
use crate::shared::ServerEvent;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("[Error] {} ({})", self, status);
        } else {
            tracing::debug!("[Error] {} ({})", self, status);
        }

        let body = serde_json::json!({
            "status": self.status_label(),
            "message": self.message(),
        });

        (status, Json(body)).into_response()
    }
}

impl BackendError {
    /// Socket-side rendering of this error
    pub fn to_event(&self) -> ServerEvent {
        let detail = if self.status_code().is_server_error() {
            None
        } else {
            Some(self.to_string())
        };
        ServerEvent::error(self.message(), detail)
    }
}
