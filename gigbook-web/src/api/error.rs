//! API error responses
//!
//! Status mapping: invalid input 400, missing row 404, dangling reference
//! 409, everything else 500.

use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use gigbook_common::Error;
use serde_json::json;
use tracing::{error, warn};

/// Error returned by handlers
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    /// User-facing message
    message: String,
    /// Underlying cause, if any
    detail: Option<String>,
}

impl ApiError {
    /// Wrap a store error with the message to show the user
    pub fn new(err: Error, message: impl Into<String>) -> Self {
        let status = status_for(&err);
        let message = message.into();

        if status.is_server_error() {
            error!("{}: {}", message, err);
        } else {
            warn!("{}: {}", message, err);
        }

        Self {
            status,
            message,
            detail: Some(err.to_string()),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let message = err.to_string();
        Self::new(err, message)
    }
}

fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::DataIntegrity(_) => StatusCode::CONFLICT,
        Error::Database(_)
        | Error::Io(_)
        | Error::Config(_)
        | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.detail {
            Some(detail) if detail != self.message => json!({
                "success": false,
                "message": self.message,
                "error": detail,
            }),
            _ => json!({
                "success": false,
                "message": self.message,
            }),
        };

        (self.status, Json(body)).into_response()
    }
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError {
        status: StatusCode::NOT_FOUND,
        message: format!("No route for {}", uri.path()),
        detail: None,
    }
}
