use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::any::Any;

use crate::error::BookingError;

/// HTTP status for each failure kind.
pub fn status_code(err: &BookingError) -> StatusCode {
    match err {
        BookingError::NotFound { .. } => StatusCode::NOT_FOUND,
        BookingError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        BookingError::ConstraintViolation(_) => StatusCode::CONFLICT,
        BookingError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
        BookingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn server_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "server_error", "message": "Something went wrong" })),
    )
        .into_response()
}

/// Response for a handler that panicked; the panic message only goes to the log.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    log::error!("Request handler panicked: {}", message);
    server_error_response()
}

pub fn not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "not_found", "message": "Page not found" })),
    )
        .into_response()
}

// Error of a read route. Missing rows become the not-found page, anything else
// is logged and reported as a generic server error.
pub struct PageError(BookingError);

impl std::fmt::Debug for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<BookingError> for PageError {
    fn from(err: BookingError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let err = self.0;

        if let BookingError::NotFound { .. } = err {
            log::debug!("{err}");
            return not_found_response();
        }

        log::error!("{err:?}");
        server_error_response()
    }
}
