use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::BookingError;
use crate::http_server::error::status_code;

/// Body returned by every create, edit and delete route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub message: String,
    /// Reason shown to the submitter; only set for rejected input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Page to show next.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

pub struct Mutation {
    status: StatusCode,
    outcome: MutationOutcome,
}

impl Mutation {
    pub fn created(message: String, id: i64, location: impl Into<String>) -> Self {
        Self::succeeded(StatusCode::CREATED, message, id, location.into())
    }

    pub fn ok(message: String, id: i64, location: impl Into<String>) -> Self {
        Self::succeeded(StatusCode::OK, message, id, location.into())
    }

    fn succeeded(status: StatusCode, message: String, id: i64, location: String) -> Self {
        log::info!("{message}");
        Self {
            status,
            outcome: MutationOutcome {
                success: true,
                error: None,
                message,
                detail: None,
                id: Some(id),
                location: Some(location),
            },
        }
    }

    /// Reports `err` with the route's user-facing `notice`. The cause is logged;
    /// only validation failures expose their reason.
    pub fn failed(err: BookingError, notice: String) -> Self {
        log::error!("{notice} ({err:?})");

        let detail = match &err {
            BookingError::Validation(reason) => Some(reason.clone()),
            _ => None,
        };

        Self {
            status: status_code(&err),
            outcome: MutationOutcome {
                success: false,
                error: Some(err.kind().to_string()),
                message: notice,
                detail,
                id: None,
                location: None,
            },
        }
    }
}

impl IntoResponse for Mutation {
    fn into_response(self) -> Response {
        (self.status, Json(self.outcome)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_shape() {
        let mutation = Mutation::created("Venue The Hop was successfully listed!".into(), 7, "/");
        assert_eq!(mutation.status, StatusCode::CREATED);

        let body = serde_json::to_value(&mutation.outcome).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["id"], 7);
        assert_eq!(body["location"], "/");
        assert!(body.get("error").is_none());
        assert!(body.get("detail").is_none());
    }

    #[test]
    fn test_failure_hides_cause() {
        let mutation = Mutation::failed(
            BookingError::ConstraintViolation("FOREIGN KEY constraint failed".into()),
            "Something went wrong! Show could not be submitted!".into(),
        );
        assert_eq!(mutation.status, StatusCode::CONFLICT);
        assert_eq!(mutation.outcome.error.as_deref(), Some("constraint_violation"));
        assert!(mutation.outcome.detail.is_none());
        assert!(!mutation.outcome.success);
    }

    #[test]
    fn test_validation_failure_explains() {
        let mutation = Mutation::failed(
            BookingError::Validation("name must not be empty".into()),
            "Artist could not be updated!".into(),
        );
        assert_eq!(mutation.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            mutation.outcome.detail.as_deref(),
            Some("name must not be empty")
        );
    }
}
