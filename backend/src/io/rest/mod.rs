//! # REST API Interface Layer
//!
//! Axum routers for the planner. Every child-scoped route lives under
//! `/api/children/:child_id` and requires the `x-owner-id` header carrying
//! the authenticated caller, which the upstream auth proxy sets.
//!
//! Domain errors map onto status codes in one place, [`error_response`]:
//!
//! | error          | status |
//! |----------------|--------|
//! | Unauthorized   | 403    |
//! | Validation     | 400    |
//! | PlanLocked     | 409    |
//! | Consistency    | 409    |
//! | NotFound       | 404    |
//! | Persistence    | 500    |

pub mod child_apis;
pub mod mappers;
pub mod reward_apis;
pub mod schedule_apis;
pub mod snapshot_apis;
pub mod usage_log_apis;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
};
use shared::ErrorResponse;
use tracing::{error, warn};

use crate::domain::errors::PlannerError;

pub const OWNER_HEADER: &str = "x-owner-id";

/// Authenticated caller, taken from the `x-owner-id` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for OwnerId
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(OWNER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| OwnerId(value.to_string()))
            .ok_or_else(|| {
                warn!("Rejected request without {} header", OWNER_HEADER);
                json_error(StatusCode::UNAUTHORIZED, format!("Missing {} header", OWNER_HEADER))
            })
    }
}

fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse { error: message.into() })).into_response()
}

/// Translate a domain failure into its HTTP response
pub fn error_response(e: PlannerError) -> Response {
    let status = match &e {
        PlannerError::Unauthorized(_) => StatusCode::FORBIDDEN,
        PlannerError::Validation(_) => StatusCode::BAD_REQUEST,
        PlannerError::PlanLocked | PlannerError::Consistency(_) => StatusCode::CONFLICT,
        PlannerError::NotFound(_) => StatusCode::NOT_FOUND,
        PlannerError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!("Request failed: {:#}", e);
        return json_error(status, "Storage failure, please try again");
    }
    warn!("Request rejected ({}): {}", status, e);
    json_error(status, e.to_string())
}
