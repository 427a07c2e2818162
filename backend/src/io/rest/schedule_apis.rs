//! # REST API for Schedules
//!
//! Read a child's week, reconcile a locally edited week into storage, clear
//! it, seed it from a grade template, and report time per category.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use shared::{ApplyTemplateRequest, SyncScheduleRequest};
use tracing::info;

use crate::domain::models::ChildContext;
use crate::io::rest::mappers::{RewardMapper, SlotMapper};
use crate::io::rest::{error_response, OwnerId};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/:child_id/schedule",
            get(get_schedule).put(sync_schedule).delete(clear_schedule),
        )
        .route("/:child_id/schedule/template", post(apply_template))
        .route("/:child_id/schedule/breakdown", get(get_time_breakdown))
}

pub async fn get_schedule(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(child_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/children/{}/schedule", child_id);

    let ctx = ChildContext::new(owner_id, child_id);
    match state.schedule_service.fetch_schedule(&ctx).await {
        Ok(grid) => (StatusCode::OK, Json(SlotMapper::to_schedule_response(&grid))).into_response(),
        Err(e) => error_response(e),
    }
}

/// Replace the stored week with the submitted one, writing only the difference
pub async fn sync_schedule(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(child_id): Path<String>,
    Json(request): Json<SyncScheduleRequest>,
) -> impl IntoResponse {
    info!("PUT /api/children/{}/schedule - {} slots", child_id, request.slots.len());

    let slots = match SlotMapper::to_domain_list(request.slots) {
        Ok(slots) => slots,
        Err(e) => return error_response(e),
    };

    let ctx = ChildContext::new(owner_id, child_id);
    match state.schedule_service.sync_schedule(&ctx, slots).await {
        Ok(result) => (StatusCode::OK, Json(SlotMapper::to_sync_response(&result))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn clear_schedule(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(child_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/children/{}/schedule", child_id);

    let ctx = ChildContext::new(owner_id, child_id);
    match state.schedule_service.clear_schedule(&ctx).await {
        Ok(result) => (StatusCode::OK, Json(SlotMapper::to_sync_response(&result))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn apply_template(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(child_id): Path<String>,
    Json(request): Json<ApplyTemplateRequest>,
) -> impl IntoResponse {
    info!("POST /api/children/{}/schedule/template - {:?}", child_id, request.grade);

    let ctx = ChildContext::new(owner_id, child_id);
    match state.schedule_service.apply_template(&ctx, request.grade).await {
        Ok(result) => (StatusCode::OK, Json(SlotMapper::to_sync_response(&result))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_time_breakdown(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(child_id): Path<String>,
) -> impl IntoResponse {
    let ctx = ChildContext::new(owner_id, child_id);
    match state.schedule_service.time_breakdown(&ctx).await {
        Ok((total, shares)) => (StatusCode::OK, Json(RewardMapper::to_breakdown_dto(total, shares))).into_response(),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_test_app_state, create_test_child, send, OWNER};
    use axum::http::Method;
    use serde_json::{json, Value};

    fn slot(id: &str, day: u8, time: &str) -> Value {
        json!({
            "id": id,
            "day_index": day,
            "start_time": time,
            "duration_minutes": 30,
            "activity": "Math",
            "type": "study",
            "status": "pending"
        })
    }

    #[tokio::test]
    async fn test_sync_round_trip_and_idempotency() {
        let state = create_test_app_state().await;
        let child_id = create_test_child(&state).await;
        let uri = format!("/api/children/{}/schedule", child_id);
        let week = json!({ "slots": [slot("id1", 2, "09:00"), slot("id2", 2, "09:30")] });

        let (status, body) = send(&state, Method::PUT, &uri, Some(OWNER), Some(week.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"], json!({ "created": 2, "updated": 0, "deleted": 0 }));

        let (_, body) = send(&state, Method::PUT, &uri, Some(OWNER), Some(week)).await;
        assert_eq!(body["summary"], json!({ "created": 0, "updated": 0, "deleted": 0 }));

        let (status, body) = send(&state, Method::GET, &uri, Some(OWNER), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slots"][0]["id"], "id1");
        assert_eq!(body["slots"][0]["type"], "study");
    }

    #[tokio::test]
    async fn test_sync_rejects_bad_slots() {
        let state = create_test_app_state().await;
        let child_id = create_test_child(&state).await;
        let uri = format!("/api/children/{}/schedule", child_id);

        let off_grid = json!({ "slots": [slot("a", 2, "04:00")] });
        let (status, _) = send(&state, Method::PUT, &uri, Some(OWNER), Some(off_grid)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let same_cell = json!({ "slots": [slot("a", 2, "09:00"), slot("b", 2, "09:00")] });
        let (status, _) = send(&state, Method::PUT, &uri, Some(OWNER), Some(same_cell)).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_confirmed_plan_refuses_structural_sync() {
        let state = create_test_app_state().await;
        let child_id = create_test_child(&state).await;
        let uri = format!("/api/children/{}/schedule", child_id);
        send(&state, Method::PUT, &uri, Some(OWNER), Some(json!({ "slots": [slot("a", 2, "09:00")] }))).await;
        send(
            &state,
            Method::PUT,
            &format!("/api/children/{}/plan-state", child_id),
            Some(OWNER),
            Some(json!({ "plan_state": "confirmed" })),
        )
        .await;

        let (status, _) = send(&state, Method::PUT, &uri, Some(OWNER), Some(json!({ "slots": [] }))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let mut done = slot("a", 2, "09:00");
        done["status"] = json!("completed");
        let (status, body) = send(&state, Method::PUT, &uri, Some(OWNER), Some(json!({ "slots": [done] }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["updated"], 1);
    }

    #[tokio::test]
    async fn test_template_then_breakdown_then_clear() {
        let state = create_test_app_state().await;
        let child_id = create_test_child(&state).await;

        let (status, body) = send(
            &state,
            Method::POST,
            &format!("/api/children/{}/schedule/template", child_id),
            Some(OWNER),
            Some(json!({ "grade": "high" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slots"].as_array().unwrap().len(), 7 * 41);

        let (status, body) = send(
            &state,
            Method::GET,
            &format!("/api/children/{}/schedule/breakdown", child_id),
            Some(OWNER),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_minutes"], 7 * 41 * 30);

        let (status, body) = send(
            &state,
            Method::DELETE,
            &format!("/api/children/{}/schedule", child_id),
            Some(OWNER),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["deleted"], 7 * 41);
    }
}
