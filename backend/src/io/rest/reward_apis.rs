//! # REST API for Rewards
//!
//! The per-child reward table and the balance derived from it.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::RewardConfig;
use tracing::info;

use crate::domain::models::ChildContext;
use crate::io::rest::mappers::RewardMapper;
use crate::io::rest::{error_response, OwnerId};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:child_id/rewards/config", get(get_reward_config).put(update_reward_config))
        .route("/:child_id/rewards/balance", get(get_balance))
}

pub async fn get_reward_config(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(child_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/children/{}/rewards/config", child_id);

    let ctx = ChildContext::new(owner_id, child_id);
    match state.reward_service.get_reward_config(&ctx).await {
        Ok(config) => (StatusCode::OK, Json(RewardMapper::to_dto(config))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn update_reward_config(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(child_id): Path<String>,
    Json(request): Json<RewardConfig>,
) -> impl IntoResponse {
    info!("PUT /api/children/{}/rewards/config - {:?}", child_id, request);

    let ctx = ChildContext::new(owner_id, child_id);
    match state
        .reward_service
        .update_reward_config(&ctx, RewardMapper::to_domain(request))
        .await
    {
        Ok(config) => (StatusCode::OK, Json(RewardMapper::to_dto(config))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_balance(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(child_id): Path<String>,
) -> impl IntoResponse {
    let ctx = ChildContext::new(owner_id, child_id);
    match state.reward_service.balance(&ctx).await {
        Ok(report) => (StatusCode::OK, Json(RewardMapper::to_balance_dto(report))).into_response(),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_test_app_state, create_test_child, send, OWNER};
    use axum::http::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_default_table_and_partial_update() {
        let state = create_test_app_state().await;
        let child_id = create_test_child(&state).await;
        let uri = format!("/api/children/{}/rewards/config", child_id);

        let (status, body) = send(&state, Method::GET, &uri, Some(OWNER), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "time");
        assert_eq!(body["study"], 20);

        // Weights left out of the body count as zero
        let (status, body) = send(
            &state,
            Method::PUT,
            &uri,
            Some(OWNER),
            Some(json!({ "mode": "currency", "unit": "won", "study": 100 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["study"], 100);
        assert_eq!(body["academy"], 0);
    }

    #[tokio::test]
    async fn test_balance_is_formatted_by_mode() {
        let state = create_test_app_state().await;
        let child_id = create_test_child(&state).await;

        send(
            &state,
            Method::POST,
            &format!("/api/children/{}/usage-logs", child_id),
            Some(OWNER),
            Some(json!({ "amount": 90, "reason": "Game" })),
        )
        .await;

        let (status, body) = send(
            &state,
            Method::GET,
            &format!("/api/children/{}/rewards/balance", child_id),
            Some(OWNER),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["earned_points"], 0);
        assert_eq!(body["used_points"], 90);
        assert_eq!(body["current_balance"], -90);
        assert_eq!(body["formatted_used"], "1h 30m");
        assert_eq!(body["formatted_balance"], "-1h 30m");
    }

    #[tokio::test]
    async fn test_extreme_weights_and_amounts_keep_balance_exact() {
        let state = create_test_app_state().await;
        let child_id = create_test_child(&state).await;
        let base = format!("/api/children/{}", child_id);

        send(
            &state,
            Method::PUT,
            &format!("{}/rewards/config", base),
            Some(OWNER),
            Some(json!({ "mode": "time", "unit": "points", "study": u32::MAX })),
        )
        .await;

        let mut slot = json!({
            "id": "marathon", "day_index": 2, "start_time": "09:00", "duration_minutes": u32::MAX,
            "activity": "Math", "type": "study", "status": "completed"
        });
        let (status, _) = send(&state, Method::PUT, &format!("{}/schedule", base), Some(OWNER), Some(json!({ "slots": [slot.clone()] }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        slot["duration_minutes"] = json!(24 * 60);
        let (status, _) = send(&state, Method::PUT, &format!("{}/schedule", base), Some(OWNER), Some(json!({ "slots": [slot] }))).await;
        assert_eq!(status, StatusCode::OK);

        let usage_uri = format!("{}/usage-logs", base);
        let (status, _) = send(&state, Method::POST, &usage_uri, Some(OWNER), Some(json!({ "amount": i64::MAX }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send(&state, Method::POST, &usage_uri, Some(OWNER), Some(json!({ "amount": 1_000_000_000 }))).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&state, Method::GET, &format!("{}/rewards/balance", base), Some(OWNER), None).await;
        assert_eq!(status, StatusCode::OK);
        let earned = i64::from(u32::MAX) * 48;
        assert_eq!(body["earned_points"], earned);
        assert_eq!(body["used_points"], 1_000_000_000i64);
        assert_eq!(body["current_balance"], earned - 1_000_000_000);
    }
}
