//! # REST API for the Usage Ledger

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use shared::AppendUsageLogRequest;
use tracing::info;

use crate::domain::models::ChildContext;
use crate::io::rest::mappers::UsageLogMapper;
use crate::io::rest::{error_response, OwnerId};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UsageLogQuery {
    pub limit: Option<u32>,
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/:child_id/usage-logs",
        get(list_usage_logs).post(append_usage_log).delete(reset_usage_logs),
    )
}

pub async fn list_usage_logs(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(child_id): Path<String>,
    Query(query): Query<UsageLogQuery>,
) -> impl IntoResponse {
    info!("GET /api/children/{}/usage-logs - {:?}", child_id, query);

    let ctx = ChildContext::new(owner_id, child_id);
    match state.usage_log_service.list_usage(&ctx, query.limit).await {
        Ok(entries) => (StatusCode::OK, Json(UsageLogMapper::to_list_dto(entries))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn append_usage_log(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(child_id): Path<String>,
    Json(request): Json<AppendUsageLogRequest>,
) -> impl IntoResponse {
    info!("POST /api/children/{}/usage-logs - {:?}", child_id, request);

    let ctx = ChildContext::new(owner_id, child_id);
    match state
        .usage_log_service
        .append_usage(&ctx, request.amount, request.reason)
        .await
    {
        Ok(entry) => (StatusCode::CREATED, Json(UsageLogMapper::to_dto(entry))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn reset_usage_logs(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(child_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/children/{}/usage-logs", child_id);

    let ctx = ChildContext::new(owner_id, child_id);
    match state.usage_log_service.reset_usage(&ctx).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}
