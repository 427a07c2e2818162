//! # REST API for Schedule Snapshots

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use shared::CreateSnapshotRequest;
use tracing::info;

use crate::domain::models::ChildContext;
use crate::io::rest::mappers::{SlotMapper, SnapshotMapper};
use crate::io::rest::{error_response, OwnerId};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:child_id/snapshots", get(list_snapshots).post(create_snapshot))
        .route("/:child_id/snapshots/:snapshot_id", delete(delete_snapshot))
        .route("/:child_id/snapshots/:snapshot_id/restore", post(restore_snapshot))
}

pub async fn create_snapshot(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(child_id): Path<String>,
    Json(request): Json<CreateSnapshotRequest>,
) -> impl IntoResponse {
    info!("POST /api/children/{}/snapshots - {:?}", child_id, request);

    let ctx = ChildContext::new(owner_id, child_id);
    match state
        .snapshot_service
        .create_snapshot(&ctx, SnapshotMapper::to_create_command(request))
        .await
    {
        Ok(snapshot) => (StatusCode::CREATED, Json(SnapshotMapper::to_dto(snapshot))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn list_snapshots(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(child_id): Path<String>,
) -> impl IntoResponse {
    let ctx = ChildContext::new(owner_id, child_id);
    match state.snapshot_service.list_snapshots(&ctx).await {
        Ok(snapshots) => (StatusCode::OK, Json(SnapshotMapper::to_list_dto(snapshots))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete_snapshot(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path((child_id, snapshot_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/children/{}/snapshots/{}", child_id, snapshot_id);

    let ctx = ChildContext::new(owner_id, child_id);
    match state.snapshot_service.delete_snapshot(&ctx, &snapshot_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn restore_snapshot(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path((child_id, snapshot_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("POST /api/children/{}/snapshots/{}/restore", child_id, snapshot_id);

    let ctx = ChildContext::new(owner_id, child_id);
    match state.snapshot_service.restore_snapshot(&ctx, &snapshot_id).await {
        Ok(result) => (StatusCode::OK, Json(SlotMapper::to_sync_response(&result))).into_response(),
        Err(e) => error_response(e),
    }
}
