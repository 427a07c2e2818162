//! # REST API for Child Profiles
//!
//! Create, list, read, update and delete children, toggle the plan between
//! drafting and confirmed, and read the visible grid hours.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use shared::{CreateChildRequest, SetPlanStateRequest, UpdateChildRequest};
use tracing::info;

use crate::domain::models::ChildContext;
use crate::io::rest::mappers::ChildMapper;
use crate::io::rest::{error_response, OwnerId};
use crate::AppState;

/// Routes relative to `/api/children`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_children).post(create_child))
        .route("/:child_id", get(get_child).put(update_child).delete(delete_child))
        .route("/:child_id/plan-state", put(set_plan_state))
        .route("/:child_id/time-range", get(get_time_range))
}

pub async fn create_child(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Json(request): Json<CreateChildRequest>,
) -> impl IntoResponse {
    info!("POST /api/children - request: {:?}", request);

    let command = ChildMapper::to_create_command(request);
    match state.child_service.create_child(&owner_id, command).await {
        Ok(child) => {
            let message = format!("Created {}", child.name);
            (StatusCode::CREATED, Json(ChildMapper::to_child_response(child, message))).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn list_children(State(state): State<AppState>, OwnerId(owner_id): OwnerId) -> impl IntoResponse {
    info!("GET /api/children");

    match state.child_service.list_children(&owner_id).await {
        Ok(children) => (StatusCode::OK, Json(ChildMapper::to_child_list_dto(children))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_child(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(child_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/children/{}", child_id);

    let ctx = ChildContext::new(owner_id, child_id);
    match state.child_service.get_child(&ctx).await {
        Ok(child) => (StatusCode::OK, Json(ChildMapper::to_dto(child))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn update_child(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(child_id): Path<String>,
    Json(request): Json<UpdateChildRequest>,
) -> impl IntoResponse {
    info!("PUT /api/children/{} - request: {:?}", child_id, request);

    let ctx = ChildContext::new(owner_id, child_id);
    match state
        .child_service
        .update_child(&ctx, ChildMapper::to_update_command(request))
        .await
    {
        Ok(child) => {
            let message = format!("Updated {}", child.name);
            (StatusCode::OK, Json(ChildMapper::to_child_response(child, message))).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn delete_child(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(child_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/children/{}", child_id);

    let ctx = ChildContext::new(owner_id, child_id);
    match state.child_service.delete_child(&ctx).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn set_plan_state(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(child_id): Path<String>,
    Json(request): Json<SetPlanStateRequest>,
) -> impl IntoResponse {
    info!("PUT /api/children/{}/plan-state - {:?}", child_id, request.plan_state);

    let ctx = ChildContext::new(owner_id, child_id);
    match state.child_service.set_plan_state(&ctx, request.plan_state).await {
        Ok(child) => {
            let message = format!("Plan is now {}", child.plan_state.as_str());
            (StatusCode::OK, Json(ChildMapper::to_child_response(child, message))).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn get_time_range(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(child_id): Path<String>,
) -> impl IntoResponse {
    let ctx = ChildContext::new(owner_id, child_id);
    match state.child_service.visible_time_range(&ctx).await {
        Ok(range) => (StatusCode::OK, Json(ChildMapper::to_time_range_dto(&range))).into_response(),
        Err(e) => error_response(e),
    }
}
