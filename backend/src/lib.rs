//! # Weekly Planner Backend
//!
//! Schedule reconciliation and reward accounting for a caregiver's weekly
//! planner.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (axum REST API, DTO mappers)
//!     ↓
//! Domain Layer (grid engine, services)
//!     ↓
//! Storage Layer (SQLite repositories)
//! ```
//!
//! The binary loads a [`config::PlannerConfig`], calls [`initialize_backend`]
//! and serves [`create_router`].

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::PlannerConfig;
use crate::domain::{ChildService, RewardService, ScheduleService, SnapshotService, UsageLogService};
use crate::io::rest::{child_apis, reward_apis, schedule_apis, snapshot_apis, usage_log_apis};
use crate::storage::DbConnection;

/// Services shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub child_service: ChildService,
    pub schedule_service: ScheduleService,
    pub reward_service: RewardService,
    pub usage_log_service: UsageLogService,
    pub snapshot_service: SnapshotService,
}

impl AppState {
    pub fn new(db: DbConnection) -> Self {
        Self {
            child_service: ChildService::new(db.clone()),
            schedule_service: ScheduleService::new(db.clone()),
            reward_service: RewardService::new(db.clone()),
            usage_log_service: UsageLogService::new(db.clone()),
            snapshot_service: SnapshotService::new(db),
        }
    }
}

/// Open the database and build every service
pub async fn initialize_backend(config: &PlannerConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db = DbConnection::new(&config.database_url).await?;

    info!("Setting up application state");
    Ok(AppState::new(db))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, allowed_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let children_routes = child_apis::router()
        .merge(schedule_apis::router())
        .merge(reward_apis::router())
        .merge(usage_log_apis::router())
        .merge(snapshot_apis::router());

    Router::new()
        .nest("/api/children", children_routes)
        .layer(cors)
        .with_state(app_state)
}
