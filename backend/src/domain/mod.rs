//! # Domain Module
//!
//! The planner's rules, independent of storage and transport.
//!
//! The pure engine works on in-memory values only:
//!
//! - **grid**: the half-hour time enumeration, days, cells and `ScheduleGrid`
//! - **selection**: drag tracking and rectangle normalization
//! - **slot_editor**: single-cell and range edits, two-step delete, outcome cycling
//! - **reward_calculator**: accrual, balance and time-by-category folds
//! - **schedule_sync**: the create/update/delete plan between two grids
//! - **templates**: grade defaults and recommended weeks
//!
//! The services wrap the engine around storage. Each takes an explicit
//! `ChildContext` and proves ownership before touching anything.
//! `schedule_session` is the client-facing editing loop built on top.

pub mod child_service;
pub mod commands;
pub mod errors;
pub mod grid;
pub mod models;
pub mod reward_calculator;
pub mod reward_service;
pub mod schedule_service;
pub mod schedule_session;
pub mod schedule_sync;
pub mod selection;
pub mod slot_editor;
pub mod snapshot_service;
pub mod templates;
pub mod usage_log_service;

pub use child_service::ChildService;
pub use errors::{PlannerError, PlannerResult};
pub use reward_service::{RewardReport, RewardService};
pub use schedule_service::ScheduleService;
pub use schedule_session::{ScheduleSession, SyncState};
pub use snapshot_service::SnapshotService;
pub use usage_log_service::UsageLogService;
