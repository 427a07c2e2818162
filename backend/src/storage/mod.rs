//! # Storage Module
//!
//! SQLite persistence for child profiles, slots, reward tables, the usage
//! ledger and schedule snapshots.
//!
//! The domain layer only sees the traits in [`traits`]; the repositories in
//! [`repositories`] implement them on top of a shared [`DbConnection`].

pub mod connection;
pub mod repositories;
pub mod traits;

pub use connection::DbConnection;
pub use repositories::{
    ChildRepository, RewardConfigRepository, ScheduleRepository, SnapshotRepository,
    UsageLogRepository,
};
pub use traits::{
    ChildStorage, RewardConfigStorage, ScheduleStorage, SnapshotStorage, StaleSchedule, UsageLogStorage,
};
