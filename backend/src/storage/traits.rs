//! # Storage Traits
//!
//! Abstractions the domain services depend on. The SQLite repositories are
//! the production implementations; tests swap in fakes where a failure has
//! to be provoked.
//!
//! Every method that takes a `child_id` only ever sees rows of that child.
//! Ownership checks happen in the domain layer before these are called.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::{ChildProfile, RewardConfig, ScheduleSnapshot, Slot, UsageLogEntry};
use crate::domain::schedule_sync::SyncPlan;

#[async_trait]
pub trait ChildStorage: Send + Sync {
    async fn store_child(&self, child: &ChildProfile) -> Result<()>;

    async fn get_child(&self, child_id: &str) -> Result<Option<ChildProfile>>;

    /// Children of one owner, oldest first
    async fn list_children(&self, owner_id: &str) -> Result<Vec<ChildProfile>>;

    async fn update_child(&self, child: &ChildProfile) -> Result<()>;

    /// Delete a child and everything stored for it.
    /// Returns false if no such child existed.
    async fn delete_child(&self, child_id: &str) -> Result<bool>;
}

#[async_trait]
pub trait ScheduleStorage: Send + Sync {
    /// All slots of a child, ordered by day then time
    async fn list_slots(&self, child_id: &str) -> Result<Vec<Slot>>;

    /// Apply every change of the plan in one transaction.
    ///
    /// Either all of it becomes visible or none of it does. The plan was
    /// diffed against `expected`; if the stored slots differ from it by the
    /// time the write lock is held, nothing is written and the error is a
    /// [`StaleSchedule`].
    async fn apply_sync_plan(&self, child_id: &str, expected: &[Slot], plan: &SyncPlan) -> Result<()>;
}

/// Another sync changed the week between reading it and writing the plan
#[derive(Debug, thiserror::Error)]
#[error("schedule of child {0} changed during sync")]
pub struct StaleSchedule(pub String);

#[async_trait]
pub trait RewardConfigStorage: Send + Sync {
    async fn get_reward_config(&self, child_id: &str) -> Result<Option<RewardConfig>>;

    /// Insert or replace the child's reward table
    async fn store_reward_config(&self, child_id: &str, config: &RewardConfig) -> Result<()>;
}

#[async_trait]
pub trait UsageLogStorage: Send + Sync {
    async fn append_entry(&self, entry: &UsageLogEntry) -> Result<()>;

    /// Entries newest first, optionally capped
    async fn list_entries(&self, child_id: &str, limit: Option<u32>) -> Result<Vec<UsageLogEntry>>;

    /// Wipe the child's ledger, returning how many entries went
    async fn delete_entries(&self, child_id: &str) -> Result<u64>;
}

#[async_trait]
pub trait SnapshotStorage: Send + Sync {
    async fn store_snapshot(&self, snapshot: &ScheduleSnapshot) -> Result<()>;

    /// Snapshots of a child, newest first
    async fn list_snapshots(&self, child_id: &str) -> Result<Vec<ScheduleSnapshot>>;

    async fn get_snapshot(&self, child_id: &str, snapshot_id: &str) -> Result<Option<ScheduleSnapshot>>;

    async fn delete_snapshot(&self, child_id: &str, snapshot_id: &str) -> Result<bool>;
}
