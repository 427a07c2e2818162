use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::domain::child_service::ChildService;
use crate::domain::commands::schedule::SyncResult;
use crate::domain::commands::snapshot::CreateSnapshotCommand;
use crate::domain::errors::{PlannerError, PlannerResult};
use crate::domain::models::{ChildContext, ScheduleSnapshot};
use crate::domain::schedule_service::ScheduleService;
use crate::storage::{DbConnection, SnapshotRepository, SnapshotStorage};

/// Service for named copies of a week that can be restored later
#[derive(Clone)]
pub struct SnapshotService {
    child_service: ChildService,
    schedule_service: ScheduleService,
    snapshots: Arc<dyn SnapshotStorage>,
}

impl SnapshotService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            child_service: ChildService::new(db.clone()),
            schedule_service: ScheduleService::new(db.clone()),
            snapshots: Arc::new(SnapshotRepository::new(db)),
        }
    }

    /// Copy the stored week under a name
    pub async fn create_snapshot(
        &self,
        ctx: &ChildContext,
        command: CreateSnapshotCommand,
    ) -> PlannerResult<ScheduleSnapshot> {
        self.child_service.authorize(ctx).await?;

        let name = command.name.trim();
        if name.is_empty() {
            return Err(PlannerError::validation("Snapshot name cannot be empty"));
        }
        if name.chars().count() > ScheduleSnapshot::MAX_NAME_LENGTH {
            return Err(PlannerError::validation(format!(
                "Snapshot name cannot exceed {} characters",
                ScheduleSnapshot::MAX_NAME_LENGTH
            )));
        }

        let grid = self.schedule_service.fetch_schedule(ctx).await?;
        let now = Utc::now();
        let date = command
            .date
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| now.format("%Y-%m-%d").to_string());

        let snapshot = ScheduleSnapshot {
            id: ScheduleSnapshot::generate_id(&ctx.child_id, now.timestamp_millis()),
            child_id: ctx.child_id.clone(),
            name: name.to_string(),
            date,
            slots: grid.to_vec(),
            created_at: now,
        };
        self.snapshots.store_snapshot(&snapshot).await?;

        info!("Saved snapshot {} of child {} ({} slots)", snapshot.id, ctx.child_id, snapshot.slots.len());
        Ok(snapshot)
    }

    /// Snapshots, newest first
    pub async fn list_snapshots(&self, ctx: &ChildContext) -> PlannerResult<Vec<ScheduleSnapshot>> {
        self.child_service.authorize(ctx).await?;
        Ok(self.snapshots.list_snapshots(&ctx.child_id).await?)
    }

    pub async fn delete_snapshot(&self, ctx: &ChildContext, snapshot_id: &str) -> PlannerResult<()> {
        self.child_service.authorize(ctx).await?;
        if !self.snapshots.delete_snapshot(&ctx.child_id, snapshot_id).await? {
            return Err(PlannerError::NotFound(format!("Snapshot {}", snapshot_id)));
        }
        info!("Deleted snapshot {} of child {}", snapshot_id, ctx.child_id);
        Ok(())
    }

    /// Make the snapshot's slots the current week, through the regular sync
    pub async fn restore_snapshot(&self, ctx: &ChildContext, snapshot_id: &str) -> PlannerResult<SyncResult> {
        self.child_service.authorize(ctx).await?;
        let snapshot = self
            .snapshots
            .get_snapshot(&ctx.child_id, snapshot_id)
            .await?
            .ok_or_else(|| PlannerError::NotFound(format!("Snapshot {}", snapshot_id)))?;

        info!("Restoring snapshot {} into child {}", snapshot.id, ctx.child_id);
        self.schedule_service.sync_schedule(ctx, snapshot.slots).await
    }
}
