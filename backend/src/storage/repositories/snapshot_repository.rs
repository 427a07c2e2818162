use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};

use super::row::{format_timestamp, parse_timestamp};
use crate::domain::models::ScheduleSnapshot;
use crate::storage::connection::DbConnection;
use crate::storage::traits::SnapshotStorage;

/// Repository for saved copies of a child's week. Slots are kept as a JSON
/// array alongside the snapshot row.
#[derive(Clone)]
pub struct SnapshotRepository {
    db: DbConnection,
}

impl SnapshotRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_snapshot(row: &SqliteRow) -> Result<ScheduleSnapshot> {
        let slots_json: &str = row.try_get("slots_json")?;
        Ok(ScheduleSnapshot {
            id: row.try_get("id")?,
            child_id: row.try_get("child_id")?,
            name: row.try_get("name")?,
            date: row.try_get("date")?,
            slots: serde_json::from_str(slots_json).context("Invalid stored snapshot slots")?,
            created_at: parse_timestamp(row.try_get("created_at")?)?,
        })
    }
}

#[async_trait]
impl SnapshotStorage for SnapshotRepository {
    async fn store_snapshot(&self, snapshot: &ScheduleSnapshot) -> Result<()> {
        let slots_json = serde_json::to_string(&snapshot.slots)?;
        sqlx::query(
            r#"
            INSERT INTO schedule_snapshots (id, child_id, name, date, slots_json, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&snapshot.id)
        .bind(&snapshot.child_id)
        .bind(&snapshot.name)
        .bind(&snapshot.date)
        .bind(slots_json)
        .bind(format_timestamp(&snapshot.created_at))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn list_snapshots(&self, child_id: &str) -> Result<Vec<ScheduleSnapshot>> {
        let rows = sqlx::query(
            r#"
            SELECT id, child_id, name, date, slots_json, created_at
            FROM schedule_snapshots
            WHERE child_id = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(child_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_snapshot).collect()
    }

    async fn get_snapshot(&self, child_id: &str, snapshot_id: &str) -> Result<Option<ScheduleSnapshot>> {
        let row = sqlx::query(
            r#"
            SELECT id, child_id, name, date, slots_json, created_at
            FROM schedule_snapshots
            WHERE child_id = ? AND id = ?
            "#,
        )
        .bind(child_id)
        .bind(snapshot_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_snapshot).transpose()
    }

    async fn delete_snapshot(&self, child_id: &str, snapshot_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM schedule_snapshots WHERE child_id = ? AND id = ?")
            .bind(child_id)
            .bind(snapshot_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
