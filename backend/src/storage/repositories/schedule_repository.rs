use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row, Sqlite};
use tracing::debug;

use super::row::parse_column;
use crate::domain::grid::TimeMark;
use crate::domain::models::Slot;
use crate::domain::schedule_sync::SyncPlan;
use crate::storage::connection::DbConnection;
use crate::storage::traits::{ScheduleStorage, StaleSchedule};

/// Repository for the slots of each child's week
#[derive(Clone)]
pub struct ScheduleRepository {
    db: DbConnection,
}

impl ScheduleRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_slot(row: &SqliteRow) -> Result<Slot> {
        let start_time: &str = row.try_get("start_time")?;
        Ok(Slot {
            id: row.try_get("id")?,
            day_index: u8::try_from(row.try_get::<i64, _>("day_index")?)?,
            start_time: TimeMark::parse(start_time)
                .with_context(|| format!("Invalid stored time mark: {}", start_time))?,
            duration_minutes: u32::try_from(row.try_get::<i64, _>("duration_minutes")?)?,
            activity: row.try_get("activity")?,
            activity_type: parse_column(row.try_get("activity_type")?, "activity_type")?,
            status: parse_column(row.try_get("status")?, "status")?,
        })
    }

    async fn fetch_slots<'e, E>(executor: E, child_id: &str) -> Result<Vec<Slot>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query(
            r#"
            SELECT id, day_index, start_time, duration_minutes, activity, activity_type, status
            FROM time_slots
            WHERE child_id = ?
            "#,
        )
        .bind(child_id)
        .fetch_all(executor)
        .await?;

        // Marks past midnight sort after the evening, which text ordering gets wrong
        let mut slots = rows.iter().map(Self::row_to_slot).collect::<Result<Vec<_>>>()?;
        slots.sort_by_key(Slot::cell);
        Ok(slots)
    }
}

#[async_trait]
impl ScheduleStorage for ScheduleRepository {
    async fn list_slots(&self, child_id: &str) -> Result<Vec<Slot>> {
        Self::fetch_slots(self.db.pool(), child_id).await
    }

    async fn apply_sync_plan(&self, child_id: &str, expected: &[Slot], plan: &SyncPlan) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;

        // Writing first takes the database write lock, so the read below sees
        // every sync that committed before this one and none that start after.
        sqlx::query("UPDATE children SET updated_at = updated_at WHERE id = ?")
            .bind(child_id)
            .execute(&mut *tx)
            .await?;

        let mut expected = expected.to_vec();
        expected.sort_by_key(Slot::cell);
        if Self::fetch_slots(&mut *tx, child_id).await? != expected {
            debug!("Stored slots of child {} moved since the plan was made", child_id);
            return Err(StaleSchedule(child_id.to_string()).into());
        }

        for slot_id in &plan.deletes {
            sqlx::query("DELETE FROM time_slots WHERE child_id = ? AND id = ?")
                .bind(child_id)
                .bind(slot_id)
                .execute(&mut *tx)
                .await?;
        }

        // Park updated rows on a cell no real mark can occupy, so two slots
        // trading places never collide on the unique (day, time) index.
        for slot in &plan.updates {
            sqlx::query("UPDATE time_slots SET start_time = '~' || id WHERE child_id = ? AND id = ?")
                .bind(child_id)
                .bind(&slot.id)
                .execute(&mut *tx)
                .await?;
        }

        for slot in &plan.updates {
            let result = sqlx::query(
                r#"
                UPDATE time_slots
                SET day_index = ?, start_time = ?, duration_minutes = ?, activity = ?, activity_type = ?, status = ?
                WHERE child_id = ? AND id = ?
                "#,
            )
            .bind(i64::from(slot.day_index))
            .bind(slot.start_time.as_str())
            .bind(i64::from(slot.duration_minutes))
            .bind(&slot.activity)
            .bind(slot.activity_type.as_str())
            .bind(slot.status.as_str())
            .bind(child_id)
            .bind(&slot.id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                anyhow::bail!("Slot {} vanished while syncing child {}", slot.id, child_id);
            }
        }

        for slot in &plan.creates {
            sqlx::query(
                r#"
                INSERT INTO time_slots (child_id, id, day_index, start_time, duration_minutes, activity, activity_type, status)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(child_id)
            .bind(&slot.id)
            .bind(i64::from(slot.day_index))
            .bind(slot.start_time.as_str())
            .bind(i64::from(slot.duration_minutes))
            .bind(&slot.activity)
            .bind(slot.activity_type.as_str())
            .bind(slot.status.as_str())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(
            "Applied sync for child {}: {} created, {} updated, {} deleted",
            child_id,
            plan.creates.len(),
            plan.updates.len(),
            plan.deletes.len()
        );
        Ok(())
    }
}
