use anyhow::Result;
use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};

use super::row::{format_timestamp, parse_timestamp};
use crate::domain::models::UsageLogEntry;
use crate::storage::connection::DbConnection;
use crate::storage::traits::UsageLogStorage;

/// Repository for the append-only points usage ledger
#[derive(Clone)]
pub struct UsageLogRepository {
    db: DbConnection,
}

impl UsageLogRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_entry(row: &SqliteRow) -> Result<UsageLogEntry> {
        Ok(UsageLogEntry {
            id: row.try_get("id")?,
            child_id: row.try_get("child_id")?,
            amount: row.try_get("amount")?,
            timestamp: parse_timestamp(row.try_get("timestamp")?)?,
            reason: row.try_get("reason")?,
        })
    }
}

#[async_trait]
impl UsageLogStorage for UsageLogRepository {
    async fn append_entry(&self, entry: &UsageLogEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO usage_logs (id, child_id, amount, timestamp, reason)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.child_id)
        .bind(entry.amount)
        .bind(format_timestamp(&entry.timestamp))
        .bind(&entry.reason)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn list_entries(&self, child_id: &str, limit: Option<u32>) -> Result<Vec<UsageLogEntry>> {
        // SQLite treats a negative LIMIT as "no limit"
        let limit = limit.map(i64::from).unwrap_or(-1);
        let rows = sqlx::query(
            r#"
            SELECT id, child_id, amount, timestamp, reason
            FROM usage_logs
            WHERE child_id = ?
            ORDER BY timestamp DESC, rowid DESC
            LIMIT ?
            "#,
        )
        .bind(child_id)
        .bind(limit)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    async fn delete_entries(&self, child_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM usage_logs WHERE child_id = ?")
            .bind(child_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected())
    }
}
