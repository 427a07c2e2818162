use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row};

use super::row::{format_timestamp, parse_column};
use crate::domain::models::{RewardConfig, RewardWeights};
use crate::storage::connection::DbConnection;
use crate::storage::traits::RewardConfigStorage;

/// Repository for per-child reward tables
#[derive(Clone)]
pub struct RewardConfigRepository {
    db: DbConnection,
}

impl RewardConfigRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn weight(row: &SqliteRow, column: &str) -> Result<u32> {
        Ok(u32::try_from(row.try_get::<i64, _>(column)?)?)
    }

    fn row_to_config(row: &SqliteRow) -> Result<RewardConfig> {
        Ok(RewardConfig {
            mode: parse_column(row.try_get("mode")?, "mode")?,
            unit: row.try_get("unit")?,
            weights: RewardWeights {
                study: Self::weight(row, "study")?,
                academy: Self::weight(row, "academy")?,
                school: Self::weight(row, "school")?,
                routine: Self::weight(row, "routine")?,
                rest: Self::weight(row, "rest")?,
                sleep: Self::weight(row, "sleep")?,
            },
        })
    }
}

#[async_trait]
impl RewardConfigStorage for RewardConfigRepository {
    async fn get_reward_config(&self, child_id: &str) -> Result<Option<RewardConfig>> {
        let row = sqlx::query(
            r#"
            SELECT mode, unit, study, academy, school, routine, rest, sleep
            FROM reward_configs
            WHERE child_id = ?
            "#,
        )
        .bind(child_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_config).transpose()
    }

    async fn store_reward_config(&self, child_id: &str, config: &RewardConfig) -> Result<()> {
        let weights = &config.weights;
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO reward_configs (child_id, mode, unit, study, academy, school, routine, rest, sleep, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(child_id)
        .bind(config.mode.as_str())
        .bind(&config.unit)
        .bind(i64::from(weights.study))
        .bind(i64::from(weights.academy))
        .bind(i64::from(weights.school))
        .bind(i64::from(weights.routine))
        .bind(i64::from(weights.rest))
        .bind(i64::from(weights.sleep))
        .bind(format_timestamp(&Utc::now()))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }
}
