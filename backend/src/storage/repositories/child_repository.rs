use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};

use super::row::{format_timestamp, parse_column, parse_timestamp};
use crate::domain::grid::TimeMark;
use crate::domain::models::ChildProfile;
use crate::storage::connection::DbConnection;
use crate::storage::traits::ChildStorage;

/// Repository for child profiles
#[derive(Clone)]
pub struct ChildRepository {
    db: DbConnection,
}

impl ChildRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn parse_mark(value: Option<String>) -> Result<Option<TimeMark>> {
        value
            .map(|text| {
                TimeMark::parse(&text).with_context(|| format!("Invalid stored time mark: {}", text))
            })
            .transpose()
    }

    fn row_to_child(row: &SqliteRow) -> Result<ChildProfile> {
        Ok(ChildProfile {
            id: row.try_get("id")?,
            owner_id: row.try_get("owner_id")?,
            name: row.try_get("name")?,
            color: row.try_get("color")?,
            grade: parse_column(row.try_get("grade")?, "grade")?,
            start_time: Self::parse_mark(row.try_get("start_time")?)?,
            end_time: Self::parse_mark(row.try_get("end_time")?)?,
            plan_state: parse_column(row.try_get("plan_state")?, "plan_state")?,
            created_at: parse_timestamp(row.try_get("created_at")?)?,
            updated_at: parse_timestamp(row.try_get("updated_at")?)?,
        })
    }
}

#[async_trait]
impl ChildStorage for ChildRepository {
    async fn store_child(&self, child: &ChildProfile) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO children (id, owner_id, name, color, grade, start_time, end_time, plan_state, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&child.id)
        .bind(&child.owner_id)
        .bind(&child.name)
        .bind(&child.color)
        .bind(child.grade.as_str())
        .bind(child.start_time.map(TimeMark::as_str))
        .bind(child.end_time.map(TimeMark::as_str))
        .bind(child.plan_state.as_str())
        .bind(format_timestamp(&child.created_at))
        .bind(format_timestamp(&child.updated_at))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_child(&self, child_id: &str) -> Result<Option<ChildProfile>> {
        let row = sqlx::query(
            r#"
            SELECT id, owner_id, name, color, grade, start_time, end_time, plan_state, created_at, updated_at
            FROM children
            WHERE id = ?
            "#,
        )
        .bind(child_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_child).transpose()
    }

    async fn list_children(&self, owner_id: &str) -> Result<Vec<ChildProfile>> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner_id, name, color, grade, start_time, end_time, plan_state, created_at, updated_at
            FROM children
            WHERE owner_id = ?
            ORDER BY created_at ASC, rowid ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_child).collect()
    }

    async fn update_child(&self, child: &ChildProfile) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE children
            SET name = ?, color = ?, grade = ?, start_time = ?, end_time = ?, plan_state = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&child.name)
        .bind(&child.color)
        .bind(child.grade.as_str())
        .bind(child.start_time.map(TimeMark::as_str))
        .bind(child.end_time.map(TimeMark::as_str))
        .bind(child.plan_state.as_str())
        .bind(format_timestamp(&child.updated_at))
        .bind(&child.id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            anyhow::bail!("Child not found: {}", child.id);
        }
        Ok(())
    }

    async fn delete_child(&self, child_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM children WHERE id = ?")
            .bind(child_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
