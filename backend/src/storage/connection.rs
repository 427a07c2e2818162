use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;
use tracing::info;

/// DbConnection owns the SQLite pool and the planner schema
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url` and ensure the schema
    pub async fn new(url: &str) -> Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            info!("Creating database at {}", url);
            Sqlite::create_database(url).await?
        }

        let pool = SqlitePool::connect(url).await?;
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Private in-memory database for one test
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS children (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                name TEXT NOT NULL,
                color TEXT NOT NULL,
                grade TEXT NOT NULL,
                start_time TEXT,
                end_time TEXT,
                plan_state TEXT NOT NULL DEFAULT 'drafting',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_children_owner_id
            ON children(owner_id);
            "#,
        )
        .execute(pool)
        .await?;

        // One slot per (child, day, time); slot IDs only need to be unique per child
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS time_slots (
                child_id TEXT NOT NULL,
                id TEXT NOT NULL,
                day_index INTEGER NOT NULL CHECK (day_index >= 0 AND day_index <= 6),
                start_time TEXT NOT NULL,
                duration_minutes INTEGER NOT NULL,
                activity TEXT NOT NULL,
                activity_type TEXT NOT NULL,
                status TEXT NOT NULL,
                PRIMARY KEY (child_id, id),
                UNIQUE (child_id, day_index, start_time),
                FOREIGN KEY (child_id) REFERENCES children (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS reward_configs (
                child_id TEXT PRIMARY KEY,
                mode TEXT NOT NULL,
                unit TEXT NOT NULL,
                study INTEGER NOT NULL DEFAULT 0,
                academy INTEGER NOT NULL DEFAULT 0,
                school INTEGER NOT NULL DEFAULT 0,
                routine INTEGER NOT NULL DEFAULT 0,
                rest INTEGER NOT NULL DEFAULT 0,
                sleep INTEGER NOT NULL DEFAULT 0,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (child_id) REFERENCES children (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS usage_logs (
                id TEXT PRIMARY KEY,
                child_id TEXT NOT NULL,
                amount INTEGER NOT NULL CHECK (amount > 0),
                timestamp TEXT NOT NULL,
                reason TEXT,
                FOREIGN KEY (child_id) REFERENCES children (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_usage_logs_child_timestamp
            ON usage_logs(child_id, timestamp DESC);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS schedule_snapshots (
                id TEXT PRIMARY KEY,
                child_id TEXT NOT NULL,
                name TEXT NOT NULL,
                date TEXT NOT NULL,
                slots_json TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (child_id) REFERENCES children (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}
