use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::domain::child_service::ChildService;
use crate::domain::errors::{PlannerError, PlannerResult};
use crate::domain::models::{ChildContext, UsageLogEntry};
use crate::storage::{DbConnection, UsageLogRepository, UsageLogStorage};

/// Service for the ledger of spent points
#[derive(Clone)]
pub struct UsageLogService {
    child_service: ChildService,
    usage_logs: Arc<dyn UsageLogStorage>,
}

impl UsageLogService {
    pub const MAX_REASON_LENGTH: usize = 100;

    pub fn new(db: DbConnection) -> Self {
        Self {
            child_service: ChildService::new(db.clone()),
            usage_logs: Arc::new(UsageLogRepository::new(db)),
        }
    }

    /// Record a spend. The balance is allowed to go negative.
    pub async fn append_usage(
        &self,
        ctx: &ChildContext,
        amount: i64,
        reason: Option<String>,
    ) -> PlannerResult<UsageLogEntry> {
        self.child_service.authorize(ctx).await?;

        if amount <= 0 || amount > UsageLogEntry::MAX_AMOUNT {
            return Err(PlannerError::validation(format!(
                "Usage amount must be between 1 and {}",
                UsageLogEntry::MAX_AMOUNT
            )));
        }
        let reason = reason.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());
        if let Some(reason) = &reason {
            if reason.chars().count() > Self::MAX_REASON_LENGTH {
                return Err(PlannerError::validation(format!(
                    "Reason cannot exceed {} characters",
                    Self::MAX_REASON_LENGTH
                )));
            }
        }

        let now = Utc::now();
        let entry = UsageLogEntry {
            id: UsageLogEntry::generate_id(&ctx.child_id, now.timestamp_millis()),
            child_id: ctx.child_id.clone(),
            amount,
            timestamp: now,
            reason,
        };
        self.usage_logs.append_entry(&entry).await?;

        info!("Child {} used {} points", ctx.child_id, amount);
        Ok(entry)
    }

    /// Ledger entries, newest first
    pub async fn list_usage(&self, ctx: &ChildContext, limit: Option<u32>) -> PlannerResult<Vec<UsageLogEntry>> {
        self.child_service.authorize(ctx).await?;
        Ok(self.usage_logs.list_entries(&ctx.child_id, limit).await?)
    }

    /// Wipe the ledger; returns how many entries were removed
    pub async fn reset_usage(&self, ctx: &ChildContext) -> PlannerResult<u64> {
        self.child_service.authorize(ctx).await?;
        let removed = self.usage_logs.delete_entries(&ctx.child_id).await?;
        info!("Reset usage ledger of child {} ({} entries)", ctx.child_id, removed);
        Ok(removed)
    }
}
