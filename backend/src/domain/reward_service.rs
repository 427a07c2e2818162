use std::sync::Arc;
use tracing::info;

use crate::domain::child_service::ChildService;
use crate::domain::errors::{PlannerError, PlannerResult};
use crate::domain::grid::ScheduleGrid;
use crate::domain::models::{ChildContext, RewardConfig};
use crate::domain::reward_calculator::{earned_points, used_points, RewardBalance};
use crate::storage::{
    DbConnection, RewardConfigRepository, RewardConfigStorage, ScheduleRepository, ScheduleStorage,
    UsageLogRepository, UsageLogStorage,
};

/// Balance together with the table it was computed under
#[derive(Debug, Clone, PartialEq)]
pub struct RewardReport {
    pub balance: RewardBalance,
    pub config: RewardConfig,
}

/// Service for the reward table and the derived balance
#[derive(Clone)]
pub struct RewardService {
    child_service: ChildService,
    reward_configs: Arc<dyn RewardConfigStorage>,
    schedules: Arc<dyn ScheduleStorage>,
    usage_logs: Arc<dyn UsageLogStorage>,
}

impl RewardService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            child_service: ChildService::new(db.clone()),
            reward_configs: Arc::new(RewardConfigRepository::new(db.clone())),
            schedules: Arc::new(ScheduleRepository::new(db.clone())),
            usage_logs: Arc::new(UsageLogRepository::new(db)),
        }
    }

    /// The child's table, or the default table if none was ever saved
    pub async fn get_reward_config(&self, ctx: &ChildContext) -> PlannerResult<RewardConfig> {
        self.child_service.authorize(ctx).await?;
        self.load_config(&ctx.child_id).await
    }

    pub async fn update_reward_config(&self, ctx: &ChildContext, config: RewardConfig) -> PlannerResult<RewardConfig> {
        self.child_service.authorize(ctx).await?;

        let unit = config.unit.trim();
        if unit.is_empty() {
            return Err(PlannerError::validation("Reward unit cannot be empty"));
        }
        if unit.chars().count() > RewardConfig::MAX_UNIT_LENGTH {
            return Err(PlannerError::validation(format!(
                "Reward unit cannot exceed {} characters",
                RewardConfig::MAX_UNIT_LENGTH
            )));
        }

        let config = RewardConfig {
            unit: unit.to_string(),
            ..config
        };
        self.reward_configs.store_reward_config(&ctx.child_id, &config).await?;
        info!("Updated reward table of child {}: {:?}", ctx.child_id, config);
        Ok(config)
    }

    /// Recompute earned, used and current points from scratch
    pub async fn balance(&self, ctx: &ChildContext) -> PlannerResult<RewardReport> {
        self.child_service.authorize(ctx).await?;

        let config = self.load_config(&ctx.child_id).await?;
        let grid = ScheduleGrid::from_slots(self.schedules.list_slots(&ctx.child_id).await?)?;
        let entries = self.usage_logs.list_entries(&ctx.child_id, None).await?;

        let balance = RewardBalance::new(earned_points(grid.slots(), &config.weights), used_points(&entries));
        Ok(RewardReport { balance, config })
    }

    async fn load_config(&self, child_id: &str) -> PlannerResult<RewardConfig> {
        Ok(self
            .reward_configs
            .get_reward_config(child_id)
            .await?
            .unwrap_or_default())
    }
}
