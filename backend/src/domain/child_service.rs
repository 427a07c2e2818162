use chrono::Utc;
use shared::PlanState;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::commands::child::{CreateChildCommand, UpdateChildCommand};
use crate::domain::errors::{PlannerError, PlannerResult};
use crate::domain::grid::{ScheduleGrid, TimeMark, TimeRange};
use crate::domain::models::{ChildContext, ChildProfile, RewardConfig};
use crate::domain::schedule_sync::plan_sync;
use crate::domain::templates::recommended_schedule;
use crate::storage::{
    ChildRepository, ChildStorage, DbConnection, RewardConfigRepository, RewardConfigStorage,
    ScheduleRepository, ScheduleStorage,
};

/// Service for child profiles and for proving a caller owns a child
#[derive(Clone)]
pub struct ChildService {
    children: Arc<dyn ChildStorage>,
    reward_configs: Arc<dyn RewardConfigStorage>,
    schedules: Arc<dyn ScheduleStorage>,
}

impl ChildService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            children: Arc::new(ChildRepository::new(db.clone())),
            reward_configs: Arc::new(RewardConfigRepository::new(db.clone())),
            schedules: Arc::new(ScheduleRepository::new(db)),
        }
    }

    /// Load the child named by `ctx`, failing unless the caller owns it.
    ///
    /// A missing child and someone else's child report the same error.
    pub async fn authorize(&self, ctx: &ChildContext) -> PlannerResult<ChildProfile> {
        match self.children.get_child(&ctx.child_id).await? {
            Some(child) if child.owner_id == ctx.owner_id => Ok(child),
            Some(_) => {
                warn!("Owner {} tried to access child {}", ctx.owner_id, ctx.child_id);
                Err(PlannerError::Unauthorized(ctx.child_id.clone()))
            }
            None => Err(PlannerError::Unauthorized(ctx.child_id.clone())),
        }
    }

    pub async fn create_child(&self, owner_id: &str, command: CreateChildCommand) -> PlannerResult<ChildProfile> {
        info!("Creating child for owner {}: {:?}", owner_id, command);

        let name = Self::validate_name(&command.name)?;
        let color = command
            .color
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| ChildProfile::DEFAULT_COLOR.to_string());

        let now = Utc::now();
        let child = ChildProfile {
            id: ChildProfile::generate_id(),
            owner_id: owner_id.to_string(),
            name,
            color,
            grade: command.grade,
            start_time: None,
            end_time: None,
            plan_state: PlanState::Drafting,
            created_at: now,
            updated_at: now,
        };

        self.children.store_child(&child).await?;
        self.reward_configs
            .store_reward_config(&child.id, &RewardConfig::default())
            .await?;

        if command.with_template {
            let template = ScheduleGrid::from_slots(recommended_schedule(child.grade))?;
            let plan = plan_sync(&ScheduleGrid::new(), &template);
            self.schedules.apply_sync_plan(&child.id, &[], &plan).await?;
            info!("Seeded child {} with {} template slots", child.id, plan.creates.len());
        }

        info!("Created child: {} with ID: {}", child.name, child.id);
        Ok(child)
    }

    pub async fn list_children(&self, owner_id: &str) -> PlannerResult<Vec<ChildProfile>> {
        let children = self.children.list_children(owner_id).await?;
        info!("Found {} children for owner {}", children.len(), owner_id);
        Ok(children)
    }

    pub async fn get_child(&self, ctx: &ChildContext) -> PlannerResult<ChildProfile> {
        self.authorize(ctx).await
    }

    pub async fn update_child(&self, ctx: &ChildContext, command: UpdateChildCommand) -> PlannerResult<ChildProfile> {
        info!("Updating child {}: {:?}", ctx.child_id, command);
        let mut child = self.authorize(ctx).await?;

        if let Some(name) = &command.name {
            child.name = Self::validate_name(name)?;
        }
        if let Some(color) = &command.color {
            let color = color.trim();
            if color.is_empty() {
                return Err(PlannerError::validation("Color cannot be empty"));
            }
            child.color = color.to_string();
        }
        if let Some(grade) = command.grade {
            child.grade = grade;
        }
        if let Some(start) = &command.start_time {
            child.start_time = Self::parse_bound(start)?;
        }
        if let Some(end) = &command.end_time {
            child.end_time = Self::parse_bound(end)?;
        }

        child.updated_at = Utc::now();
        self.children.update_child(&child).await?;
        Ok(child)
    }

    /// Confirm the plan (outcome marking) or unlock it for editing
    pub async fn set_plan_state(&self, ctx: &ChildContext, plan_state: PlanState) -> PlannerResult<ChildProfile> {
        let mut child = self.authorize(ctx).await?;
        if child.plan_state == plan_state {
            return Ok(child);
        }

        info!("Child {} plan: {:?} -> {:?}", child.id, child.plan_state, plan_state);
        child.plan_state = plan_state;
        child.updated_at = Utc::now();
        self.children.update_child(&child).await?;
        Ok(child)
    }

    /// Delete the child along with its slots, reward table, ledger and snapshots
    pub async fn delete_child(&self, ctx: &ChildContext) -> PlannerResult<()> {
        let child = self.authorize(ctx).await?;
        if !self.children.delete_child(&child.id).await? {
            return Err(PlannerError::Unauthorized(ctx.child_id.clone()));
        }
        info!("Deleted child: {} with ID: {}", child.name, child.id);
        Ok(())
    }

    pub async fn visible_time_range(&self, ctx: &ChildContext) -> PlannerResult<TimeRange> {
        Ok(self.authorize(ctx).await?.visible_time_range())
    }

    /// Persist a child record changed by another service
    pub(crate) async fn save_child(&self, child: &ChildProfile) -> PlannerResult<()> {
        self.children.update_child(child).await?;
        Ok(())
    }

    fn validate_name(name: &str) -> PlannerResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PlannerError::validation("Child name cannot be empty"));
        }
        if name.chars().count() > ChildProfile::MAX_NAME_LENGTH {
            return Err(PlannerError::validation(format!(
                "Child name cannot exceed {} characters",
                ChildProfile::MAX_NAME_LENGTH
            )));
        }
        Ok(name.to_string())
    }

    fn parse_bound(value: &str) -> PlannerResult<Option<TimeMark>> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }
        TimeMark::parse_required(value).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::GradeLevel;

    async fn setup_test() -> ChildService {
        let db = DbConnection::init_test().await.expect("Failed to init test DB");
        ChildService::new(db)
    }

    fn create_command(name: &str) -> CreateChildCommand {
        CreateChildCommand {
            name: name.to_string(),
            color: None,
            grade: GradeLevel::Elementary,
            with_template: false,
        }
    }

    #[tokio::test]
    async fn test_create_child_stores_default_reward_config() {
        let service = setup_test().await;
        let child = service.create_child("owner-1", create_command("  Mina  ")).await.unwrap();

        assert_eq!(child.name, "Mina");
        assert_eq!(child.color, ChildProfile::DEFAULT_COLOR);
        assert_eq!(child.plan_state, PlanState::Drafting);

        let config = service.reward_configs.get_reward_config(&child.id).await.unwrap();
        assert_eq!(config, Some(RewardConfig::default()));
        assert!(service.schedules.list_slots(&child.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_child_with_template_seeds_week() {
        let service = setup_test().await;
        let mut command = create_command("Mina");
        command.with_template = true;
        let child = service.create_child("owner-1", command).await.unwrap();

        let slots = service.schedules.list_slots(&child.id).await.unwrap();
        assert_eq!(slots.len(), 7 * 41);
    }

    #[tokio::test]
    async fn test_create_child_rejects_blank_name() {
        let service = setup_test().await;
        let result = service.create_child("owner-1", create_command("   ")).await;
        assert!(matches!(result, Err(PlannerError::Validation(_))));
    }

    #[tokio::test]
    async fn test_foreign_and_missing_children_are_unauthorized() {
        let service = setup_test().await;
        let child = service.create_child("owner-1", create_command("Mina")).await.unwrap();

        let foreign = ChildContext::new("owner-2", child.id.clone());
        assert!(matches!(service.get_child(&foreign).await, Err(PlannerError::Unauthorized(_))));
        assert!(matches!(service.delete_child(&foreign).await, Err(PlannerError::Unauthorized(_))));

        let missing = ChildContext::new("owner-1", "child::nope");
        assert!(matches!(service.authorize(&missing).await, Err(PlannerError::Unauthorized(_))));

        let own = ChildContext::new("owner-1", child.id.clone());
        assert_eq!(service.get_child(&own).await.unwrap().id, child.id);
    }

    #[tokio::test]
    async fn test_update_child_validates_time_bounds() {
        let service = setup_test().await;
        let child = service.create_child("owner-1", create_command("Mina")).await.unwrap();
        let ctx = ChildContext::new("owner-1", child.id.clone());

        let bad = UpdateChildCommand {
            start_time: Some("07:15".to_string()),
            ..UpdateChildCommand::default()
        };
        assert!(matches!(service.update_child(&ctx, bad).await, Err(PlannerError::Validation(_))));

        let good = UpdateChildCommand {
            start_time: Some("08:00".to_string()),
            grade: Some(GradeLevel::High),
            ..UpdateChildCommand::default()
        };
        let updated = service.update_child(&ctx, good).await.unwrap();
        let range = updated.visible_time_range();
        assert_eq!(range.start().as_str(), "08:00");
        assert_eq!(range.end().as_str(), "02:00");

        let cleared = UpdateChildCommand {
            start_time: Some(String::new()),
            ..UpdateChildCommand::default()
        };
        let updated = service.update_child(&ctx, cleared).await.unwrap();
        assert_eq!(updated.start_time, None);
        assert_eq!(service.visible_time_range(&ctx).await.unwrap().start().as_str(), "06:00");
    }

    #[tokio::test]
    async fn test_plan_state_toggles() {
        let service = setup_test().await;
        let child = service.create_child("owner-1", create_command("Mina")).await.unwrap();
        let ctx = ChildContext::new("owner-1", child.id.clone());

        let confirmed = service.set_plan_state(&ctx, PlanState::Confirmed).await.unwrap();
        assert!(confirmed.is_locked());
        let drafting = service.set_plan_state(&ctx, PlanState::Drafting).await.unwrap();
        assert!(!drafting.is_locked());
    }

    #[tokio::test]
    async fn test_list_children_and_delete() {
        let service = setup_test().await;
        let first = service.create_child("owner-1", create_command("Mina")).await.unwrap();
        service.create_child("owner-1", create_command("Joon")).await.unwrap();
        service.create_child("owner-2", create_command("Other")).await.unwrap();

        assert_eq!(service.list_children("owner-1").await.unwrap().len(), 2);

        service
            .delete_child(&ChildContext::new("owner-1", first.id.clone()))
            .await
            .unwrap();
        let remaining = service.list_children("owner-1").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "Joon");
    }
}
