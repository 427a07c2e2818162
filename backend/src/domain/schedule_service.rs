use chrono::Utc;
use shared::{GradeLevel, PlanState};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::child_service::ChildService;
use crate::domain::commands::schedule::SyncResult;
use crate::domain::errors::{PlannerError, PlannerResult};
use crate::domain::grid::ScheduleGrid;
use crate::domain::models::{ChildContext, Slot};
use crate::domain::reward_calculator::{time_by_category, CategoryShare};
use crate::domain::schedule_sync::{plan_sync, SyncPlan};
use crate::domain::templates::recommended_schedule;
use crate::storage::{DbConnection, ScheduleRepository, ScheduleStorage, StaleSchedule};

/// Re-plans allowed when another sync lands between reading and writing
const MAX_SYNC_ATTEMPTS: usize = 3;

/// Service for reading a child's week and reconciling edits into storage
#[derive(Clone)]
pub struct ScheduleService {
    child_service: ChildService,
    schedules: Arc<dyn ScheduleStorage>,
}

impl ScheduleService {
    pub fn new(db: DbConnection) -> Self {
        let child_service = ChildService::new(db.clone());
        Self::with_storage(child_service, Arc::new(ScheduleRepository::new(db)))
    }

    pub fn with_storage(child_service: ChildService, schedules: Arc<dyn ScheduleStorage>) -> Self {
        Self {
            child_service,
            schedules,
        }
    }

    pub async fn fetch_schedule(&self, ctx: &ChildContext) -> PlannerResult<ScheduleGrid> {
        self.child_service.authorize(ctx).await?;
        self.load_grid(&ctx.child_id).await
    }

    /// Make the stored week equal to `slots`, writing only what changed.
    ///
    /// While the plan is confirmed only slot outcomes may change; anything
    /// that adds, removes or rewrites a slot is refused.
    pub async fn sync_schedule(&self, ctx: &ChildContext, slots: Vec<Slot>) -> PlannerResult<SyncResult> {
        let child = self.child_service.authorize(ctx).await?;
        let incoming = ScheduleGrid::from_slots(slots)?;
        self.reconcile(&child.id, incoming, child.is_locked()).await
    }

    /// Remove every slot of the week, whatever the plan state
    pub async fn clear_schedule(&self, ctx: &ChildContext) -> PlannerResult<SyncResult> {
        let child = self.child_service.authorize(ctx).await?;
        info!("Clearing schedule of child {}", child.id);
        self.reconcile(&child.id, ScheduleGrid::new(), false).await
    }

    /// Replace the week with the grade template. The child takes on the
    /// grade, its default visible hours and an unlocked plan, even if the
    /// plan was confirmed.
    pub async fn apply_template(&self, ctx: &ChildContext, grade: GradeLevel) -> PlannerResult<SyncResult> {
        let mut child = self.child_service.authorize(ctx).await?;

        info!("Applying {} template to child {}", grade.as_str(), child.id);
        let template = ScheduleGrid::from_slots(recommended_schedule(grade))?;
        let result = self.reconcile(&child.id, template, false).await?;

        child.grade = grade;
        child.start_time = None;
        child.end_time = None;
        child.plan_state = PlanState::Drafting;
        child.updated_at = Utc::now();
        self.child_service.save_child(&child).await?;

        Ok(result)
    }

    /// Scheduled minutes per activity type across the week
    pub async fn time_breakdown(&self, ctx: &ChildContext) -> PlannerResult<(u32, Vec<CategoryShare>)> {
        let grid = self.fetch_schedule(ctx).await?;
        Ok(time_by_category(grid.slots()))
    }

    async fn load_grid(&self, child_id: &str) -> PlannerResult<ScheduleGrid> {
        ScheduleGrid::from_slots(self.schedules.list_slots(child_id).await?)
    }

    /// Diff `incoming` against storage and write the difference. With
    /// `outcomes_only` set, any change other than a slot status is refused.
    /// A week that changes underneath the write is re-read and re-planned,
    /// so the last sync to commit wins.
    async fn reconcile(&self, child_id: &str, incoming: ScheduleGrid, outcomes_only: bool) -> PlannerResult<SyncResult> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let persisted = self.load_grid(child_id).await?;
            let plan = plan_sync(&persisted, &incoming);

            if outcomes_only {
                Self::ensure_outcomes_only(&persisted, &plan)?;
            }

            let summary = plan.summary();
            if plan.is_empty() {
                return Ok(SyncResult {
                    grid: persisted,
                    summary,
                });
            }

            match self.schedules.apply_sync_plan(child_id, &persisted.to_vec(), &plan).await {
                Ok(()) => {
                    info!(
                        "Synced child {}: {} created, {} updated, {} deleted",
                        child_id, summary.created, summary.updated, summary.deleted
                    );
                    return Ok(SyncResult {
                        grid: incoming,
                        summary,
                    });
                }
                Err(e) if e.is::<StaleSchedule>() && attempt < MAX_SYNC_ATTEMPTS => {
                    debug!("Re-planning sync for child {} (attempt {})", child_id, attempt);
                }
                Err(e) => {
                    warn!("Sync for child {} failed and was rolled back: {}", child_id, e);
                    return Err(e.into());
                }
            }
        }
    }

    fn ensure_outcomes_only(persisted: &ScheduleGrid, plan: &SyncPlan) -> PlannerResult<()> {
        if !plan.creates.is_empty() || !plan.deletes.is_empty() {
            return Err(PlannerError::PlanLocked);
        }
        for slot in &plan.updates {
            let Some(stored) = persisted.get(&slot.id) else {
                return Err(PlannerError::PlanLocked);
            };
            let mut outcome_only = stored.clone();
            outcome_only.status = slot.status;
            if !outcome_only.same_content(slot) {
                return Err(PlannerError::PlanLocked);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::child::CreateChildCommand;
    use crate::domain::grid::GridCell;
    use async_trait::async_trait;
    use shared::{ActivityType, SlotStatus, SyncSummary};
    use std::sync::atomic::{AtomicBool, Ordering};

    async fn setup_test() -> (ScheduleService, ChildService, ChildContext) {
        let db = DbConnection::init_test().await.expect("Failed to init test DB");
        let child_service = ChildService::new(db.clone());
        let child = child_service
            .create_child(
                "owner-1",
                CreateChildCommand {
                    name: "Mina".to_string(),
                    color: None,
                    grade: GradeLevel::Elementary,
                    with_template: false,
                },
            )
            .await
            .unwrap();
        let service = ScheduleService::new(db);
        (service, child_service, ChildContext::new("owner-1", child.id))
    }

    fn slot(id: &str, day: u8, time: &str) -> Slot {
        Slot::with_id(id, GridCell::parse(day, time).unwrap(), "Math", ActivityType::Study)
    }

    #[tokio::test]
    async fn test_sync_twice_is_idempotent() {
        let (service, _, ctx) = setup_test().await;
        let week = vec![slot("id1", 2, "09:00"), slot("id2", 2, "09:30")];

        let first = service.sync_schedule(&ctx, week.clone()).await.unwrap();
        assert_eq!(first.summary, SyncSummary { created: 2, updated: 0, deleted: 0 });

        let second = service.sync_schedule(&ctx, week).await.unwrap();
        assert_eq!(second.summary, SyncSummary::default());
        assert_eq!(second.grid.len(), 2);
    }

    #[tokio::test]
    async fn test_sync_adds_one_new_slot() {
        let (service, _, ctx) = setup_test().await;
        service
            .sync_schedule(&ctx, vec![slot("id1", 2, "09:00"), slot("id2", 2, "09:30")])
            .await
            .unwrap();

        let result = service
            .sync_schedule(&ctx, vec![slot("id1", 2, "09:00"), slot("id2", 2, "09:30"), slot("id3", 3, "10:00")])
            .await
            .unwrap();
        assert_eq!(result.summary, SyncSummary { created: 1, updated: 0, deleted: 0 });
        assert!(result.grid.get("id3").is_some());
    }

    #[tokio::test]
    async fn test_sync_rejects_two_slots_in_one_cell() {
        let (service, _, ctx) = setup_test().await;
        let result = service
            .sync_schedule(&ctx, vec![slot("a", 2, "09:00"), slot("b", 2, "09:00")])
            .await;
        assert!(matches!(result, Err(PlannerError::Consistency(_))));
        assert!(service.fetch_schedule(&ctx).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_last_sync_wins_without_conflict_detection() {
        let (service, _, ctx) = setup_test().await;
        service.sync_schedule(&ctx, vec![slot("a", 2, "09:00")]).await.unwrap();

        // Two sessions started from the same week; the later write replaces
        // the earlier one wholesale.
        let mut first = slot("a", 2, "09:00");
        first.activity = "Reading".to_string();
        let mut second = slot("a", 2, "09:00");
        second.activity = "Piano".to_string();

        service.sync_schedule(&ctx, vec![first, slot("b", 2, "10:00")]).await.unwrap();
        let result = service.sync_schedule(&ctx, vec![second]).await.unwrap();

        assert_eq!(result.grid.len(), 1);
        assert_eq!(result.grid.get("a").unwrap().activity, "Piano");
    }

    #[tokio::test]
    async fn test_confirmed_plan_accepts_only_outcome_changes() {
        let (service, child_service, ctx) = setup_test().await;
        service.sync_schedule(&ctx, vec![slot("a", 2, "09:00")]).await.unwrap();
        child_service.set_plan_state(&ctx, PlanState::Confirmed).await.unwrap();

        let mut done = slot("a", 2, "09:00");
        done.status = SlotStatus::Completed;
        let result = service.sync_schedule(&ctx, vec![done.clone()]).await.unwrap();
        assert_eq!(result.summary.updated, 1);

        let added = service.sync_schedule(&ctx, vec![done.clone(), slot("b", 2, "10:00")]).await;
        assert!(matches!(added, Err(PlannerError::PlanLocked)));

        let mut renamed = done;
        renamed.activity = "Other".to_string();
        assert!(matches!(
            service.sync_schedule(&ctx, vec![renamed]).await,
            Err(PlannerError::PlanLocked)
        ));
    }

    #[tokio::test]
    async fn test_clear_ignores_confirmed_plan() {
        let (service, child_service, ctx) = setup_test().await;
        service.sync_schedule(&ctx, vec![slot("a", 2, "09:00")]).await.unwrap();
        child_service.set_plan_state(&ctx, PlanState::Confirmed).await.unwrap();

        let cleared = service.clear_schedule(&ctx).await.unwrap();
        assert_eq!(cleared.summary.deleted, 1);
        assert!(service.fetch_schedule(&ctx).await.unwrap().is_empty());
        assert_eq!(child_service.get_child(&ctx).await.unwrap().plan_state, PlanState::Confirmed);
    }

    #[tokio::test]
    async fn test_template_unlocks_confirmed_plan() {
        let (service, child_service, ctx) = setup_test().await;
        service.sync_schedule(&ctx, vec![slot("mine", 2, "09:00")]).await.unwrap();
        child_service.set_plan_state(&ctx, PlanState::Confirmed).await.unwrap();

        let result = service.apply_template(&ctx, GradeLevel::Middle).await.unwrap();
        assert_eq!(result.summary.deleted, 1);
        assert_eq!(result.summary.created, 7 * 41);

        let child = child_service.get_child(&ctx).await.unwrap();
        assert_eq!(child.plan_state, PlanState::Drafting);
        assert_eq!(child.grade, GradeLevel::Middle);
    }

    /// Lets another writer commit a slot just before the first plan is applied
    struct InterleavedStorage {
        inner: ScheduleRepository,
        interfered: AtomicBool,
    }

    #[async_trait]
    impl ScheduleStorage for InterleavedStorage {
        async fn list_slots(&self, child_id: &str) -> anyhow::Result<Vec<Slot>> {
            self.inner.list_slots(child_id).await
        }

        async fn apply_sync_plan(&self, child_id: &str, expected: &[Slot], plan: &SyncPlan) -> anyhow::Result<()> {
            if !self.interfered.swap(true, Ordering::SeqCst) {
                let theirs = SyncPlan {
                    deletes: Vec::new(),
                    updates: Vec::new(),
                    creates: vec![slot("theirs", 4, "11:00")],
                };
                self.inner.apply_sync_plan(child_id, expected, &theirs).await?;
            }
            self.inner.apply_sync_plan(child_id, expected, plan).await
        }
    }

    #[tokio::test]
    async fn test_overlapping_sync_is_replanned_and_last_write_wins() {
        let db = DbConnection::init_test().await.expect("Failed to init test DB");
        let (plain, child_service, ctx) = {
            let child_service = ChildService::new(db.clone());
            let child = child_service
                .create_child(
                    "owner-1",
                    CreateChildCommand {
                        name: "Mina".to_string(),
                        color: None,
                        grade: GradeLevel::Elementary,
                        with_template: false,
                    },
                )
                .await
                .unwrap();
            (ScheduleService::new(db.clone()), child_service, ChildContext::new("owner-1", child.id))
        };
        plain.sync_schedule(&ctx, vec![slot("a", 2, "09:00")]).await.unwrap();

        let service = ScheduleService::with_storage(
            child_service,
            Arc::new(InterleavedStorage {
                inner: ScheduleRepository::new(db),
                interfered: AtomicBool::new(false),
            }),
        );
        let mut mine = slot("a", 2, "09:00");
        mine.activity = "Piano".to_string();

        let result = service.sync_schedule(&ctx, vec![mine]).await.unwrap();
        assert_eq!(result.summary, SyncSummary { created: 0, updated: 1, deleted: 1 });

        let stored = plain.fetch_schedule(&ctx).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.get("a").unwrap().activity, "Piano");
    }

    #[tokio::test]
    async fn test_apply_template_replaces_week_and_resets_child() {
        let (service, child_service, ctx) = setup_test().await;
        service.sync_schedule(&ctx, vec![slot("mine", 2, "09:00")]).await.unwrap();

        let result = service.apply_template(&ctx, GradeLevel::High).await.unwrap();
        assert_eq!(result.summary.deleted, 1);
        assert_eq!(result.summary.created, 7 * 41);

        let child = child_service.get_child(&ctx).await.unwrap();
        assert_eq!(child.grade, GradeLevel::High);
        assert_eq!(child.plan_state, PlanState::Drafting);
        assert_eq!(child.visible_time_range().start().as_str(), "06:00");
    }

    #[tokio::test]
    async fn test_time_breakdown_and_clear() {
        let (service, _, ctx) = setup_test().await;
        let mut rest = slot("r", 0, "10:00");
        rest.activity_type = ActivityType::Rest;
        service
            .sync_schedule(&ctx, vec![slot("a", 2, "09:00"), slot("b", 2, "09:30"), rest])
            .await
            .unwrap();

        let (total, shares) = service.time_breakdown(&ctx).await.unwrap();
        assert_eq!(total, 90);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].activity_type, ActivityType::Study);
        assert_eq!(shares[0].minutes, 60);

        let cleared = service.clear_schedule(&ctx).await.unwrap();
        assert_eq!(cleared.summary.deleted, 3);
        assert!(cleared.grid.is_empty());
    }

    #[tokio::test]
    async fn test_other_owner_cannot_sync() {
        let (service, _, ctx) = setup_test().await;
        let intruder = ChildContext::new("owner-2", ctx.child_id.clone());
        let result = service.sync_schedule(&intruder, vec![slot("a", 2, "09:00")]).await;
        assert!(matches!(result, Err(PlannerError::Unauthorized(_))));
    }
}
