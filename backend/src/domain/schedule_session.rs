//! Client-side editing session for one child's week.
//!
//! The session keeps two grids: the working grid the caregiver sees and the
//! grid last confirmed by storage. Every edit advances the working grid and
//! then syncs it. If that sync fails the two grids stay apart, the session
//! reports `Diverged`, and the caller decides whether to retry with another
//! edit or to `reconcile()` back to what storage holds. Nothing is retried
//! behind the caller's back.

use shared::{PlanState, SlotStatus};
use tracing::{info, warn};

use crate::domain::child_service::ChildService;
use crate::domain::errors::PlannerResult;
use crate::domain::grid::{GridCell, ScheduleGrid, TimeRange};
use crate::domain::models::ChildContext;
use crate::domain::schedule_service::ScheduleService;
use crate::domain::selection::{DragTracker, Gesture, Selection};
use crate::domain::slot_editor::{cycle_status, EditOutcome, EditTarget, SlotDraft, SlotEditor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    /// Working grid equals the last persisted grid
    Clean,
    /// The last sync failed; the working grid holds edits storage never saw
    Diverged { error: String },
}

pub struct ScheduleSession {
    ctx: ChildContext,
    schedules: ScheduleService,
    children: ChildService,
    working: ScheduleGrid,
    persisted: ScheduleGrid,
    plan_state: PlanState,
    drag: DragTracker,
    editor: SlotEditor,
    state: SyncState,
}

impl ScheduleSession {
    /// Load the child's stored week and visible hours
    pub async fn open(schedules: ScheduleService, children: ChildService, ctx: ChildContext) -> PlannerResult<Self> {
        let child = children.get_child(&ctx).await?;
        let persisted = schedules.fetch_schedule(&ctx).await?;

        Ok(Self {
            drag: DragTracker::new(child.visible_time_range()),
            plan_state: child.plan_state,
            working: persisted.clone(),
            persisted,
            editor: SlotEditor::new(),
            state: SyncState::Clean,
            ctx,
            schedules,
            children,
        })
    }

    pub fn context(&self) -> &ChildContext {
        &self.ctx
    }

    pub fn working(&self) -> &ScheduleGrid {
        &self.working
    }

    pub fn persisted(&self) -> &ScheduleGrid {
        &self.persisted
    }

    pub fn sync_state(&self) -> &SyncState {
        &self.state
    }

    pub fn is_diverged(&self) -> bool {
        matches!(self.state, SyncState::Diverged { .. })
    }

    pub fn plan_state(&self) -> PlanState {
        self.plan_state
    }

    pub fn time_range(&self) -> &TimeRange {
        self.drag.range()
    }

    pub fn pending_delete(&self) -> Option<EditTarget> {
        self.editor.pending_delete()
    }

    // Pointer handling. Drags only start while drafting.

    pub fn press(&mut self, cell: GridCell) -> bool {
        self.drag.press(cell, self.plan_state)
    }

    pub fn hover(&mut self, cell: GridCell) {
        self.drag.hover(cell)
    }

    /// Finish a drag; the result says which cell or rectangle to open the editor on
    pub fn release(&mut self) -> Option<EditTarget> {
        self.drag.release().map(Self::edit_target)
    }

    pub fn pointer_left(&mut self) -> Option<EditTarget> {
        self.drag.pointer_left().map(Self::edit_target)
    }

    pub fn preview(&self) -> Option<Selection> {
        self.drag.preview()
    }

    fn edit_target(gesture: Gesture) -> EditTarget {
        match gesture {
            Gesture::Click(cell) => EditTarget::Cell(cell),
            Gesture::Range(selection) => EditTarget::Range(selection),
        }
    }

    /// Submit the editor dialog for `target`
    pub async fn submit(&mut self, target: EditTarget, draft: &SlotDraft) -> PlannerResult<EditOutcome> {
        let outcome = self.editor.submit(&self.working, self.plan_state, target, draft)?;
        self.commit_outcome(&outcome).await?;
        Ok(outcome)
    }

    pub async fn confirm_delete(&mut self) -> PlannerResult<EditOutcome> {
        let outcome = self.editor.confirm_delete(&self.working, self.plan_state)?;
        self.commit_outcome(&outcome).await?;
        Ok(outcome)
    }

    /// Editor closed without saving
    pub fn cancel_edit(&mut self) {
        self.editor.cancel();
    }

    /// Click on a confirmed plan: advance the slot's outcome and sync.
    /// Returns the new status, or `None` for an empty cell.
    pub async fn mark_outcome(&mut self, cell: GridCell) -> PlannerResult<Option<SlotStatus>> {
        let Some(next) = cycle_status(&self.working, cell, self.plan_state)? else {
            return Ok(None);
        };
        let status = next.find(cell).map(|slot| slot.status);
        self.commit(next).await?;
        Ok(status)
    }

    /// Confirm or unlock the plan. Any drag or armed delete is dropped.
    pub async fn set_plan_state(&mut self, plan_state: PlanState) -> PlannerResult<()> {
        let child = self.children.set_plan_state(&self.ctx, plan_state).await?;
        self.plan_state = child.plan_state;
        self.drag.cancel();
        self.editor.cancel();
        Ok(())
    }

    /// Throw away local edits and reload what storage holds
    pub async fn reconcile(&mut self) -> PlannerResult<()> {
        let child = self.children.get_child(&self.ctx).await?;
        let persisted = self.schedules.fetch_schedule(&self.ctx).await?;

        info!("Reconciled session for child {} ({} slots)", self.ctx.child_id, persisted.len());
        self.plan_state = child.plan_state;
        self.drag.set_range(child.visible_time_range());
        self.editor.cancel();
        self.working = persisted.clone();
        self.persisted = persisted;
        self.state = SyncState::Clean;
        Ok(())
    }

    async fn commit_outcome(&mut self, outcome: &EditOutcome) -> PlannerResult<()> {
        match outcome {
            EditOutcome::Saved(grid) | EditOutcome::Deleted { grid, .. } => self.commit(grid.clone()).await,
            EditOutcome::DeleteArmed => Ok(()),
        }
    }

    async fn commit(&mut self, next: ScheduleGrid) -> PlannerResult<()> {
        self.working = next;
        match self.schedules.sync_schedule(&self.ctx, self.working.to_vec()).await {
            Ok(result) => {
                self.persisted = result.grid;
                self.working = self.persisted.clone();
                self.state = SyncState::Clean;
                Ok(())
            }
            Err(e) => {
                warn!("Session for child {} diverged: {}", self.ctx.child_id, e);
                self.state = SyncState::Diverged { error: e.to_string() };
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::child::CreateChildCommand;
    use crate::domain::errors::PlannerError;
    use crate::domain::models::Slot;
    use crate::domain::schedule_sync::SyncPlan;
    use crate::storage::{DbConnection, ScheduleRepository, ScheduleStorage};
    use async_trait::async_trait;
    use shared::{ActivityType, GradeLevel};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Real storage whose writes can be switched off
    struct FlakyStorage {
        inner: ScheduleRepository,
        offline: AtomicBool,
    }

    #[async_trait]
    impl ScheduleStorage for FlakyStorage {
        async fn list_slots(&self, child_id: &str) -> anyhow::Result<Vec<Slot>> {
            self.inner.list_slots(child_id).await
        }

        async fn apply_sync_plan(&self, child_id: &str, expected: &[Slot], plan: &SyncPlan) -> anyhow::Result<()> {
            if self.offline.load(Ordering::SeqCst) {
                anyhow::bail!("storage offline");
            }
            self.inner.apply_sync_plan(child_id, expected, plan).await
        }
    }

    async fn setup_test() -> (ScheduleSession, Arc<FlakyStorage>) {
        let db = DbConnection::init_test().await.expect("Failed to init test DB");
        let children = ChildService::new(db.clone());
        let child = children
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

        let storage = Arc::new(FlakyStorage {
            inner: ScheduleRepository::new(db),
            offline: AtomicBool::new(false),
        });
        let schedules = ScheduleService::with_storage(children.clone(), storage.clone());
        let session = ScheduleSession::open(schedules, children, ChildContext::new("owner-1", child.id))
            .await
            .unwrap();
        (session, storage)
    }

    fn cell(day: u8, time: &str) -> GridCell {
        GridCell::parse(day, time).unwrap()
    }

    #[tokio::test]
    async fn test_open_uses_grade_hours() {
        let (session, _) = setup_test().await;
        assert_eq!(session.time_range().start().as_str(), "07:00");
        assert_eq!(session.time_range().end().as_str(), "22:00");
        assert!(session.working().is_empty());
        assert_eq!(session.sync_state(), &SyncState::Clean);
    }

    #[tokio::test]
    async fn test_drag_edit_is_persisted() {
        let (mut session, _) = setup_test().await;

        assert!(session.press(cell(2, "09:00")));
        session.hover(cell(3, "10:00"));
        let target = session.release().unwrap();
        assert!(matches!(target, EditTarget::Range(_)));

        let outcome = session
            .submit(target, &SlotDraft::new("Math", ActivityType::Study))
            .await
            .unwrap();
        assert!(matches!(outcome, EditOutcome::Saved(_)));

        assert_eq!(session.working().len(), 6);
        assert_eq!(session.persisted(), session.working());
        assert!(!session.is_diverged());
    }

    #[tokio::test]
    async fn test_failed_sync_diverges_until_reconciled() {
        let (mut session, storage) = setup_test().await;
        storage.offline.store(true, Ordering::SeqCst);

        let result = session
            .submit(EditTarget::Cell(cell(2, "09:00")), &SlotDraft::new("Math", ActivityType::Study))
            .await;
        assert!(matches!(result, Err(PlannerError::Persistence(_))));
        assert!(session.is_diverged());
        assert_eq!(session.working().len(), 1);
        assert!(session.persisted().is_empty());

        storage.offline.store(false, Ordering::SeqCst);
        session.reconcile().await.unwrap();
        assert_eq!(session.sync_state(), &SyncState::Clean);
        assert!(session.working().is_empty());
    }

    #[tokio::test]
    async fn test_next_successful_edit_converges() {
        let (mut session, storage) = setup_test().await;
        storage.offline.store(true, Ordering::SeqCst);
        let draft = SlotDraft::new("Math", ActivityType::Study);
        let _ = session.submit(EditTarget::Cell(cell(2, "09:00")), &draft).await;
        assert!(session.is_diverged());

        storage.offline.store(false, Ordering::SeqCst);
        session.submit(EditTarget::Cell(cell(2, "09:30")), &draft).await.unwrap();
        assert!(!session.is_diverged());
        assert_eq!(session.persisted().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_needs_two_submits() {
        let (mut session, _) = setup_test().await;
        let target = EditTarget::Cell(cell(2, "09:00"));
        session
            .submit(target, &SlotDraft::new("Math", ActivityType::Study))
            .await
            .unwrap();

        let empty = SlotDraft::new("", ActivityType::Study);
        let first = session.submit(target, &empty).await.unwrap();
        assert_eq!(first, EditOutcome::DeleteArmed);
        assert_eq!(session.persisted().len(), 1);

        let second = session.confirm_delete().await.unwrap();
        assert!(matches!(second, EditOutcome::Deleted { removed: 1, .. }));
        assert!(session.persisted().is_empty());
    }

    #[tokio::test]
    async fn test_confirmed_plan_marks_outcomes_instead_of_editing() {
        let (mut session, _) = setup_test().await;
        session
            .submit(EditTarget::Cell(cell(2, "09:00")), &SlotDraft::new("Math", ActivityType::Study))
            .await
            .unwrap();
        session.set_plan_state(PlanState::Confirmed).await.unwrap();

        assert!(!session.press(cell(2, "09:00")));
        assert!(matches!(
            session
                .submit(EditTarget::Cell(cell(2, "10:00")), &SlotDraft::new("Art", ActivityType::Rest))
                .await,
            Err(PlannerError::PlanLocked)
        ));

        assert_eq!(session.mark_outcome(cell(2, "09:00")).await.unwrap(), Some(SlotStatus::Completed));
        assert_eq!(session.mark_outcome(cell(2, "09:00")).await.unwrap(), Some(SlotStatus::Failed));
        assert_eq!(session.mark_outcome(cell(2, "11:00")).await.unwrap(), None);

        let stored = session.persisted().find(cell(2, "09:00")).unwrap();
        assert_eq!(stored.status, SlotStatus::Failed);
    }
}
