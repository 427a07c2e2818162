//! Slot editor: applies one caregiver edit to a single cell or to every cell
//! of a selection and produces the next grid state.
//!
//! Edits are pure; the caller decides when the new grid becomes the working
//! copy and when it is persisted. An empty activity text is a deletion
//! request, which has to be submitted (or confirmed) a second time before
//! anything is removed.

use shared::{ActivityType, PlanState, SlotStatus};
use tracing::{debug, info};

use crate::domain::errors::{PlannerError, PlannerResult};
use crate::domain::grid::{GridCell, ScheduleGrid};
use crate::domain::models::slot::Slot;
use crate::domain::selection::Selection;

/// What an edit applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Cell(GridCell),
    Range(Selection),
}

impl EditTarget {
    pub fn contains(&self, cell: GridCell) -> bool {
        match self {
            EditTarget::Cell(target) => *target == cell,
            EditTarget::Range(selection) => selection.contains(cell),
        }
    }
}

/// Contents of the edit dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDraft {
    pub activity: String,
    pub activity_type: ActivityType,
}

impl SlotDraft {
    pub fn new(activity: impl Into<String>, activity_type: ActivityType) -> Self {
        Self {
            activity: activity.into(),
            activity_type,
        }
    }

    pub fn is_delete_request(&self) -> bool {
        self.activity.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    Saved(ScheduleGrid),
    /// Empty text was submitted; a second submit or `confirm_delete` removes
    DeleteArmed,
    Deleted { grid: ScheduleGrid, removed: usize },
}

/// Holds the one piece of editor state that outlives a submit: an armed delete
#[derive(Debug, Clone, Default)]
pub struct SlotEditor {
    armed_delete: Option<EditTarget>,
}

impl SlotEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_delete(&self) -> Option<EditTarget> {
        self.armed_delete
    }

    /// Dialog closed without saving
    pub fn cancel(&mut self) {
        self.armed_delete = None;
    }

    pub fn submit(
        &mut self,
        grid: &ScheduleGrid,
        plan_state: PlanState,
        target: EditTarget,
        draft: &SlotDraft,
    ) -> PlannerResult<EditOutcome> {
        ensure_drafting(plan_state)?;

        if draft.is_delete_request() {
            if self.armed_delete == Some(target) {
                self.armed_delete = None;
                let (grid, removed) = delete_target(grid, target);
                return Ok(EditOutcome::Deleted { grid, removed });
            }
            if let EditTarget::Cell(cell) = target {
                if grid.find(cell).is_none() {
                    return Err(PlannerError::validation("Activity text is required"));
                }
            }
            debug!("Delete armed for {:?}", target);
            self.armed_delete = Some(target);
            return Ok(EditOutcome::DeleteArmed);
        }

        self.armed_delete = None;
        let next = match target {
            EditTarget::Cell(cell) => save_slot(grid, cell, draft)?,
            EditTarget::Range(selection) => save_range(grid, selection, draft)?,
        };
        Ok(EditOutcome::Saved(next))
    }

    /// Second, explicit confirmation of an armed delete
    pub fn confirm_delete(
        &mut self,
        grid: &ScheduleGrid,
        plan_state: PlanState,
    ) -> PlannerResult<EditOutcome> {
        ensure_drafting(plan_state)?;
        let target = self
            .armed_delete
            .take()
            .ok_or_else(|| PlannerError::validation("No deletion is waiting for confirmation"))?;
        let (grid, removed) = delete_target(grid, target);
        Ok(EditOutcome::Deleted { grid, removed })
    }
}

fn ensure_drafting(plan_state: PlanState) -> PlannerResult<()> {
    match plan_state {
        PlanState::Drafting => Ok(()),
        PlanState::Confirmed => Err(PlannerError::PlanLocked),
    }
}

/// Write the draft into one cell. Editing always clears the prior outcome.
pub fn save_slot(grid: &ScheduleGrid, cell: GridCell, draft: &SlotDraft) -> PlannerResult<ScheduleGrid> {
    let mut next = grid.clone();
    next.insert(apply_draft(grid.find(cell), cell, draft))?;
    Ok(next)
}

/// Merge the draft into every cell of the selection; cells outside it are untouched
pub fn save_range(
    grid: &ScheduleGrid,
    selection: Selection,
    draft: &SlotDraft,
) -> PlannerResult<ScheduleGrid> {
    let mut next = grid.clone();
    let mut created = 0;
    for cell in selection.cells() {
        let existing = grid.find(cell);
        if existing.is_none() {
            created += 1;
        }
        next.insert(apply_draft(existing, cell, draft))?;
    }
    info!(
        "Range edit wrote {} cells ({} new) as '{}'",
        selection.cell_count(),
        created,
        draft.activity.trim()
    );
    Ok(next)
}

fn apply_draft(existing: Option<&Slot>, cell: GridCell, draft: &SlotDraft) -> Slot {
    let activity = draft.activity.trim();
    match existing {
        Some(slot) => Slot {
            activity: activity.to_string(),
            activity_type: draft.activity_type,
            status: SlotStatus::Pending,
            ..slot.clone()
        },
        None => Slot::new(cell, activity, draft.activity_type),
    }
}

/// Remove the slot at a cell, or every slot whose cell lies in the selection
pub fn delete_target(grid: &ScheduleGrid, target: EditTarget) -> (ScheduleGrid, usize) {
    let mut next = grid.clone();
    let removed = match target {
        EditTarget::Cell(cell) => usize::from(next.remove_at(cell).is_some()),
        EditTarget::Range(selection) => next.remove_where(|slot| selection.contains(slot.cell())),
    };
    info!("Deleted {} slot(s)", removed);
    (next, removed)
}

/// Next outcome in the confirmed-plan click cycle: pending -> completed -> failed -> pending
pub fn next_status(status: SlotStatus) -> SlotStatus {
    match status {
        SlotStatus::Pending => SlotStatus::Completed,
        SlotStatus::Completed => SlotStatus::Failed,
        SlotStatus::Failed => SlotStatus::Pending,
        SlotStatus::Skipped => SlotStatus::Completed,
    }
}

/// Cycle the outcome of the slot at `cell`. Only meaningful on a confirmed
/// plan; clicking an empty cell changes nothing and yields `None`.
pub fn cycle_status(
    grid: &ScheduleGrid,
    cell: GridCell,
    plan_state: PlanState,
) -> PlannerResult<Option<ScheduleGrid>> {
    if plan_state != PlanState::Confirmed {
        return Err(PlannerError::validation(
            "Outcomes can only be marked once the plan is confirmed",
        ));
    }
    let Some(slot) = grid.find(cell) else {
        return Ok(None);
    };

    let mut updated = slot.clone();
    updated.status = next_status(slot.status);
    let mut next = grid.clone();
    next.insert(updated)?;
    Ok(Some(next))
}
