//! Reconciliation sync: turns "the client's full week" into the minimal set
//! of row changes against what is stored.
//!
//! Both sides are `ScheduleGrid`s, so each is already free of duplicate IDs
//! and doubly-occupied cells. Matching is by slot ID; a slot whose fields
//! all match its stored twin is left alone, which makes resubmitting the
//! same week a no-op. When both sides changed a slot, the incoming copy wins.

use shared::SyncSummary;

use crate::domain::grid::ScheduleGrid;
use crate::domain::models::slot::Slot;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncPlan {
    /// Stored slot IDs absent from the incoming week
    pub deletes: Vec<String>,
    /// Incoming slots whose stored twin differs
    pub updates: Vec<Slot>,
    /// Incoming slots with IDs never stored
    pub creates: Vec<Slot>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.deletes.is_empty() && self.updates.is_empty() && self.creates.is_empty()
    }

    pub fn summary(&self) -> SyncSummary {
        SyncSummary {
            created: self.creates.len(),
            updated: self.updates.len(),
            deleted: self.deletes.len(),
        }
    }
}

pub fn plan_sync(persisted: &ScheduleGrid, incoming: &ScheduleGrid) -> SyncPlan {
    let mut plan = SyncPlan::default();

    for stored in persisted.slots() {
        if incoming.get(&stored.id).is_none() {
            plan.deletes.push(stored.id.clone());
        }
    }

    for slot in incoming.slots() {
        match persisted.get(&slot.id) {
            Some(stored) if stored.same_content(slot) => {}
            Some(_) => plan.updates.push(slot.clone()),
            None => plan.creates.push(slot.clone()),
        }
    }

    plan
}
