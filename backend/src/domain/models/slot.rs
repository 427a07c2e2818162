//! Domain model for a schedule slot.
use serde::{Deserialize, Serialize};
use shared::{ActivityType, SlotStatus};
use uuid::Uuid;

use crate::domain::grid::{GridCell, TimeMark};

/// Length of a slot created by the editor
pub const STANDARD_SLOT_MINUTES: u32 = 30;

/// Longest duration a slot may claim
pub const MAX_SLOT_MINUTES: u32 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: String,
    pub day_index: u8,
    pub start_time: TimeMark,
    pub duration_minutes: u32,
    pub activity: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub status: SlotStatus,
}

impl Slot {
    /// New pending 30-minute slot with a freshly generated ID
    pub fn new(cell: GridCell, activity: impl Into<String>, activity_type: ActivityType) -> Self {
        Self::with_id(Self::generate_id(), cell, activity, activity_type)
    }

    /// New pending 30-minute slot keeping an ID the caller already assigned
    pub fn with_id(
        id: impl Into<String>,
        cell: GridCell,
        activity: impl Into<String>,
        activity_type: ActivityType,
    ) -> Self {
        Self {
            id: id.into(),
            day_index: cell.day,
            start_time: cell.time,
            duration_minutes: STANDARD_SLOT_MINUTES,
            activity: activity.into(),
            activity_type,
            status: SlotStatus::Pending,
        }
    }

    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn cell(&self) -> GridCell {
        GridCell {
            day: self.day_index,
            time: self.start_time,
        }
    }

    /// True when every persisted field matches
    pub fn same_content(&self, other: &Slot) -> bool {
        self.day_index == other.day_index
            && self.start_time == other.start_time
            && self.duration_minutes == other.duration_minutes
            && self.activity == other.activity
            && self.activity_type == other.activity_type
            && self.status == other.status
    }
}
