//! Domain model for a saved copy of a week.
use chrono::{DateTime, Utc};

use crate::domain::models::slot::Slot;

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSnapshot {
    pub id: String,
    pub child_id: String,
    pub name: String,
    /// Caregiver-facing label for the week the copy was taken for
    pub date: String,
    pub slots: Vec<Slot>,
    pub created_at: DateTime<Utc>,
}

impl ScheduleSnapshot {
    pub const MAX_NAME_LENGTH: usize = 100;

    pub fn generate_id(child_id: &str, epoch_millis: i64) -> String {
        format!("snapshot::{}::{}::{}", child_id, epoch_millis, uuid::Uuid::new_v4().simple())
    }
}
