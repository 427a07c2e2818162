//! Domain model for a child profile and the caller context that scopes every
//! schedule operation.

use chrono::{DateTime, Utc};
use shared::{GradeLevel, PlanState};

use crate::domain::grid::{TimeMark, TimeRange};
use crate::domain::templates::grade_default_range;

#[derive(Debug, Clone, PartialEq)]
pub struct ChildProfile {
    pub id: String,
    /// Account that created the child; only this owner may touch its data
    pub owner_id: String,
    pub name: String,
    pub color: String,
    pub grade: GradeLevel,
    pub start_time: Option<TimeMark>,
    pub end_time: Option<TimeMark>,
    pub plan_state: PlanState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChildProfile {
    pub const DEFAULT_COLOR: &'static str = "#4f46e5";
    pub const MAX_NAME_LENGTH: usize = 50;

    pub fn generate_id() -> String {
        format!("child::{}", uuid::Uuid::new_v4().simple())
    }

    /// Rows shown in the grid: the child's own bounds, else the grade defaults
    pub fn visible_time_range(&self) -> TimeRange {
        let (grade_start, grade_end) = grade_default_range(self.grade);
        let start = self.start_time.map(TimeMark::as_str).unwrap_or(grade_start);
        let end = self.end_time.map(TimeMark::as_str).unwrap_or(grade_end);
        TimeRange::resolve(start, end)
    }

    pub fn is_locked(&self) -> bool {
        self.plan_state == PlanState::Confirmed
    }
}

/// Who is asking, and for which child.
///
/// Passed explicitly into every service call instead of being read from
/// process-wide state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChildContext {
    pub owner_id: String,
    pub child_id: String,
}

impl ChildContext {
    pub fn new(owner_id: impl Into<String>, child_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            child_id: child_id.into(),
        }
    }
}
