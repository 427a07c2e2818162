//! Domain-level command types.
//!
//! Services take these instead of the wire DTOs in `shared`; the REST layer
//! maps one to the other.

pub mod child {
    use shared::GradeLevel;

    #[derive(Debug, Clone)]
    pub struct CreateChildCommand {
        pub name: String,
        pub color: Option<String>,
        pub grade: GradeLevel,
        /// Seed the week with the grade template instead of leaving it empty
        pub with_template: bool,
    }

    /// Partial update; `None` leaves a field alone. An empty time string
    /// clears the custom bound so the grade default applies again.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateChildCommand {
        pub name: Option<String>,
        pub color: Option<String>,
        pub grade: Option<GradeLevel>,
        pub start_time: Option<String>,
        pub end_time: Option<String>,
    }
}

pub mod schedule {
    use shared::SyncSummary;

    use crate::domain::grid::ScheduleGrid;

    /// Persisted week after a sync, plus what the sync wrote
    #[derive(Debug, Clone)]
    pub struct SyncResult {
        pub grid: ScheduleGrid,
        pub summary: SyncSummary,
    }
}

pub mod snapshot {
    #[derive(Debug, Clone)]
    pub struct CreateSnapshotCommand {
        pub name: String,
        /// Defaults to today's date when absent
        pub date: Option<String>,
    }
}
