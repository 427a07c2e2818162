//! Range selector: turns a press-drag-release gesture over the grid into a
//! normalized rectangular selection, or recognizes it as a plain click.
//!
//! Drag state is local to one editing surface and purely event driven. A
//! press starts it, hovers move the free corner, and either a release or the
//! pointer leaving the surface finishes it.

use shared::PlanState;
use tracing::debug;

use crate::domain::grid::{GridCell, TimeMark, TimeRange};

/// Inclusive rectangle of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    min_day: u8,
    max_day: u8,
    min_time: TimeMark,
    max_time: TimeMark,
}

impl Selection {
    /// Normalize two corners using their rows in the visible range.
    /// Returns `None` when either corner lies outside that range.
    pub fn normalize(a: GridCell, b: GridCell, range: &TimeRange) -> Option<Self> {
        let row_a = range.position(a.time)?;
        let row_b = range.position(b.time)?;
        let min_time = range.mark_at(row_a.min(row_b))?;
        let max_time = range.mark_at(row_a.max(row_b))?;

        Some(Self {
            min_day: a.day.min(b.day),
            max_day: a.day.max(b.day),
            min_time,
            max_time,
        })
    }

    pub fn single(cell: GridCell) -> Self {
        Self {
            min_day: cell.day,
            max_day: cell.day,
            min_time: cell.time,
            max_time: cell.time,
        }
    }

    /// Day-range membership AND time-range membership
    pub fn contains(&self, cell: GridCell) -> bool {
        (self.min_day..=self.max_day).contains(&cell.day)
            && cell.time >= self.min_time
            && cell.time <= self.max_time
    }

    /// Every cell of the rectangle, day by day, top to bottom
    pub fn cells(&self) -> Vec<GridCell> {
        let times = TimeRange::resolve(self.min_time.as_str(), self.max_time.as_str());
        (self.min_day..=self.max_day)
            .flat_map(|day| times.marks().map(move |time| GridCell { day, time }))
            .collect()
    }

    pub fn cell_count(&self) -> usize {
        let days = (self.max_day - self.min_day) as usize + 1;
        let rows = self.max_time.index() - self.min_time.index() + 1;
        days * rows
    }

    /// Top-left corner, used as the reference cell of an edit dialog
    pub fn anchor(&self) -> GridCell {
        GridCell {
            day: self.min_day,
            time: self.min_time,
        }
    }

    pub fn days(&self) -> (u8, u8) {
        (self.min_day, self.max_day)
    }

    pub fn times(&self) -> (TimeMark, TimeMark) {
        (self.min_time, self.max_time)
    }
}

/// What a finished gesture turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Pressed and released on the same cell
    Click(GridCell),
    Range(Selection),
}

/// Tracks one in-progress drag over the visible grid
#[derive(Debug, Clone)]
pub struct DragTracker {
    range: TimeRange,
    start: Option<GridCell>,
    current: Option<GridCell>,
}

impl DragTracker {
    pub fn new(range: TimeRange) -> Self {
        Self {
            range,
            start: None,
            current: None,
        }
    }

    /// Swap the visible rows; any drag in progress is abandoned
    pub fn set_range(&mut self, range: TimeRange) {
        self.range = range;
        self.cancel();
    }

    pub fn range(&self) -> &TimeRange {
        &self.range
    }

    pub fn is_dragging(&self) -> bool {
        self.start.is_some()
    }

    /// Start a drag. Refused while the plan is confirmed or off-grid.
    pub fn press(&mut self, cell: GridCell, plan_state: PlanState) -> bool {
        if plan_state == PlanState::Confirmed {
            debug!("Ignoring press at day {} {}: plan is confirmed", cell.day, cell.time);
            return false;
        }
        if !self.range.contains(cell.time) {
            return false;
        }
        self.start = Some(cell);
        self.current = Some(cell);
        true
    }

    pub fn hover(&mut self, cell: GridCell) {
        if self.is_dragging() && self.range.contains(cell.time) {
            self.current = Some(cell);
        }
    }

    pub fn release(&mut self) -> Option<Gesture> {
        let start = self.start.take()?;
        let current = self.current.take().unwrap_or(start);

        if start == current {
            return Some(Gesture::Click(start));
        }
        Selection::normalize(start, current, &self.range).map(Gesture::Range)
    }

    /// The pointer left the surface: finish the drag the same way a release does
    pub fn pointer_left(&mut self) -> Option<Gesture> {
        if !self.is_dragging() {
            return None;
        }
        debug!("Pointer left the grid mid-drag, finalizing selection");
        self.release()
    }

    pub fn cancel(&mut self) {
        self.start = None;
        self.current = None;
    }

    /// Rectangle covered by the drag so far, for highlighting
    pub fn preview(&self) -> Option<Selection> {
        Selection::normalize(self.start?, self.current?, &self.range)
    }

    pub fn is_cell_selected(&self, cell: GridCell) -> bool {
        self.preview()
            .map(|selection| selection.contains(cell))
            .unwrap_or(false)
    }
}
