//! Grid model: the (day, time) coordinate space and slot lookup.
//!
//! The vertical axis is a fixed enumeration of half-hour marks running from
//! 06:00 to 02:00 the next morning. Marks compare by their position in that
//! enumeration, so "00:30" sorts after "23:30".
//!
//! `ScheduleGrid` indexes slots by cell, which makes "one slot per cell"
//! a structural property instead of a convention.

use std::collections::HashMap;
use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::errors::{PlannerError, PlannerResult};
use crate::domain::models::slot::Slot;

pub const DAYS_PER_WEEK: u8 = 7;

/// Display order of the week. Days 0 and 1 form the weekend.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Saturday",
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
];

pub const FULL_TIME_RANGE: [&str; 41] = [
    "06:00", "06:30", "07:00", "07:30", "08:00", "08:30", "09:00", "09:30", "10:00", "10:30",
    "11:00", "11:30", "12:00", "12:30", "13:00", "13:30", "14:00", "14:30", "15:00", "15:30",
    "16:00", "16:30", "17:00", "17:30", "18:00", "18:30", "19:00", "19:30", "20:00", "20:30",
    "21:00", "21:30", "22:00", "22:30", "23:00", "23:30", "00:00", "00:30", "01:00", "01:30",
    "02:00",
];

pub fn is_weekend(day: u8) -> bool {
    day < 2
}

pub fn day_name(day: u8) -> &'static str {
    WEEKDAY_NAMES
        .get(day as usize)
        .copied()
        .unwrap_or("Invalid")
}

/// A half-hour mark from the fixed enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeMark(u8);

impl TimeMark {
    pub fn parse(value: &str) -> Option<Self> {
        FULL_TIME_RANGE
            .iter()
            .position(|mark| *mark == value)
            .map(|index| TimeMark(index as u8))
    }

    /// Parse, reporting unknown marks as a validation error
    pub fn parse_required(value: &str) -> PlannerResult<Self> {
        Self::parse(value).ok_or_else(|| {
            PlannerError::validation(format!("{} is not a half-hour mark between 06:00 and 02:00", value))
        })
    }

    pub fn from_index(index: usize) -> Option<Self> {
        (index < FULL_TIME_RANGE.len()).then(|| TimeMark(index as u8))
    }

    pub fn first() -> Self {
        TimeMark(0)
    }

    pub fn last() -> Self {
        TimeMark((FULL_TIME_RANGE.len() - 1) as u8)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn as_str(self) -> &'static str {
        FULL_TIME_RANGE[self.index()]
    }

    /// Clock hour (0..=23) and minute of the mark
    pub fn hour_minute(self) -> (u8, u8) {
        let text = self.as_str();
        let hour = text[..2].parse().unwrap_or(0);
        let minute = text[3..].parse().unwrap_or(0);
        (hour, minute)
    }

    pub fn all() -> impl Iterator<Item = TimeMark> {
        (0..FULL_TIME_RANGE.len()).map(|index| TimeMark(index as u8))
    }
}

impl fmt::Display for TimeMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TimeMark {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TimeMark {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        TimeMark::parse(&value)
            .ok_or_else(|| de::Error::custom(format!("unknown time mark {}", value)))
    }
}

/// Contiguous run of marks shown as grid rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    start: TimeMark,
    end: TimeMark,
}

impl TimeRange {
    pub fn full() -> Self {
        Self {
            start: TimeMark::first(),
            end: TimeMark::last(),
        }
    }

    /// Resolve the visible range from two configured bounds.
    ///
    /// Unknown bounds fall back to the start/end of the enumeration. When the
    /// start sits after the end the range runs from the start to the final
    /// mark; it never wraps around.
    pub fn resolve(start: &str, end: &str) -> Self {
        let start = TimeMark::parse(start).unwrap_or_else(TimeMark::first);
        let mut end = TimeMark::parse(end).unwrap_or_else(TimeMark::last);
        if start > end {
            end = TimeMark::last();
        }
        Self { start, end }
    }

    pub fn start(&self) -> TimeMark {
        self.start
    }

    pub fn end(&self) -> TimeMark {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end.index() - self.start.index() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, mark: TimeMark) -> bool {
        mark >= self.start && mark <= self.end
    }

    /// Row index of a mark inside this range
    pub fn position(&self, mark: TimeMark) -> Option<usize> {
        self.contains(mark)
            .then(|| mark.index() - self.start.index())
    }

    pub fn mark_at(&self, row: usize) -> Option<TimeMark> {
        if row < self.len() {
            TimeMark::from_index(self.start.index() + row)
        } else {
            None
        }
    }

    pub fn marks(&self) -> impl Iterator<Item = TimeMark> {
        (self.start.index()..=self.end.index()).map(|index| TimeMark(index as u8))
    }

    pub fn labels(&self) -> Vec<String> {
        self.marks().map(|mark| mark.as_str().to_string()).collect()
    }
}

/// One (day, time) coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCell {
    pub day: u8,
    pub time: TimeMark,
}

impl GridCell {
    pub fn new(day: u8, time: TimeMark) -> PlannerResult<Self> {
        if day >= DAYS_PER_WEEK {
            return Err(PlannerError::validation(format!(
                "Invalid day index: {}. Must be 0-6",
                day
            )));
        }
        Ok(Self { day, time })
    }

    pub fn parse(day: u8, time: &str) -> PlannerResult<Self> {
        Self::new(day, TimeMark::parse_required(time)?)
    }
}

/// A child's week of slots, addressable by ID and by cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleGrid {
    slots: HashMap<String, Slot>,
    by_cell: HashMap<GridCell, String>,
}

impl ScheduleGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid, rejecting duplicate IDs and doubly-occupied cells
    pub fn from_slots(slots: impl IntoIterator<Item = Slot>) -> PlannerResult<Self> {
        let mut grid = Self::new();
        for slot in slots {
            if grid.slots.contains_key(&slot.id) {
                return Err(PlannerError::Consistency(format!(
                    "slot id {} appears more than once",
                    slot.id
                )));
            }
            grid.insert(slot)?;
        }
        Ok(grid)
    }

    pub fn find(&self, cell: GridCell) -> Option<&Slot> {
        self.by_cell.get(&cell).and_then(|id| self.slots.get(id))
    }

    pub fn get(&self, id: &str) -> Option<&Slot> {
        self.slots.get(id)
    }

    /// Slots of one day, ordered by start time
    pub fn all_slots_for(&self, day: u8) -> Vec<&Slot> {
        let mut slots: Vec<&Slot> = self
            .slots
            .values()
            .filter(|slot| slot.day_index == day)
            .collect();
        slots.sort_by_key(|slot| slot.start_time);
        slots
    }

    /// Every slot, ordered by day then start time
    pub fn slots(&self) -> Vec<&Slot> {
        let mut slots: Vec<&Slot> = self.slots.values().collect();
        slots.sort_by_key(|slot| slot.cell());
        slots
    }

    pub fn to_vec(&self) -> Vec<Slot> {
        self.slots().into_iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Insert or replace a slot by ID.
    ///
    /// A slot whose ID is already present moves to its new cell. Fails if the
    /// target cell holds a different slot.
    pub fn insert(&mut self, slot: Slot) -> PlannerResult<Option<Slot>> {
        let cell = slot.cell();
        if let Some(occupant) = self.by_cell.get(&cell) {
            if *occupant != slot.id {
                return Err(PlannerError::Consistency(format!(
                    "{} {} is already occupied by slot {}",
                    day_name(cell.day),
                    cell.time,
                    occupant
                )));
            }
        }

        let previous = self.slots.remove(&slot.id);
        if let Some(previous) = &previous {
            self.by_cell.remove(&previous.cell());
        }
        self.by_cell.insert(cell, slot.id.clone());
        self.slots.insert(slot.id.clone(), slot);
        Ok(previous)
    }

    pub fn remove(&mut self, id: &str) -> Option<Slot> {
        let slot = self.slots.remove(id)?;
        self.by_cell.remove(&slot.cell());
        Some(slot)
    }

    pub fn remove_at(&mut self, cell: GridCell) -> Option<Slot> {
        let id = self.by_cell.get(&cell)?.clone();
        self.remove(&id)
    }

    /// Remove every slot matching the predicate, returning how many went
    pub fn remove_where(&mut self, predicate: impl Fn(&Slot) -> bool) -> usize {
        let doomed: Vec<String> = self
            .slots
            .values()
            .filter(|slot| predicate(slot))
            .map(|slot| slot.id.clone())
            .collect();
        for id in &doomed {
            self.remove(id);
        }
        doomed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ActivityType;

    fn cell(day: u8, time: &str) -> GridCell {
        GridCell::parse(day, time).unwrap()
    }

    #[test]
    fn test_time_marks_follow_enumeration_order() {
        let late = TimeMark::parse("23:30").unwrap();
        let after_midnight = TimeMark::parse("00:30").unwrap();
        assert!(after_midnight > late);
        assert_eq!(TimeMark::first().as_str(), "06:00");
        assert_eq!(TimeMark::last().as_str(), "02:00");
        assert_eq!(TimeMark::all().count(), 41);
        assert_eq!(after_midnight.hour_minute(), (0, 30));
        assert!(TimeMark::parse("09:15").is_none());
    }

    #[test]
    fn test_resolve_time_range() {
        let range = TimeRange::resolve("07:00", "22:00");
        assert_eq!(range.start().as_str(), "07:00");
        assert_eq!(range.end().as_str(), "22:00");
        assert_eq!(range.len(), 31);
        assert_eq!(range.labels().first().map(String::as_str), Some("07:00"));
    }

    #[test]
    fn test_resolve_unknown_bounds_fall_back_to_full_range() {
        let range = TimeRange::resolve("nope", "also nope");
        assert_eq!(range, TimeRange::full());

        let range = TimeRange::resolve("08:00", "25:00");
        assert_eq!(range.start().as_str(), "08:00");
        assert_eq!(range.end().as_str(), "02:00");
    }

    #[test]
    fn test_resolve_inverted_bounds_runs_to_last_mark_without_wrapping() {
        // 02:00 is the final mark, so "08:00" -> "07:00" is inverted
        let range = TimeRange::resolve("08:00", "07:00");
        assert_eq!(range.start().as_str(), "08:00");
        assert_eq!(range.end().as_str(), "02:00");
        assert!(!range.contains(TimeMark::parse("07:00").unwrap()));

        // 07:00 -> 02:00 is in order and covers the tail of the enumeration
        let range = TimeRange::resolve("07:00", "02:00");
        assert_eq!(range.start().as_str(), "07:00");
        assert_eq!(range.end().as_str(), "02:00");
        assert_eq!(range.len(), 39);
    }

    #[test]
    fn test_position_and_mark_at_are_relative_to_range() {
        let range = TimeRange::resolve("09:00", "11:00");
        let ten = TimeMark::parse("10:00").unwrap();
        assert_eq!(range.position(ten), Some(2));
        assert_eq!(range.mark_at(2), Some(ten));
        assert_eq!(range.mark_at(5), None);
        assert_eq!(range.position(TimeMark::parse("06:00").unwrap()), None);
    }

    #[test]
    fn test_grid_cell_rejects_bad_coordinates() {
        assert!(GridCell::parse(7, "09:00").is_err());
        assert!(matches!(
            GridCell::parse(0, "09:10"),
            Err(PlannerError::Validation(_))
        ));
    }

    #[test]
    fn test_find_and_all_slots_for() {
        let grid = ScheduleGrid::from_slots(vec![
            Slot::new(cell(1, "10:00"), "Piano", ActivityType::Academy),
            Slot::new(cell(1, "00:00"), "Sleep", ActivityType::Sleep),
            Slot::new(cell(1, "09:00"), "Reading", ActivityType::Study),
            Slot::new(cell(2, "09:00"), "School", ActivityType::School),
        ])
        .unwrap();

        assert_eq!(grid.find(cell(2, "09:00")).unwrap().activity, "School");
        assert!(grid.find(cell(3, "09:00")).is_none());

        let day: Vec<&str> = grid
            .all_slots_for(1)
            .iter()
            .map(|slot| slot.start_time.as_str())
            .collect();
        assert_eq!(day, vec!["09:00", "10:00", "00:00"]);
    }

    #[test]
    fn test_duplicate_cell_is_a_consistency_error() {
        let result = ScheduleGrid::from_slots(vec![
            Slot::new(cell(0, "09:00"), "A", ActivityType::Study),
            Slot::new(cell(0, "09:00"), "B", ActivityType::Rest),
        ]);
        assert!(matches!(result, Err(PlannerError::Consistency(_))));
    }

    #[test]
    fn test_duplicate_id_is_a_consistency_error() {
        let result = ScheduleGrid::from_slots(vec![
            Slot::with_id("same", cell(0, "09:00"), "A", ActivityType::Study),
            Slot::with_id("same", cell(0, "09:30"), "B", ActivityType::Rest),
        ]);
        assert!(matches!(result, Err(PlannerError::Consistency(_))));
    }

    #[test]
    fn test_insert_existing_id_moves_the_slot() {
        let mut grid = ScheduleGrid::new();
        grid.insert(Slot::with_id("a", cell(0, "09:00"), "A", ActivityType::Study))
            .unwrap();
        grid.insert(Slot::with_id("a", cell(0, "10:00"), "A", ActivityType::Study))
            .unwrap();

        assert_eq!(grid.len(), 1);
        assert!(grid.find(cell(0, "09:00")).is_none());
        assert_eq!(grid.find(cell(0, "10:00")).unwrap().id, "a");
    }

    #[test]
    fn test_remove_where_and_remove_at() {
        let mut grid = ScheduleGrid::from_slots(vec![
            Slot::new(cell(0, "09:00"), "A", ActivityType::Study),
            Slot::new(cell(0, "09:30"), "B", ActivityType::Study),
            Slot::new(cell(4, "09:30"), "C", ActivityType::Rest),
        ])
        .unwrap();

        assert_eq!(grid.remove_where(|slot| slot.day_index == 0), 2);
        assert!(grid.remove_at(cell(4, "09:30")).is_some());
        assert!(grid.is_empty());
    }

    #[test]
    fn test_day_names_start_on_saturday() {
        assert_eq!(day_name(0), "Saturday");
        assert_eq!(day_name(6), "Friday");
        assert_eq!(day_name(9), "Invalid");
        assert!(is_weekend(1));
        assert!(!is_weekend(2));
    }
}
