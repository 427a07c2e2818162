use shared::{ScheduleResponse, SyncScheduleResponse, TimeSlot};

use crate::domain::commands::schedule::SyncResult;
use crate::domain::errors::{PlannerError, PlannerResult};
use crate::domain::grid::{GridCell, ScheduleGrid};
use crate::domain::models::{Slot, MAX_SLOT_MINUTES};

/// Converts between wire `TimeSlot`s and validated domain `Slot`s
pub struct SlotMapper;

impl SlotMapper {
    /// Validate a wire slot: the day must be 0-6, the start a known mark,
    /// the duration between one minute and a day and the activity non-blank.
    pub fn to_domain(dto: TimeSlot) -> PlannerResult<Slot> {
        if dto.id.trim().is_empty() {
            return Err(PlannerError::validation("Slot id cannot be empty"));
        }
        if dto.duration_minutes == 0 || dto.duration_minutes > MAX_SLOT_MINUTES {
            return Err(PlannerError::validation(format!(
                "Slot {} must last between 1 and {} minutes",
                dto.id, MAX_SLOT_MINUTES
            )));
        }
        if dto.activity.trim().is_empty() {
            return Err(PlannerError::validation(format!("Slot {} has no activity", dto.id)));
        }

        let cell = GridCell::parse(dto.day_index, &dto.start_time)?;
        Ok(Slot {
            id: dto.id,
            day_index: cell.day,
            start_time: cell.time,
            duration_minutes: dto.duration_minutes,
            activity: dto.activity,
            activity_type: dto.activity_type,
            status: dto.status,
        })
    }

    pub fn to_domain_list(dtos: Vec<TimeSlot>) -> PlannerResult<Vec<Slot>> {
        dtos.into_iter().map(Self::to_domain).collect()
    }

    pub fn to_dto(domain: &Slot) -> TimeSlot {
        TimeSlot {
            id: domain.id.clone(),
            day_index: domain.day_index,
            start_time: domain.start_time.as_str().to_string(),
            duration_minutes: domain.duration_minutes,
            activity: domain.activity.clone(),
            activity_type: domain.activity_type,
            status: domain.status,
        }
    }

    pub fn to_dto_list<'a>(slots: impl IntoIterator<Item = &'a Slot>) -> Vec<TimeSlot> {
        slots.into_iter().map(Self::to_dto).collect()
    }

    pub fn to_schedule_response(grid: &ScheduleGrid) -> ScheduleResponse {
        ScheduleResponse {
            slots: Self::to_dto_list(grid.slots()),
        }
    }

    pub fn to_sync_response(result: &SyncResult) -> SyncScheduleResponse {
        SyncScheduleResponse {
            slots: Self::to_dto_list(result.grid.slots()),
            summary: result.summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{ActivityType, SlotStatus};

    fn dto(day_index: u8, start_time: &str) -> TimeSlot {
        TimeSlot {
            id: "slot-1".to_string(),
            day_index,
            start_time: start_time.to_string(),
            duration_minutes: 30,
            activity: "Math".to_string(),
            activity_type: ActivityType::Study,
            status: SlotStatus::Pending,
        }
    }

    #[test]
    fn test_valid_slot_maps_both_ways() {
        let slot = SlotMapper::to_domain(dto(6, "00:30")).unwrap();
        assert_eq!(slot.start_time.as_str(), "00:30");
        assert_eq!(SlotMapper::to_dto(&slot), dto(6, "00:30"));
    }

    #[test]
    fn test_invalid_slots_are_rejected() {
        assert!(matches!(SlotMapper::to_domain(dto(7, "09:00")), Err(PlannerError::Validation(_))));
        assert!(matches!(SlotMapper::to_domain(dto(0, "09:15")), Err(PlannerError::Validation(_))));
        assert!(matches!(SlotMapper::to_domain(dto(0, "03:00")), Err(PlannerError::Validation(_))));

        let mut blank = dto(0, "09:00");
        blank.activity = "  ".to_string();
        assert!(matches!(SlotMapper::to_domain(blank), Err(PlannerError::Validation(_))));

        let mut empty = dto(0, "09:00");
        empty.duration_minutes = 0;
        assert!(SlotMapper::to_domain(empty).is_err());
    }

    #[test]
    fn test_duration_is_capped_at_one_day() {
        let mut day_long = dto(0, "09:00");
        day_long.duration_minutes = MAX_SLOT_MINUTES;
        assert!(SlotMapper::to_domain(day_long).is_ok());

        let mut huge = dto(0, "09:00");
        huge.duration_minutes = u32::MAX;
        assert!(matches!(SlotMapper::to_domain(huge), Err(PlannerError::Validation(_))));
    }
}
