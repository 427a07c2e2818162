//! Reward accrual: derives earned/used points and the current balance.
//!
//! Everything here is a pure fold over the slots and the reward table, so it
//! can be recomputed after every change without caching anything.

use shared::{ActivityType, RewardMode, SlotStatus};

use crate::domain::models::reward::RewardWeights;
use crate::domain::models::slot::{Slot, STANDARD_SLOT_MINUTES};
use crate::domain::models::usage_log::UsageLogEntry;

/// Signed contribution of one slot. Weights are per standard slot and scale
/// linearly with the slot's duration.
pub fn slot_points(slot: &Slot, weights: &RewardWeights) -> i64 {
    let scaled = i128::from(weights.weight(slot.activity_type)) * i128::from(slot.duration_minutes)
        / i128::from(STANDARD_SLOT_MINUTES);
    let scaled = i64::try_from(scaled).unwrap_or(i64::MAX);
    match slot.status {
        SlotStatus::Completed => scaled,
        SlotStatus::Failed => -scaled,
        SlotStatus::Pending | SlotStatus::Skipped => 0,
    }
}

/// Completed slots add their weight, failed slots subtract it.
/// Totals saturate at the `i64` bounds.
pub fn earned_points<'a>(slots: impl IntoIterator<Item = &'a Slot>, weights: &RewardWeights) -> i64 {
    slots
        .into_iter()
        .map(|slot| slot_points(slot, weights))
        .fold(0, i64::saturating_add)
}

pub fn used_points(entries: &[UsageLogEntry]) -> i64 {
    entries.iter().map(|entry| entry.amount).fold(0, i64::saturating_add)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardBalance {
    pub earned: i64,
    pub used: i64,
    /// May go negative; never clamped
    pub current: i64,
}

impl RewardBalance {
    pub fn new(earned: i64, used: i64) -> Self {
        Self {
            earned,
            used,
            current: earned.saturating_sub(used),
        }
    }
}

/// Render points for display. Time mode treats points as minutes.
pub fn format_points(points: i64, mode: RewardMode, unit: &str) -> String {
    match mode {
        RewardMode::Time => {
            let sign = if points < 0 { "-" } else { "" };
            let minutes = points.unsigned_abs();
            format!("{}{}h {}m", sign, minutes / 60, minutes % 60)
        }
        RewardMode::Currency => format!("{} {}", points, unit),
    }
}

/// Scheduled minutes of one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub activity_type: ActivityType,
    pub minutes: u32,
    pub percent: f64,
}

/// Time-by-category breakdown of a schedule; categories with no time are left out
pub fn time_by_category<'a>(slots: impl IntoIterator<Item = &'a Slot>) -> (u32, Vec<CategoryShare>) {
    let mut minutes = [0u32; ActivityType::ALL.len()];
    for slot in slots {
        if let Some(index) = ActivityType::ALL.iter().position(|t| *t == slot.activity_type) {
            minutes[index] += slot.duration_minutes;
        }
    }

    let total: u32 = minutes.iter().sum();
    let shares = ActivityType::ALL
        .iter()
        .zip(minutes)
        .filter(|(_, minutes)| *minutes > 0)
        .map(|(activity_type, minutes)| CategoryShare {
            activity_type: *activity_type,
            minutes,
            percent: f64::from(minutes) * 100.0 / f64::from(total),
        })
        .collect();
    (total, shares)
}
