//! Domain model for a child's reward table.
use shared::{ActivityType, RewardMode};

/// Points a standard 30-minute slot of each category is worth.
///
/// Every category has a field, so a lookup can never miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RewardWeights {
    pub study: u32,
    pub academy: u32,
    pub school: u32,
    pub routine: u32,
    pub rest: u32,
    pub sleep: u32,
}

impl RewardWeights {
    pub fn weight(&self, activity_type: ActivityType) -> u32 {
        match activity_type {
            ActivityType::Study => self.study,
            ActivityType::Academy => self.academy,
            ActivityType::School => self.school,
            ActivityType::Routine => self.routine,
            ActivityType::Rest => self.rest,
            ActivityType::Sleep => self.sleep,
        }
    }

    pub fn set(&mut self, activity_type: ActivityType, weight: u32) {
        let field = match activity_type {
            ActivityType::Study => &mut self.study,
            ActivityType::Academy => &mut self.academy,
            ActivityType::School => &mut self.school,
            ActivityType::Routine => &mut self.routine,
            ActivityType::Rest => &mut self.rest,
            ActivityType::Sleep => &mut self.sleep,
        };
        *field = weight;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardConfig {
    pub mode: RewardMode,
    /// Label shown after currency-mode amounts
    pub unit: String,
    pub weights: RewardWeights,
}

impl RewardConfig {
    pub const MAX_UNIT_LENGTH: usize = 20;
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            mode: RewardMode::Time,
            unit: "points".to_string(),
            weights: RewardWeights {
                study: 20,
                academy: 20,
                school: 10,
                routine: 5,
                rest: 0,
                sleep: 0,
            },
        }
    }
}
