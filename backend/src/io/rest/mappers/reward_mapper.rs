use shared::{CategoryTime, RewardBalanceResponse, RewardConfig as SharedRewardConfig, TimeBreakdownResponse};

use crate::domain::models::{RewardConfig, RewardWeights};
use crate::domain::reward_calculator::{format_points, CategoryShare};
use crate::domain::reward_service::RewardReport;

/// Mapper for reward tables, balances and the time breakdown
pub struct RewardMapper;

impl RewardMapper {
    pub fn to_domain(dto: SharedRewardConfig) -> RewardConfig {
        RewardConfig {
            mode: dto.mode,
            unit: dto.unit,
            weights: RewardWeights {
                study: dto.study,
                academy: dto.academy,
                school: dto.school,
                routine: dto.routine,
                rest: dto.rest,
                sleep: dto.sleep,
            },
        }
    }

    pub fn to_dto(domain: RewardConfig) -> SharedRewardConfig {
        let weights = domain.weights;
        SharedRewardConfig {
            mode: domain.mode,
            unit: domain.unit,
            study: weights.study,
            academy: weights.academy,
            school: weights.school,
            routine: weights.routine,
            rest: weights.rest,
            sleep: weights.sleep,
        }
    }

    pub fn to_balance_dto(report: RewardReport) -> RewardBalanceResponse {
        let RewardReport { balance, config } = report;
        let format = |points| format_points(points, config.mode, &config.unit);
        RewardBalanceResponse {
            earned_points: balance.earned,
            used_points: balance.used,
            current_balance: balance.current,
            formatted_earned: format(balance.earned),
            formatted_used: format(balance.used),
            formatted_balance: format(balance.current),
            mode: config.mode,
            unit: config.unit.clone(),
        }
    }

    pub fn to_breakdown_dto(total_minutes: u32, shares: Vec<CategoryShare>) -> TimeBreakdownResponse {
        TimeBreakdownResponse {
            total_minutes,
            categories: shares
                .into_iter()
                .map(|share| CategoryTime {
                    activity_type: share.activity_type,
                    minutes: share.minutes,
                    percent: share.percent,
                })
                .collect(),
        }
    }
}
