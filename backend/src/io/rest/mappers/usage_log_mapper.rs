use shared::{UsageLogEntry as SharedUsageLogEntry, UsageLogListResponse};

use crate::domain::models::UsageLogEntry;

pub struct UsageLogMapper;

impl UsageLogMapper {
    pub fn to_dto(domain: UsageLogEntry) -> SharedUsageLogEntry {
        SharedUsageLogEntry {
            id: domain.id,
            child_id: domain.child_id,
            amount: domain.amount,
            timestamp: domain.timestamp.to_rfc3339(),
            reason: domain.reason,
        }
    }

    pub fn to_list_dto(entries: Vec<UsageLogEntry>) -> UsageLogListResponse {
        UsageLogListResponse {
            entries: entries.into_iter().map(Self::to_dto).collect(),
        }
    }
}
